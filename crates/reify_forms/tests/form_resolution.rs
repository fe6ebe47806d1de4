//! End-to-end form resolution scenarios: schema + presentation + data in,
//! a resolved field tree out, with registry-backed overrides.

use reify_forms::container::{ContainerKind, ResolvedContainer};
use reify_forms::field::{FieldKind, FieldResolver, FieldSet, ResolvedField};
use reify_forms::presentation::PresentationNode;
use reify_forms::schema::SchemaNode;
use reify_registry::access::Principal;
use reify_registry::registration::ComponentRegistration;
use reify_registry::render::{FnRenderable, Props, RenderNode};
use reify_registry::resolver::Resolver;
use reify_registry::store::ComponentRegistry;
use serde_json::{Value, json};

fn schema(value: Value) -> SchemaNode {
    serde_json::from_value(value).unwrap()
}

fn presentation(value: Value) -> PresentationNode {
    serde_json::from_value(value).unwrap()
}

fn resolve(
    registry: &ComponentRegistry,
    schema: &SchemaNode,
    presentation: &PresentationNode,
    data: &Value,
) -> ResolvedField {
    let principal = Principal::anonymous();
    let resolver = Resolver::new(registry, &principal);
    let fields = FieldSet::builtin();
    FieldResolver::new(&resolver, &fields).resolve_form(schema, presentation, data)
}

#[test]
fn contact_form_resolves_fields_containers_and_labels() {
    let registry = ComponentRegistry::new();
    registry.register(
        ComponentRegistration::builder()
            .namespace("widgets")
            .name("PhoneInput")
            .renderer(FnRenderable(|_: &Props| {
                Ok(RenderNode::element("input").with_attr("type", "tel"))
            }))
            .error_boundary(false)
            .build()
            .unwrap(),
    );

    let schema = schema(json!({
        "type": "object",
        "title": "Contact",
        "required": ["name", "email"],
        "properties": {
            "name": { "type": "string", "title": "Full name" },
            "email": { "type": "string" },
            "phone": { "type": "string" },
            "subscribed": { "type": "boolean" },
            "addresses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "street": { "type": "string" },
                        "zip": { "type": "string" }
                    }
                }
            }
        }
    }));
    let presentation = presentation(json!({
        "widget": "grid",
        "phone": { "field": "widgets.PhoneInput" },
        "addresses": { "widget": "card" }
    }));

    let data = json!({ "name": "Ada" });
    let form = resolve(&registry, &schema, &presentation, &data);

    assert_eq!(form.kind, FieldKind::ObjectField);
    assert_eq!(form.label.as_deref(), Some("Contact"));
    assert!(matches!(
        form.container,
        Some(ResolvedContainer::Builtin(ContainerKind::Grid))
    ));

    let by_path: Vec<&str> = form.children.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(
        by_path,
        vec!["name", "email", "phone", "subscribed", "addresses"]
    );

    let name = &form.children[0];
    assert!(name.required);
    assert_eq!(name.label.as_deref(), Some("Full name"));

    // Registry override renders its own widget.
    let phone = &form.children[2];
    assert!(!phone.required);
    let node = phone
        .renderer
        .as_renderable()
        .unwrap()
        .render(&phone.props)
        .unwrap();
    assert!(matches!(
        node,
        RenderNode::Element { ref attrs, .. } if attrs.get("type") == Some(&json!("tel"))
    ));

    // Nested array: card container, object item template with two children.
    let addresses = &form.children[4];
    assert_eq!(addresses.kind, FieldKind::ArrayField);
    assert!(matches!(
        addresses.container,
        Some(ResolvedContainer::Builtin(ContainerKind::Card))
    ));
    let item = &addresses.children[0];
    assert_eq!(item.kind, FieldKind::ObjectField);
    assert_eq!(item.children.len(), 2);
    assert_eq!(item.children[0].path.as_str(), "addresses.street");
}

#[test]
fn templated_labels_read_form_data_and_context() {
    let registry = ComponentRegistry::new();
    let principal = Principal::anonymous();
    let resolver = Resolver::new(&registry, &principal)
        .with_context(Props::new().with("tenant", "acme"));
    let fields = FieldSet::builtin();

    let schema = schema(json!({
        "type": "object",
        "properties": { "total": { "type": "number" } }
    }));
    let presentation = presentation(json!({
        "title": "Invoice ${formData.number} (${context.tenant})"
    }));
    let data = json!({ "number": 42 });

    let form =
        FieldResolver::new(&resolver, &fields).resolve_form(&schema, &presentation, &data);
    assert_eq!(form.label.as_deref(), Some("Invoice 42 (acme)"));
}

#[test]
fn unknown_schema_kind_degrades_to_diagnostic_per_node() {
    let registry = ComponentRegistry::new();
    let schema = schema(json!({
        "type": "object",
        "properties": {
            "ok": { "type": "string" },
            "weird": { "type": "geo-point" }
        }
    }));

    let form = resolve(&registry, &schema, PresentationNode::empty(), &Value::Null);

    // The odd node resolves to the diagnostic field; its sibling is
    // untouched.
    assert_eq!(form.children[0].kind, FieldKind::StringField);
    assert_eq!(form.children[1].kind, FieldKind::UnsupportedField);
    assert_eq!(
        form.children[1].props.get("unsupportedKind"),
        Some(&json!("geo-point"))
    );
}

#[test]
fn custom_field_set_replaces_builtin_renderers() {
    let registry = ComponentRegistry::new();
    let principal = Principal::anonymous();
    let resolver = Resolver::new(&registry, &principal);

    let mut fields = FieldSet::builtin();
    fields.register(
        FieldKind::StringField,
        reify_registry::render::ComponentImpl::renderer(FnRenderable(|_: &Props| {
            Ok(RenderNode::element("textarea"))
        })),
    );

    let schema = schema(json!({ "type": "string" }));
    let form = FieldResolver::new(&resolver, &fields).resolve_form(
        &schema,
        PresentationNode::empty(),
        &Value::Null,
    );
    let node = form
        .renderer
        .as_renderable()
        .unwrap()
        .render(&Props::new())
        .unwrap();
    assert!(matches!(node, RenderNode::Element { ref tag, .. } if tag == "textarea"));
}
