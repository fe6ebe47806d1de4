//! The field resolution protocol.
//!
//! A purely per-node decision function: given a schema node and its
//! presentation node, pick the renderer to mount, the props to pass it,
//! and — for object/array nodes — the wrapping container and the resolved
//! children. No state persists between render passes.
//!
//! The precedence cascade, in order and terminal at the first hit:
//!
//! 1. explicit field override from the presentation node (registry FQN or
//!    built-in field-kind name), used verbatim;
//! 2. the fixed declared-kind table ([`FieldKind::for_schema`]);
//! 3. the diagnostic unsupported-field placeholder — never an error.

use crate::container::{ResolvedContainer, resolve_container};
use crate::presentation::PresentationNode;
use crate::schema::{PropertyPath, SchemaKind, SchemaNode};
use crate::template::{has_template, render_template};
use indexmap::IndexMap;
use reify_registry::render::{ComponentImpl, FnRenderable, Props, RenderNode};
use reify_registry::resolver::Resolver;
use serde_json::{Value, json};

// ─────────────────────────────────────────────────────────────────────────────
// FieldKind
// ─────────────────────────────────────────────────────────────────────────────

/// The built-in field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Repeating items.
    ArrayField,
    /// True/false toggle.
    BooleanField,
    /// Numeric entry (integers and floats).
    NumberField,
    /// Nested object of child fields.
    ObjectField,
    /// Text entry.
    StringField,
    /// Calendar date entry.
    DateField,
    /// Diagnostic placeholder for kinds with no mapping.
    UnsupportedField,
}

impl FieldKind {
    /// The fixed declared-kind mapping table.
    #[must_use]
    pub fn for_schema(kind: &SchemaKind) -> Option<Self> {
        match kind {
            SchemaKind::Array => Some(Self::ArrayField),
            SchemaKind::Boolean => Some(Self::BooleanField),
            SchemaKind::Integer | SchemaKind::Number => Some(Self::NumberField),
            SchemaKind::Object => Some(Self::ObjectField),
            SchemaKind::String => Some(Self::StringField),
            SchemaKind::Date => Some(Self::DateField),
            SchemaKind::File | SchemaKind::Unknown(_) => None,
        }
    }

    /// The kind's registry-known name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArrayField => "ArrayField",
            Self::BooleanField => "BooleanField",
            Self::NumberField => "NumberField",
            Self::ObjectField => "ObjectField",
            Self::StringField => "StringField",
            Self::DateField => "DateField",
            Self::UnsupportedField => "UnsupportedField",
        }
    }

    /// Reverse of [`name()`](Self::name), for by-name overrides.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrayField" => Some(Self::ArrayField),
            "BooleanField" => Some(Self::BooleanField),
            "NumberField" => Some(Self::NumberField),
            "ObjectField" => Some(Self::ObjectField),
            "StringField" => Some(Self::StringField),
            "DateField" => Some(Self::DateField),
            "UnsupportedField" => Some(Self::UnsupportedField),
            _ => None,
        }
    }

    fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::StringField => Some("text"),
            Self::NumberField => Some("number"),
            Self::BooleanField => Some("checkbox"),
            Self::DateField => Some("date"),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldSet
// ─────────────────────────────────────────────────────────────────────────────

/// The registry of built-in field renderers.
///
/// Ships with minimal default renderers — concrete leaf widgets are
/// external payloads; a host replaces entries via
/// [`register`](Self::register).
pub struct FieldSet {
    fields: IndexMap<FieldKind, ComponentImpl>,
}

impl FieldSet {
    /// The default built-in renderers for every field kind.
    #[must_use]
    pub fn builtin() -> Self {
        let mut fields = IndexMap::new();
        for kind in [
            FieldKind::ArrayField,
            FieldKind::BooleanField,
            FieldKind::NumberField,
            FieldKind::ObjectField,
            FieldKind::StringField,
            FieldKind::DateField,
            FieldKind::UnsupportedField,
        ] {
            fields.insert(kind, Self::default_renderer(kind));
        }
        Self { fields }
    }

    /// Replaces the renderer for a field kind.
    pub fn register(&mut self, kind: FieldKind, implementation: ComponentImpl) {
        self.fields.insert(kind, implementation);
    }

    /// The renderer for a field kind.
    #[must_use]
    pub fn get(&self, kind: FieldKind) -> ComponentImpl {
        self.fields
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Self::default_renderer(kind))
    }

    fn default_renderer(kind: FieldKind) -> ComponentImpl {
        ComponentImpl::renderer(FnRenderable(move |props: &Props| {
            let node = match kind {
                FieldKind::ObjectField => RenderNode::element("fieldset"),
                FieldKind::ArrayField => RenderNode::element("ol"),
                FieldKind::UnsupportedField => {
                    let kind_token = props
                        .get("unsupportedKind")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown");
                    RenderNode::element("pre")
                        .with_attr("role", "note")
                        .with_child(RenderNode::text(format!(
                            "unsupported field kind '{kind_token}'"
                        )))
                }
                other => {
                    let mut input = RenderNode::element("input");
                    if let Some(input_type) = other.input_type() {
                        input = input.with_attr("type", input_type);
                    }
                    input
                }
            };
            let node = match props.get("label").and_then(|v| v.as_str()) {
                Some(label) => node.with_attr("label", label),
                None => node,
            };
            Ok(node)
        }))
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResolvedField
// ─────────────────────────────────────────────────────────────────────────────

/// The outcome of resolving one schema node.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// The renderer to mount.
    pub renderer: ComponentImpl,
    /// The field kind that was chosen (declared mapping, even under an
    /// explicit override).
    pub kind: FieldKind,
    /// Path from the form root.
    pub path: PropertyPath,
    /// Whether the parent object's `required` list names this property.
    pub required: bool,
    /// Label text after template substitution.
    pub label: Option<String>,
    /// Description text after template substitution.
    pub description: Option<String>,
    /// Props to pass the renderer (presentation options plus the
    /// protocol's own entries).
    pub props: Props,
    /// Wrapping container, for object/array nodes.
    pub container: Option<ResolvedContainer>,
    /// Recursively resolved children, in resolution order.
    pub children: Vec<ResolvedField>,
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldResolver
// ─────────────────────────────────────────────────────────────────────────────

/// The per-schema-node resolution protocol.
pub struct FieldResolver<'a> {
    resolver: &'a Resolver<'a>,
    fields: &'a FieldSet,
}

impl<'a> FieldResolver<'a> {
    /// Creates a field resolver over a registry resolver and a field set.
    #[must_use]
    pub fn new(resolver: &'a Resolver<'a>, fields: &'a FieldSet) -> Self {
        Self { resolver, fields }
    }

    /// Resolves a whole form from its root schema node.
    #[must_use]
    pub fn resolve_form(
        &self,
        schema: &SchemaNode,
        presentation: &PresentationNode,
        form_data: &Value,
    ) -> ResolvedField {
        self.resolve_node(schema, presentation, PropertyPath::root(), form_data, false)
    }

    /// Resolves one schema node.
    ///
    /// `required` is the membership decision the *parent* object made from
    /// its `required` list; the root is never required.
    #[must_use]
    pub fn resolve_node(
        &self,
        schema: &SchemaNode,
        presentation: &PresentationNode,
        path: PropertyPath,
        form_data: &Value,
        required: bool,
    ) -> ResolvedField {
        let declared_kind =
            FieldKind::for_schema(&schema.kind).unwrap_or(FieldKind::UnsupportedField);
        let renderer = self.choose_renderer(presentation, declared_kind);

        let mut props = presentation.options.clone();
        props.set("path", path.as_str());
        props.set("required", required);
        if declared_kind == FieldKind::UnsupportedField {
            // Diagnostic payload: the offending kind and the schema itself.
            props.set("unsupportedKind", schema.kind.token());
            props.set(
                "schema",
                serde_json::to_value(schema).unwrap_or(Value::Null),
            );
            tracing::warn!(path = %path, kind = %schema.kind, "no field mapping, rendering diagnostic");
        }

        let label = self.text_with_templates(
            presentation.title.as_deref().or(schema.title.as_deref()),
            schema,
            form_data,
        );
        let description = self.text_with_templates(
            presentation
                .description
                .as_deref()
                .or(schema.description.as_deref()),
            schema,
            form_data,
        );
        if let Some(label) = &label {
            props.set("label", label.clone());
        }

        let (container, children) = match schema.kind {
            SchemaKind::Object => (
                Some(resolve_container(schema, presentation, self.resolver)),
                self.resolve_object_children(schema, presentation, &path, form_data),
            ),
            SchemaKind::Array => (
                Some(resolve_container(schema, presentation, self.resolver)),
                self.resolve_array_items(schema, presentation, &path, form_data),
            ),
            _ => (None, Vec::new()),
        };

        ResolvedField {
            renderer,
            kind: declared_kind,
            path,
            required,
            label,
            description,
            props,
            container,
            children,
        }
    }

    /// Steps 1–3 of the cascade: explicit override, declared mapping,
    /// unsupported fallback.
    fn choose_renderer(
        &self,
        presentation: &PresentationNode,
        declared_kind: FieldKind,
    ) -> ComponentImpl {
        if let Some(field) = presentation.field.as_deref() {
            // Built-in field-kind name first; anything else goes through
            // the registry (single-segment names included). The override
            // is terminal — whatever comes back is used verbatim.
            if let Some(kind) = FieldKind::from_name(field) {
                return self.fields.get(kind);
            }
            if let Ok(implementation) = self.resolver.resolve(field) {
                return implementation;
            }
        }
        self.fields.get(declared_kind)
    }

    /// Object children in declared (or explicitly ordered) sequence.
    ///
    /// Required-ness is computed here, once per object node, and threaded
    /// into every child call.
    fn resolve_object_children(
        &self,
        schema: &SchemaNode,
        presentation: &PresentationNode,
        path: &PropertyPath,
        form_data: &Value,
    ) -> Vec<ResolvedField> {
        let declared: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        presentation
            .ordered(&declared)
            .into_iter()
            .filter_map(|name| {
                let child_schema = schema.properties.get(name)?;
                let child_required = schema.is_required(name);
                let child_data = form_data.get(name).unwrap_or(&Value::Null);
                Some(self.resolve_node(
                    child_schema,
                    presentation.child(name),
                    path.push(name),
                    child_data,
                    child_required,
                ))
            })
            .collect()
    }

    /// The array item template, resolved once against the `items` schema.
    fn resolve_array_items(
        &self,
        schema: &SchemaNode,
        presentation: &PresentationNode,
        path: &PropertyPath,
        form_data: &Value,
    ) -> Vec<ResolvedField> {
        let Some(items) = schema.items.as_deref() else {
            return Vec::new();
        };
        vec![self.resolve_node(
            items,
            presentation.child("items"),
            path.clone(),
            form_data,
            false,
        )]
    }

    /// Template pass over a label/description candidate.
    ///
    /// A failed evaluation surfaces a literal visible error string in
    /// place of the text — the render must not abort over a label.
    fn text_with_templates(
        &self,
        candidate: Option<&str>,
        schema: &SchemaNode,
        form_data: &Value,
    ) -> Option<String> {
        let text = candidate?;
        if !has_template(text) {
            return Some(text.to_string());
        }
        let bag = json!({
            "schema": serde_json::to_value(schema).unwrap_or(Value::Null),
            "formData": form_data,
            "context": self.resolver.context().to_value(),
        });
        match render_template(text, &bag) {
            Ok(rendered) => Some(rendered),
            Err(err) => Some(format!("[template error: {err}]")),
        }
    }
}

/// Convenience wrapper resolving a form with the built-in field set.
#[must_use]
pub fn resolve_form(
    resolver: &Resolver<'_>,
    schema: &SchemaNode,
    presentation: &PresentationNode,
    form_data: &Value,
) -> ResolvedField {
    let fields = FieldSet::builtin();
    FieldResolver::new(resolver, &fields).resolve_form(schema, presentation, form_data)
}
