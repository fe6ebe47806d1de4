//! End-to-end resolution scenarios across store, gate, and resolver.

use reify_registry::{
    ComponentImpl, ComponentRegistration, ComponentRegistry, ComponentRequest, FnRenderable,
    Principal, Props, RenderNode, Resolver,
};

fn renderer(text: &str) -> ComponentImpl {
    let text = text.to_string();
    ComponentImpl::renderer(FnRenderable(move |_: &Props| {
        Ok(RenderNode::text(text.clone()))
    }))
}

fn register(registry: &ComponentRegistry, name: &str, text: &str, roles: &[&str]) {
    registry.register(
        ComponentRegistration::builder()
            .namespace("core")
            .name(name)
            .implementation(renderer(text))
            .allowed_roles(roles.iter().copied())
            .error_boundary(false)
            .build()
            .unwrap(),
    );
}

fn flatten(node: &RenderNode) -> String {
    match node {
        RenderNode::Text(t) => t.clone(),
        RenderNode::Element { children, .. } | RenderNode::Fragment(children) => {
            children.iter().map(flatten).collect()
        }
    }
}

fn render(implementation: &ComponentImpl) -> String {
    flatten(
        &implementation
            .as_renderable()
            .expect("renderer expected")
            .render(&Props::new())
            .unwrap(),
    )
}

#[test]
fn admin_gated_widget_substitutes_not_allowed_for_user() {
    let registry = ComponentRegistry::new();
    register(&registry, "Widget", "impl-a", &["ADMIN"]);

    let user = Principal::with_roles("u1", ["USER"]);
    let resolver = Resolver::new(&registry, &user);
    let resolved = resolver.resolve_many(&[ComponentRequest::from("core.Widget")]);

    assert_eq!(resolved.len(), 1);
    assert!(render(&resolved["Widget"]).contains("not allowed"));
}

#[test]
fn admin_receives_the_real_implementation() {
    let registry = ComponentRegistry::new();
    register(&registry, "Widget", "impl-a", &["ADMIN"]);

    let admin = Principal::with_roles("a1", ["ADMIN"]);
    let resolver = Resolver::new(&registry, &admin);
    let resolved = resolver.resolve_many(&[ComponentRequest::from("core.Widget")]);
    assert_eq!(render(&resolved["Widget"]), "impl-a");
}

#[test]
fn version_omitted_registration_resolves_version_omitted_query() {
    let registry = ComponentRegistry::new();
    // No version on either side; both sides default to 1.0.0.
    register(&registry, "Widget", "impl-a", &["*"]);

    let principal = Principal::anonymous();
    let resolver = Resolver::new(&registry, &principal);
    let found = resolver.resolve("core.Widget").unwrap();
    assert_eq!(render(&found), "impl-a");
}

#[test]
fn batch_result_has_one_key_per_resolvable_name() {
    let registry = ComponentRegistry::new();
    register(&registry, "A", "a", &["*"]);
    register(&registry, "B", "b", &["*"]);

    let principal = Principal::anonymous();
    let resolver = Resolver::new(&registry, &principal);
    let resolved = resolver.resolve_many(&[
        ComponentRequest::from("core.A"),
        ComponentRequest::from("core.B"),
        ComponentRequest::from("core.C"), // unregistered
        ComponentRequest::from(""),       // skipped
    ]);
    assert_eq!(resolved.len(), 3);
    assert_eq!(render(&resolved["A"]), "a");
    assert_eq!(render(&resolved["B"]), "b");
    assert!(render(&resolved["C"]).contains("not found"));
}

#[test]
fn late_registration_is_visible_to_subsequent_resolution() {
    let registry = ComponentRegistry::new();
    let principal = Principal::anonymous();

    {
        let resolver = Resolver::new(&registry, &principal);
        let first = resolver.resolve("core.Late").unwrap();
        assert!(render(&first).contains("not found"));
    }

    register(&registry, "Late", "finally", &["*"]);

    let resolver = Resolver::new(&registry, &principal);
    let second = resolver.resolve("core.Late").unwrap();
    assert_eq!(render(&second), "finally");
}
