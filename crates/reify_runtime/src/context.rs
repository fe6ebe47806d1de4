//! The runtime context: one explicit value owning the registry, the host
//! extensions, and the configuration.
//!
//! There is no ambient singleton. A host constructs a context, threads it
//! (or an `Arc` of it) to wherever resolution happens, and two contexts in
//! one process never share state.

use crate::config::RuntimeConfig;
use crate::extensions::Extensions;
use reify_registry::access::{AccessGate, Principal};
use reify_registry::error::RegistryError;
use reify_registry::registration::ComponentRegistration;
use reify_registry::render::{FnRenderable, Props, RenderNode};
use reify_registry::resolver::Resolver;
use reify_registry::store::ComponentRegistry;
use serde_json::Value;

/// FQN of the default plugin loader function.
pub const PLUGIN_LOADER_FQN: &str = "core.PluginLoader@1.0.0";

/// FQN of the default resource loader function.
pub const RESOURCE_LOADER_FQN: &str = "core.ResourceLoader@1.0.0";

/// The explicit runtime value everything else hangs off.
///
/// # Example
///
/// ```
/// use reify_registry::access::Principal;
/// use reify_runtime::context::RuntimeContext;
///
/// let ctx = RuntimeContext::builder()
///     .principal(Principal::with_roles("u1", ["USER"]))
///     .build()
///     .unwrap();
/// let resolver = ctx.resolver();
/// // The placeholders are pre-registered, so even a cold registry
/// // resolves everything to something renderable.
/// assert!(resolver.resolve("made.Up").is_ok());
/// ```
pub struct RuntimeContext {
    registry: ComponentRegistry,
    principal: Principal,
    extensions: Extensions,
    config: RuntimeConfig,
    context_props: Props,
}

impl RuntimeContext {
    /// Starts building a context.
    #[must_use]
    pub fn builder() -> RuntimeContextBuilder {
        RuntimeContextBuilder::default()
    }

    /// The component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The host extensions.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The runtime configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The acting principal this context was built for.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// An access gate over the context's principal.
    #[must_use]
    pub fn gate(&self) -> AccessGate<'_> {
        AccessGate::new(&self.principal)
    }

    /// Registers a component. Shorthand for going through
    /// [`registry`](Self::registry).
    pub fn register(&self, registration: ComponentRegistration) {
        self.registry.register(registration);
    }

    /// A resolver for the context's principal, carrying its injection
    /// props and unauthorized-match policy.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.principal)
            .with_context(self.context_props.clone())
            .with_policy(self.config.unauthorized_policy)
    }
}

/// Builder for [`RuntimeContext`].
#[derive(Default)]
pub struct RuntimeContextBuilder {
    config: RuntimeConfig,
    principal: Option<Principal>,
    context_props: Props,
    extensions: Extensions,
}

impl RuntimeContextBuilder {
    /// Sets the runtime configuration.
    #[must_use]
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the acting principal (defaults to anonymous).
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Adds one ambient context value injected into renderers that
    /// request context injection.
    #[must_use]
    pub fn context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context_props.set(key, value);
        self
    }

    /// Installs a typed host extension.
    #[must_use]
    pub fn extension<T: Send + Sync + 'static>(mut self, extension: T) -> Self {
        self.extensions.insert(extension);
        self
    }

    /// Builds the context and seeds the registry with the placeholder
    /// components and the default loaders. Hosts replace any of them by
    /// registering under the same FQN.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if a seed registration fails to build.
    pub fn build(self) -> Result<RuntimeContext, RegistryError> {
        let registry = ComponentRegistry::new();
        seed_registry(&registry)?;
        Ok(RuntimeContext {
            registry,
            principal: self.principal.unwrap_or_else(Principal::anonymous),
            extensions: self.extensions,
            config: self.config,
            context_props: self.context_props,
        })
    }
}

/// Registers the placeholders and the default loaders.
fn seed_registry(registry: &ComponentRegistry) -> Result<(), RegistryError> {
    registry.register(placeholder_registration("NotFound", "component not found")?);
    registry.register(placeholder_registration(
        "NotAllowed",
        "component not allowed",
    )?);
    registry.register(default_loader("PluginLoader")?);
    registry.register(default_loader("ResourceLoader")?);
    Ok(())
}

fn placeholder_registration(
    name: &str,
    message: &str,
) -> Result<ComponentRegistration, RegistryError> {
    let message = message.to_string();
    ComponentRegistration::builder()
        .namespace("core")
        .name(name)
        .renderer(FnRenderable(move |_: &Props| {
            Ok(RenderNode::element("div")
                .with_attr("role", "note")
                .with_child(RenderNode::text(message.clone())))
        }))
        .tags(["core"])
        .error_boundary(false)
        .build()
}

/// The default loaders acknowledge a descriptor without fetching anything:
/// actual transport (filesystem, network) belongs to the host, which
/// overrides these registrations with loaders that do real work.
fn default_loader(name: &str) -> Result<ComponentRegistration, RegistryError> {
    ComponentRegistration::builder()
        .namespace("core")
        .name(name)
        .function(|_: &ComponentRegistry, args: Props| {
            let id = args
                .get("descriptor")
                .and_then(|d| d.get("id"))
                .cloned()
                .unwrap_or(Value::Null);
            tracing::info!(descriptor = %id, "default loader acknowledged descriptor");
            Ok(serde_json::json!({ "id": id, "status": "acknowledged" }))
        })
        .tags(["core"])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reify_registry::render::ComponentKind;

    #[test]
    fn build_seeds_placeholders_and_loaders() {
        let ctx = RuntimeContext::builder().build().unwrap();
        let registry = ctx.registry();

        assert!(registry.get_str("core.NotFound@1.0.0").is_some());
        assert!(registry.get_str("core.NotAllowed@1.0.0").is_some());
        assert_eq!(
            registry.get_str(PLUGIN_LOADER_FQN).unwrap().kind(),
            ComponentKind::Function
        );
        assert_eq!(
            registry.get_str(RESOURCE_LOADER_FQN).unwrap().kind(),
            ComponentKind::Function
        );
    }

    #[test]
    fn contexts_are_isolated() {
        let a = RuntimeContext::builder().build().unwrap();
        let b = RuntimeContext::builder().build().unwrap();

        a.register(
            ComponentRegistration::builder()
                .namespace("app")
                .name("OnlyInA")
                .renderer(FnRenderable(|_: &Props| Ok(RenderNode::text("a"))))
                .build()
                .unwrap(),
        );

        assert!(a.registry().get_str("app.OnlyInA@1.0.0").is_some());
        assert!(b.registry().get_str("app.OnlyInA@1.0.0").is_none());
    }

    #[test]
    fn resolver_carries_context_values() {
        let ctx = RuntimeContext::builder()
            .context_value("theme", "dark")
            .build()
            .unwrap();
        let resolver = ctx.resolver();
        assert_eq!(
            resolver.context().get("theme"),
            Some(&Value::from("dark"))
        );
    }

    #[test]
    fn gate_uses_the_context_principal() {
        let ctx = RuntimeContext::builder()
            .principal(Principal::with_roles("u1", ["USER"]))
            .build()
            .unwrap();
        let required = vec!["USER".to_string()];
        assert!(ctx.gate().has_role(&required, None, None));
        let admin = vec!["ADMIN".to_string()];
        assert!(!ctx.gate().has_role(&admin, None, None));
    }

    #[test]
    fn extensions_are_reachable_through_the_context() {
        struct ApiBase(String);

        let ctx = RuntimeContext::builder()
            .extension(ApiBase("https://api.local".to_string()))
            .build()
            .unwrap();
        assert_eq!(
            ctx.extensions().get::<ApiBase>().unwrap().0,
            "https://api.local"
        );
    }
}
