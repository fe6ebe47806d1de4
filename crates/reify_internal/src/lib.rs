//! # Reify Internal Library
//!
//! Re-exports the core Reify crates for convenience.

/// Layer 1: FQN component registry, access gate, and resolver.
pub use reify_registry;

/// Layer 2: schema-driven field and container resolution.
pub use reify_forms;

/// Layer 3: runtime context, extensions, and plugin injection.
pub use reify_runtime;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use reify_forms::field::{FieldKind, FieldResolver, FieldSet, ResolvedField};
    pub use reify_forms::presentation::PresentationNode;
    pub use reify_forms::schema::{PropertyPath, SchemaKind, SchemaNode};
    pub use reify_registry::access::{Principal, TenantScope};
    pub use reify_registry::fqn::ComponentFqn;
    pub use reify_registry::registration::ComponentRegistration;
    pub use reify_registry::render::{
        ComponentImpl, ComponentKind, FnRenderable, Props, RenderNode, Renderable,
        RuntimeFunction,
    };
    pub use reify_registry::resolver::{ComponentRequest, Resolver, UnauthorizedPolicy};
    pub use reify_registry::store::ComponentRegistry;
    pub use reify_runtime::config::RuntimeConfig;
    pub use reify_runtime::context::RuntimeContext;
    pub use reify_runtime::extensions::Extensions;
    pub use reify_runtime::inject::{PluginDescriptor, ResourceDescriptor};
}
