//! Fully-qualified component registry for Reify.
//!
//! This crate is the write-and-read core of the runtime: registrations of
//! [`Renderable`](render::Renderable) payloads keyed by
//! `namespace.name@version`, a role-based [`AccessGate`](access::AccessGate),
//! the soft-failing [`Resolver`](resolver::Resolver), and change
//! notification for consumers that asked before a component arrived.
//!
//! # Example
//!
//! ```
//! use reify_registry::access::Principal;
//! use reify_registry::registration::ComponentRegistration;
//! use reify_registry::render::{FnRenderable, Props, RenderNode};
//! use reify_registry::resolver::Resolver;
//! use reify_registry::store::ComponentRegistry;
//!
//! let registry = ComponentRegistry::new();
//! registry.register(
//!     ComponentRegistration::builder()
//!         .namespace("core")
//!         .name("Hello")
//!         .renderer(FnRenderable(|_: &Props| Ok(RenderNode::text("hello"))))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let principal = Principal::anonymous();
//! let resolver = Resolver::new(&registry, &principal);
//! assert!(resolver.resolve("core.Hello").is_ok());
//! ```

pub mod access;
pub mod error;
pub mod fqn;
pub mod notify;
pub mod registration;
pub mod render;
pub mod resolver;
pub mod store;

pub use access::{AccessGate, Membership, Principal, TenantScope};
pub use error::{FqnError, RegistryError, RenderError, ResolveError};
pub use fqn::{ComponentFqn, DEFAULT_VERSION, ensure_version};
pub use notify::{RegistryEvent, RegistryObservers, Subscription};
pub use registration::{ComponentRegistration, RegistrationBuilder, WILDCARD_ROLE};
pub use render::{
    BoundProps, ComponentImpl, ComponentKind, ContextInjected, ErrorBoundary, FnRenderable, Props,
    RenderNode, Renderable, RuntimeFunction,
};
pub use resolver::{
    ComponentRequest, NOT_ALLOWED_FQN, NOT_FOUND_FQN, Resolver, UnauthorizedPolicy,
};
pub use store::ComponentRegistry;
