//! The resolver: the read path from FQN strings to usable implementations.
//!
//! Resolution is deliberately soft-failing. Components stream in over time
//! during plugin loading, so a missing registration substitutes the
//! `NotFound` placeholder (and the change notifier tells consumers when to
//! retry); an unauthorized match substitutes `NotAllowed` or is omitted,
//! per the configured [`UnauthorizedPolicy`]. The hard errors on this path
//! are a blank identifier and one that fails to parse.

use crate::access::AccessGate;
use crate::error::ResolveError;
use crate::fqn::{ComponentFqn, ensure_version};
use crate::notify::{RegistryEvent, Subscription};
use crate::registration::ComponentRegistration;
use crate::render::{
    BoundProps, ComponentImpl, ContextInjected, ErrorBoundary, FnRenderable, Props, RenderNode,
    Renderable,
};
use crate::store::ComponentRegistry;
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;

/// FQN of the "not found" placeholder registration.
pub const NOT_FOUND_FQN: &str = "core.NotFound@1.0.0";

/// FQN of the "not allowed" placeholder registration.
pub const NOT_ALLOWED_FQN: &str = "core.NotAllowed@1.0.0";

/// What a batch lookup does with a match the caller may not receive.
///
/// The two behaviors both exist in the wild (single lookup substitutes,
/// tag listing omits); this makes the choice an explicit configuration
/// instead of a per-call accident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnauthorizedPolicy {
    /// Replace the implementation with the `NotAllowed` placeholder.
    #[default]
    Substitute,
    /// Silently drop the entry from the result mapping.
    Omit,
}

/// A single entry in a batch resolution request.
#[derive(Debug, Clone)]
pub enum ComponentRequest {
    /// Just an FQN string.
    Fqn(String),
    /// An FQN plus props the caller wants threaded to the renderer.
    Detailed {
        /// The FQN string.
        fqn: String,
        /// Caller props, bound to the resolved renderer as call-site
        /// defaults (render-time props still win).
        props: Props,
    },
}

impl ComponentRequest {
    /// The FQN string of this request.
    #[must_use]
    pub fn fqn(&self) -> &str {
        match self {
            Self::Fqn(fqn) | Self::Detailed { fqn, .. } => fqn,
        }
    }

    /// The caller props of this request, when it carries any.
    #[must_use]
    pub fn props(&self) -> Option<&Props> {
        match self {
            Self::Fqn(_) => None,
            Self::Detailed { props, .. } => Some(props),
        }
    }
}

impl From<&str> for ComponentRequest {
    fn from(fqn: &str) -> Self {
        Self::Fqn(fqn.to_string())
    }
}

impl From<String> for ComponentRequest {
    fn from(fqn: String) -> Self {
        Self::Fqn(fqn)
    }
}

/// The public lookup API combining store, identifier model, and access gate.
///
/// # Example
///
/// ```
/// use reify_registry::access::Principal;
/// use reify_registry::registration::ComponentRegistration;
/// use reify_registry::render::{FnRenderable, Props, RenderNode};
/// use reify_registry::resolver::Resolver;
/// use reify_registry::store::ComponentRegistry;
///
/// let registry = ComponentRegistry::new();
/// registry.register(
///     ComponentRegistration::builder()
///         .namespace("core")
///         .name("Widget")
///         .renderer(FnRenderable(|_: &Props| Ok(RenderNode::text("w"))))
///         .build()
///         .unwrap(),
/// );
///
/// let principal = Principal::anonymous();
/// let resolver = Resolver::new(&registry, &principal);
/// let widget = resolver.resolve("core.Widget").unwrap();
/// assert!(widget.as_renderable().is_some());
/// ```
pub struct Resolver<'a> {
    registry: &'a ComponentRegistry,
    gate: AccessGate<'a>,
    context: Props,
    policy: UnauthorizedPolicy,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a registry for the given principal.
    #[must_use]
    pub fn new(registry: &'a ComponentRegistry, principal: &'a crate::access::Principal) -> Self {
        Self {
            registry,
            gate: AccessGate::new(principal),
            context: Props::new(),
            policy: UnauthorizedPolicy::default(),
        }
    }

    /// Sets the ambient context values injected into renderers that
    /// request context injection.
    #[must_use]
    pub fn with_context(mut self, context: Props) -> Self {
        self.context = context;
        self
    }

    /// Sets the unauthorized-match policy for batch lookups.
    #[must_use]
    pub fn with_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        self.registry
    }

    /// The access gate this resolver consults.
    #[must_use]
    pub fn gate(&self) -> &AccessGate<'a> {
        &self.gate
    }

    /// The ambient context values this resolver injects.
    #[must_use]
    pub fn context(&self) -> &Props {
        &self.context
    }

    /// Resolves a single FQN to an implementation.
    ///
    /// Missing registrations substitute the `NotFound` placeholder — this
    /// path never fails for "not found", since unresolved components are
    /// routine during progressive plugin loading. Single lookup applies no
    /// access gating (batch lookup does).
    ///
    /// # Errors
    ///
    /// [`ResolveError::MissingIdentifier`] when `fqn` is empty or blank,
    /// [`ResolveError::Fqn`] when the identifier fails to parse (empty
    /// segments). A separator-free identifier is accepted via the legacy
    /// single-segment accommodation and is not a parse error.
    pub fn resolve(&self, fqn: &str) -> Result<ComponentImpl, ResolveError> {
        if fqn.trim().is_empty() {
            return Err(ResolveError::MissingIdentifier);
        }
        let parsed = ComponentFqn::parse(&ensure_version(fqn))?;
        match self.registry.get(&parsed) {
            Some(registration) => Ok(self.decorate(&registration, None)),
            None => {
                tracing::debug!(fqn = %parsed, "component not registered, substituting NotFound");
                Ok(self.not_found())
            }
        }
    }

    /// Resolves a batch of requests into `logical name → implementation`.
    ///
    /// Never fails. Keys are the registrations' `name` fields (or the
    /// parsed name for absent entries) — callers must not assume FQN keys
    /// or insertion order beyond what the request order provides.
    /// Unauthorized matches follow the configured [`UnauthorizedPolicy`];
    /// absent matches substitute `NotFound`; blank entries are skipped
    /// with a warning.
    #[must_use]
    pub fn resolve_many(&self, requests: &[ComponentRequest]) -> IndexMap<String, ComponentImpl> {
        let mut resolved = IndexMap::new();
        for request in requests {
            let fqn = request.fqn();
            if fqn.trim().is_empty() {
                tracing::warn!("skipping blank identifier in batch resolution");
                continue;
            }
            let parsed = match ComponentFqn::parse(&ensure_version(fqn)) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!(fqn, %err, "skipping malformed identifier in batch resolution");
                    continue;
                }
            };
            match self.registry.get(&parsed) {
                Some(registration) => {
                    let name = registration.fqn.name().to_string();
                    if self.gate.has_role(&registration.allowed_roles, None, None) {
                        resolved.insert(name, self.decorate(&registration, request.props()));
                    } else {
                        match self.policy {
                            UnauthorizedPolicy::Substitute => {
                                tracing::debug!(fqn = %parsed, "unauthorized, substituting NotAllowed");
                                resolved.insert(name, self.not_allowed());
                            }
                            UnauthorizedPolicy::Omit => {
                                tracing::debug!(fqn = %parsed, "unauthorized, omitting");
                            }
                        }
                    }
                }
                None => {
                    resolved.insert(parsed.name().to_string(), self.not_found());
                }
            }
        }
        resolved
    }

    /// Re-resolves `fqn` whenever a registration event lands for it,
    /// invoking `on_ready` with the fresh implementation.
    ///
    /// This is the retry path for consumers that received `NotFound` while
    /// a plugin was still loading. The caller owns the subscription and
    /// decides when to stop listening.
    pub fn watch(
        registry: &ComponentRegistry,
        fqn: &str,
        on_ready: impl Fn(Arc<ComponentRegistration>) + Send + Sync + 'static,
    ) -> Subscription {
        let wanted = ensure_version(fqn);
        registry.on_registered(move |event| {
            if let RegistryEvent::ComponentRegistered { fqn, registration } = event
                && fqn.to_string() == wanted
            {
                on_ready(Arc::clone(registration));
            }
        })
    }

    /// Applies the decorator chain to a registration's implementation.
    ///
    /// Order is fixed and explicit: context injection innermost (when
    /// requested), then request props bound as defaults (when given), error
    /// boundary outermost (when requested). Function payloads pass through
    /// untouched.
    fn decorate(&self, registration: &ComponentRegistration, props: Option<&Props>) -> ComponentImpl {
        let rewrap = |renderer: &Arc<dyn Renderable>| -> Arc<dyn Renderable> {
            let mut wrapped = Arc::clone(renderer);
            if registration.requires_context_injection {
                wrapped = Arc::new(ContextInjected::new(wrapped, self.context.clone()));
            }
            if let Some(props) = props.filter(|p| !p.is_empty()) {
                wrapped = Arc::new(BoundProps::new(wrapped, props.clone()));
            }
            if registration.requires_error_boundary {
                wrapped = Arc::new(ErrorBoundary::new(wrapped));
            }
            wrapped
        };
        match &registration.implementation {
            ComponentImpl::Renderer(r) => ComponentImpl::Renderer(rewrap(r)),
            ComponentImpl::Form(r) => ComponentImpl::Form(rewrap(r)),
            function @ ComponentImpl::Function(_) => function.clone(),
        }
    }

    /// The `NotFound` placeholder: the registered one when present, else a
    /// synthesized inline renderer.
    fn not_found(&self) -> ComponentImpl {
        self.placeholder(NOT_FOUND_FQN, "component not found")
    }

    /// The `NotAllowed` placeholder: the registered one when present, else
    /// a synthesized inline renderer.
    fn not_allowed(&self) -> ComponentImpl {
        self.placeholder(NOT_ALLOWED_FQN, "component not allowed")
    }

    fn placeholder(&self, fqn: &str, message: &str) -> ComponentImpl {
        if let Some(registration) = self.registry.get_str(fqn) {
            return registration.implementation.clone();
        }
        let message = message.to_string();
        ComponentImpl::Renderer(Arc::new(FnRenderable(move |_: &Props| {
            Ok(RenderNode::element("div")
                .with_attr("role", "note")
                .with_child(RenderNode::text(message.clone())))
        })))
    }
}
