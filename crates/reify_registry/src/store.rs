//! The registry store.
//!
//! Maps canonical FQN strings to registration records. The store is the
//! single shared mutable structure in the runtime; it takes `&self`
//! everywhere (interior `RwLock`) so change-notification callbacks can
//! re-enter it, not because there are concurrent writers — the scheduling
//! model is single-threaded and registrations are visible to every lookup
//! performed after `register` returns.

use crate::access::AccessGate;
use crate::fqn::ComponentFqn;
use crate::notify::{RegistryEvent, RegistryObservers, Subscription};
use crate::registration::ComponentRegistration;
use crate::render::ComponentKind;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Mapping from canonical FQN string to registration record.
///
/// # Example
///
/// ```
/// use reify_registry::registration::ComponentRegistration;
/// use reify_registry::render::{FnRenderable, Props, RenderNode};
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
/// assert!(registry.get_str("core.Widget@1.0.0").is_some());
/// ```
#[derive(Default)]
pub struct ComponentRegistry {
    entries: RwLock<IndexMap<String, Arc<ComponentRegistration>>>,
    observers: RegistryObservers,
}

impl core::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("entries", &self.fqns())
            .finish()
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a registration, fully replacing any prior record under the
    /// same FQN, then emits [`RegistryEvent::ComponentRegistered`].
    ///
    /// The replacement is atomic from the reader's point of view: a lookup
    /// performed after this call returns never observes the previous
    /// implementation.
    pub fn register(&self, registration: ComponentRegistration) {
        let key = registration.key();
        let registration = Arc::new(registration);
        let replaced = {
            let mut entries = self.entries.write();
            entries.insert(key.clone(), Arc::clone(&registration)).is_some()
        };
        tracing::debug!(fqn = %key, replaced, "component registered");
        self.observers.emit(&RegistryEvent::ComponentRegistered {
            fqn: registration.fqn.clone(),
            registration,
        });
    }

    /// Returns the registration for `fqn`, if present. Pure read.
    #[must_use]
    pub fn get(&self, fqn: &ComponentFqn) -> Option<Arc<ComponentRegistration>> {
        self.entries.read().get(&fqn.to_string()).cloned()
    }

    /// Returns the registration stored under the canonical string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<Arc<ComponentRegistration>> {
        self.entries.read().get(key).cloned()
    }

    /// Returns all registrations of the given kind, in registration order.
    /// Pure read.
    #[must_use]
    pub fn list_by_kind(&self, kind: ComponentKind) -> IndexMap<String, Arc<ComponentRegistration>> {
        self.entries
            .read()
            .iter()
            .filter(|(_, reg)| reg.kind() == kind)
            .map(|(key, reg)| (key.clone(), Arc::clone(reg)))
            .collect()
    }

    /// Returns registrations whose tags match `pattern` (substring match),
    /// with the access gate applied per entry.
    ///
    /// Entries whose roles the caller lacks are silently excluded — no
    /// placeholder is substituted. This deliberately differs from single
    /// lookup, where an unauthorized match surfaces as `NotAllowed`.
    #[must_use]
    pub fn list_by_tag(
        &self,
        pattern: &str,
        gate: &AccessGate<'_>,
    ) -> Vec<Arc<ComponentRegistration>> {
        self.entries
            .read()
            .values()
            .filter(|reg| reg.tags.iter().any(|tag| tag.contains(pattern)))
            .filter(|reg| gate.has_role(&reg.allowed_roles, None, None))
            .cloned()
            .collect()
    }

    /// Subscribes to registry events. See [`RegistryObservers::subscribe`].
    pub fn on_registered(
        &self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Emits an event on the registry's bus.
    ///
    /// The injection layer uses this for [`RegistryEvent::PluginLoaded`];
    /// registration events are emitted internally by
    /// [`register`](Self::register).
    pub fn emit(&self, event: &RegistryEvent) {
        self.observers.emit(event);
    }

    /// Canonical keys of all registrations, in registration order.
    #[must_use]
    pub fn fqns(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when the registry holds no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
