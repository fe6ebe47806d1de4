//! Registry change notification.
//!
//! Consumers that asked for a component before it was registered subscribe
//! here and re-resolve when [`RegistryEvent::ComponentRegistered`] fires.
//! Subscriptions are id-keyed with deterministic unsubscribe, so listeners
//! never accumulate unbounded across re-renders.

use crate::fqn::ComponentFqn;
use crate::registration::ComponentRegistration;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Events emitted by the registry and injection layers.
#[derive(Clone)]
pub enum RegistryEvent {
    /// A registration was stored (or replaced) under `fqn`.
    ComponentRegistered {
        /// The canonical identifier of the stored record.
        fqn: ComponentFqn,
        /// The record as stored.
        registration: Arc<ComponentRegistration>,
    },
    /// A plugin descriptor was handed to its loader.
    PluginLoaded {
        /// The descriptor id.
        id: String,
    },
}

impl core::fmt::Debug for RegistryEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ComponentRegistered { fqn, .. } => {
                f.debug_struct("ComponentRegistered").field("fqn", fqn).finish()
            }
            Self::PluginLoaded { id } => f.debug_struct("PluginLoaded").field("id", id).finish(),
        }
    }
}

type BoxedObserver = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

/// The observer list shared by a registry.
///
/// Emission snapshots the current observers before invoking them, so a
/// callback may re-enter the registry (the designed retry path is to
/// re-resolve from inside a `ComponentRegistered` callback).
#[derive(Default)]
pub struct RegistryObservers {
    entries: Arc<RwLock<HashMap<u64, BoxedObserver>>>,
    next_id: AtomicU64,
}

impl RegistryObservers {
    /// Creates an empty observer list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a callback to every emitted event.
    ///
    /// The returned [`Subscription`] removes the callback when
    /// [`unsubscribe`](Subscription::unsubscribe) is called; dropping the
    /// handle without unsubscribing leaves the callback installed.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(id, Arc::new(callback));
        Subscription {
            id,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Emits an event to all current subscribers.
    pub fn emit(&self, event: &RegistryEvent) {
        // Snapshot under the read lock, invoke outside it.
        let snapshot: Vec<BoxedObserver> = self.entries.read().values().cloned().collect();
        for observer in snapshot {
            observer(event);
        }
    }

    /// Number of installed observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when no observers are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Handle for a single subscription.
pub struct Subscription {
    id: u64,
    entries: Arc<RwLock<HashMap<u64, BoxedObserver>>>,
}

impl Subscription {
    /// Removes the callback. Idempotent by construction: the handle is
    /// consumed.
    pub fn unsubscribe(self) {
        self.entries.write().remove(&self.id);
    }
}
