//! Typed extension storage.
//!
//! Hosts attach arbitrary shared state to a [`RuntimeContext`] — API
//! clients, caches, theme tables — keyed by type. Entries are installed
//! once through the context builder and accessed afterwards through RAII
//! guards; each entry carries its own lock, so reads and writes of
//! different extension types never contend.
//!
//! [`RuntimeContext`]: crate::context::RuntimeContext

use core::any::{Any, TypeId};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// State a host may attach to the runtime context.
///
/// Blanket-implemented for every `Send + Sync + 'static` type.
pub trait Extension: Send + Sync + 'static {
    /// Type name for diagnostics.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Send + Sync + 'static> Extension for T {}

/// Errors from extension access.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// No extension of the requested type was installed.
    #[error("extension not found: {0}")]
    NotFound(&'static str),

    /// The extension is borrowed in a conflicting way.
    #[error("extension already borrowed: {0}")]
    BorrowConflict(&'static str),
}

struct ExtensionEntry {
    data: RwLock<Box<dyn Any + Send + Sync>>,
}

impl ExtensionEntry {
    fn new<T: Extension>(extension: T) -> Self {
        Self {
            data: RwLock::new(Box::new(extension)),
        }
    }
}

/// Type-keyed container of host extensions.
///
/// Insertions take `&mut self` and happen during context construction;
/// lookups take `&self` and are safe from any thread. Mutation after
/// construction goes through [`get_mut`](Self::get_mut), which locks only
/// the one entry.
#[derive(Default)]
pub struct Extensions {
    storage: HashMap<TypeId, ExtensionEntry>,
}

impl Extensions {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Installs an extension, replacing any previous value of the same
    /// type.
    pub fn insert<T: Extension>(&mut self, extension: T) {
        self.storage
            .insert(TypeId::of::<T>(), ExtensionEntry::new(extension));
    }

    /// True when an extension of type `T` is installed.
    #[must_use]
    pub fn contains<T: Extension>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<T>())
    }

    /// Read access to an extension.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::NotFound`] when `T` was never installed,
    /// [`ExtensionError::BorrowConflict`] while a write guard is live.
    pub fn get<T: Extension>(&self) -> Result<ExtensionRef<'_, T>, ExtensionError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&TypeId::of::<T>())
            .ok_or(ExtensionError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_read()
            .ok_or(ExtensionError::BorrowConflict(type_name))?;
        Ok(ExtensionRef {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Write access to an extension.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::NotFound`] when `T` was never installed,
    /// [`ExtensionError::BorrowConflict`] while any guard is live.
    pub fn get_mut<T: Extension>(&self) -> Result<ExtensionRefMut<'_, T>, ExtensionError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&TypeId::of::<T>())
            .ok_or(ExtensionError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_write()
            .ok_or(ExtensionError::BorrowConflict(type_name))?;
        Ok(ExtensionRefMut {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Removes an extension and returns it.
    pub fn remove<T: Extension>(&mut self) -> Option<T> {
        self.storage
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.data.into_inner().downcast::<T>().ok().map(|b| *b))
    }

    /// Number of installed extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True when nothing is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// RAII read guard over one extension.
pub struct ExtensionRef<'a, T: Extension> {
    guard: RwLockReadGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a T>,
}

impl<T: Extension> core::ops::Deref for ExtensionRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // The entry was keyed by TypeId::of::<T>().
        self.guard
            .downcast_ref::<T>()
            .expect("extension entry does not match its TypeId key")
    }
}

/// RAII write guard over one extension.
pub struct ExtensionRefMut<'a, T: Extension> {
    guard: RwLockWriteGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a mut T>,
}

impl<T: Extension> core::ops::Deref for ExtensionRefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.guard
            .downcast_ref::<T>()
            .expect("extension entry does not match its TypeId key")
    }
}

impl<T: Extension> core::ops::DerefMut for ExtensionRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
            .downcast_mut::<T>()
            .expect("extension entry does not match its TypeId key")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Theme {
        name: String,
    }

    struct SessionStore {
        writes: usize,
    }

    #[test]
    fn insert_and_get() {
        let mut extensions = Extensions::new();
        extensions.insert(Theme {
            name: "dark".to_string(),
        });
        assert_eq!(extensions.get::<Theme>().unwrap().name, "dark");
    }

    #[test]
    fn get_mut_modifies_through_shared_ref() {
        let mut extensions = Extensions::new();
        extensions.insert(SessionStore { writes: 0 });

        {
            let mut sessions = extensions.get_mut::<SessionStore>().unwrap();
            sessions.writes += 5;
        }
        assert_eq!(extensions.get::<SessionStore>().unwrap().writes, 5);
    }

    #[test]
    fn missing_extension_is_not_found() {
        let extensions = Extensions::new();
        assert!(matches!(
            extensions.get::<Theme>(),
            Err(ExtensionError::NotFound(_))
        ));
    }

    #[test]
    fn write_guard_blocks_readers_until_dropped() {
        let mut extensions = Extensions::new();
        extensions.insert(SessionStore { writes: 1 });

        {
            let _writer = extensions.get_mut::<SessionStore>().unwrap();
            assert!(matches!(
                extensions.get::<SessionStore>(),
                Err(ExtensionError::BorrowConflict(_))
            ));
        }
        assert!(extensions.get::<SessionStore>().is_ok());
    }

    #[test]
    fn independent_types_do_not_contend() {
        let mut extensions = Extensions::new();
        extensions.insert(SessionStore { writes: 1 });
        extensions.insert(Theme {
            name: "light".to_string(),
        });

        let _writer = extensions.get_mut::<SessionStore>().unwrap();
        assert!(extensions.get::<Theme>().is_ok());
    }

    #[test]
    fn remove_returns_value() {
        let mut extensions = Extensions::new();
        extensions.insert(Theme {
            name: "dark".to_string(),
        });
        let removed = extensions.remove::<Theme>();
        assert_eq!(
            removed,
            Some(Theme {
                name: "dark".to_string()
            })
        );
        assert!(extensions.is_empty());
    }
}
