//! A dynamic UI-component resolution runtime for schema-driven forms.
//!

pub use reify_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use reify_internal::prelude::*;
}
