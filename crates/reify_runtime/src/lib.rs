//! Runtime assembly for Reify: the explicit [`RuntimeContext`], typed host
//! [`Extensions`], descriptor-driven plugin/resource injection, and the
//! configuration and telemetry surface.
//!
//! [`RuntimeContext`]: context::RuntimeContext
//! [`Extensions`]: extensions::Extensions

pub mod config;
pub mod context;
pub mod extensions;
pub mod inject;
pub mod telemetry;

pub use config::RuntimeConfig;
pub use context::{PLUGIN_LOADER_FQN, RESOURCE_LOADER_FQN, RuntimeContext, RuntimeContextBuilder};
pub use extensions::{Extension, ExtensionError, ExtensionRef, ExtensionRefMut, Extensions};
pub use inject::{InjectError, PluginDescriptor, ResourceDescriptor, ResourceKind};
pub use telemetry::{TelemetryConfig, TelemetryFormat};
