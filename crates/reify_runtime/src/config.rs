//! Runtime configuration.

use crate::telemetry::TelemetryConfig;
use reify_registry::fqn::DEFAULT_VERSION;
use reify_registry::resolver::UnauthorizedPolicy;
use serde::Deserialize;

/// Host-supplied runtime settings, usually deserialized from a JSON
/// config file. Every field has a default so an empty object is a valid
/// configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Version assumed for identifiers that omit one.
    pub default_version: String,
    /// What batch resolution does with unauthorized matches.
    pub unauthorized_policy: UnauthorizedPolicy,
    /// Logging setup; applied only when the host calls
    /// [`telemetry::init`](crate::telemetry::init).
    pub telemetry: TelemetryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            unauthorized_policy: UnauthorizedPolicy::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}
