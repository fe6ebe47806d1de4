//! Structured logging setup.
//!
//! Hosts call [`init`] once at startup; everything below it just emits
//! `tracing` events. Re-initialization is a no-op so embedded and test
//! usage never panics over an already-installed subscriber.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryConfig {
    /// Maximum log level (`error` .. `trace`).
    pub level: String,
    /// Output format.
    pub format: TelemetryFormat,
    /// Target-specific filter (`reify=debug,hyper=warn`); overrides
    /// `level` when set.
    pub filter: Option<String>,
    /// Whether to include span enter/exit events.
    pub span_events: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: TelemetryFormat::default(),
            filter: None,
            span_events: false,
        }
    }
}

/// Installs the global `tracing` subscriber per `config`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &TelemetryConfig) {
    let env_filter = match &config.filter {
        Some(filter) => {
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(&config.level))
        }
        None => EnvFilter::new(&config.level),
    };

    let span_events = if config.span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    match config.format {
        TelemetryFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()
                .ok();
        }
        TelemetryFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()
                .ok();
        }
        TelemetryFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()
                .ok();
        }
    }

    tracing::debug!(level = %config.level, format = ?config.format, "telemetry initialized");
}
