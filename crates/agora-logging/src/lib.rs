//! Logging setup for Agora binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once at
//! startup. The filter comes from `RUST_LOG`, falling back to the default
//! given by the caller. `AGORA_LOG_FORMAT=json` switches to one JSON object
//! per line.

use std::str::FromStr;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "AGORA_LOG_FORMAT";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    /// Format from `AGORA_LOG_FORMAT`; unset or unrecognized means text.
    pub fn from_env() -> Self {
        std::env::var(FORMAT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Filter from `RUST_LOG`, or `default_filter` when unset or invalid.
pub fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn try_init(default_filter: &str, format: LogFormat) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(filter(default_filter));
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}

/// Install the global subscriber with the format from the environment.
/// Later calls are no-ops.
pub fn init(default_filter: &str) {
    let _ = try_init(default_filter, LogFormat::from_env());
}
