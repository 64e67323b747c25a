//! Backend selection with silent degradation.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{Backend, BackendPreference, FallbackBackend, NativeBackend};
use crate::config::EngineConfig;
use crate::error::BackendError;

/// Picks the backend once, at engine construction.
///
/// If the native pool cannot start, the fallback is used instead and the
/// caller never sees the failure; only the log records it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendSelector {
    preference: BackendPreference,
    threads: Option<usize>,
}

impl BackendSelector {
    /// Create a selector for a preference.
    pub fn new(preference: BackendPreference) -> Self {
        Self {
            preference,
            threads: None,
        }
    }

    /// Selector matching an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            preference: config.backend,
            threads: config.native_threads,
        }
    }

    /// Builder: Set native worker count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn preference(&self) -> BackendPreference {
        self.preference
    }

    /// Select a backend, probing the native pool if allowed.
    pub fn select(&self) -> Arc<dyn Backend> {
        let threads = self.threads;
        self.select_with(|| NativeBackend::start(threads))
    }

    /// Select a backend using `start` to launch the native one.
    pub fn select_with<P>(&self, start: P) -> Arc<dyn Backend>
    where
        P: FnOnce() -> Result<NativeBackend, BackendError>,
    {
        if self.preference == BackendPreference::Fallback {
            debug!("Native backend disabled by configuration, using fallback");
            return Arc::new(FallbackBackend);
        }

        match start() {
            Ok(native) => {
                debug!(threads = native.threads(), "Selected native backend");
                Arc::new(native)
            }
            Err(e) => {
                if self.preference == BackendPreference::Native {
                    warn!(error = %e, "Native backend requested but unavailable, using fallback");
                } else {
                    debug!(error = %e, "Native backend unavailable, using fallback");
                }
                Arc::new(FallbackBackend)
            }
        }
    }
}
