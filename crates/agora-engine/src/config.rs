//! Engine configuration.
//!
//! Settings come from three places, in increasing precedence: built-in
//! defaults, a JSON file, and `AGORA_*` environment variables.

use std::path::Path;
use std::str::FromStr;

use agora_consensus::{ClusterConfig, ClusterCount};
use agora_ranking::ScoreConfig;
use serde::{Deserialize, Serialize};

use crate::backend::BackendPreference;
use crate::error::{Error, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ranking weights
    pub scoring: ScoreConfig,
    /// k-means settings
    pub clustering: ClusterConfig,
    /// Which backend to try first
    pub backend: BackendPreference,
    /// Worker threads for the native backend (`None` = one per core)
    pub native_threads: Option<usize>,
}

impl EngineConfig {
    /// Load from `AGORA_*` environment variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Defaults, then the JSON file at `path` if given, then `AGORA_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.overlay(|key| std::env::var(key).ok())
    }

    /// Load a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply variables from `lookup` over `self`.
    ///
    /// Recognized keys: `AGORA_REPLY_WEIGHT`, `AGORA_REPOST_WEIGHT`,
    /// `AGORA_GRAVITY`, `AGORA_WILSON_Z`, `AGORA_CONFIDENCE` (overrides
    /// `AGORA_WILSON_Z`), `AGORA_CLUSTERS` (`auto` or a count),
    /// `AGORA_MAX_ITERATIONS`, `AGORA_BACKEND` and `AGORA_NATIVE_THREADS`.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(weight) = parse_var(&lookup, "AGORA_REPLY_WEIGHT")? {
            self.scoring = self.scoring.with_reply_weight(weight);
        }
        if let Some(weight) = parse_var(&lookup, "AGORA_REPOST_WEIGHT")? {
            self.scoring = self.scoring.with_repost_weight(weight);
        }
        if let Some(gravity) = parse_var(&lookup, "AGORA_GRAVITY")? {
            self.scoring = self.scoring.with_gravity(gravity);
        }
        if let Some(z) = parse_var(&lookup, "AGORA_WILSON_Z")? {
            self.scoring = self.scoring.with_wilson_z(z);
        }
        if let Some(level) = parse_var(&lookup, "AGORA_CONFIDENCE")? {
            self.scoring = self.scoring.with_confidence(level)?;
        }
        if let Some(raw) = lookup("AGORA_CLUSTERS") {
            self.clustering.count = parse_cluster_count(&raw)?;
        }
        if let Some(max) = parse_var(&lookup, "AGORA_MAX_ITERATIONS")? {
            self.clustering = self.clustering.with_max_iterations(max);
        }
        if let Some(backend) = parse_var(&lookup, "AGORA_BACKEND")? {
            self.backend = backend;
        }
        if let Some(threads) = parse_var(&lookup, "AGORA_NATIVE_THREADS")? {
            self.native_threads = Some(threads);
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values no strategy can work with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if !s.is_finite() {
            return Err(Error::Config("scoring weights must be finite".to_string()));
        }
        if s.gravity < 0.0 {
            return Err(Error::Config(format!("gravity must be >= 0, got {}", s.gravity)));
        }
        if s.wilson_z < 0.0 {
            return Err(Error::Config(format!("wilson_z must be >= 0, got {}", s.wilson_z)));
        }
        if self.clustering.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be >= 1".to_string()));
        }
        if self.native_threads == Some(0) {
            return Err(Error::Config("native_threads must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Builder: Set scoring weights.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoreConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Builder: Set clustering settings.
    #[must_use]
    pub fn with_clustering(mut self, clustering: ClusterConfig) -> Self {
        self.clustering = clustering;
        self
    }

    /// Builder: Set backend preference.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Builder: Set native worker count.
    #[must_use]
    pub fn with_native_threads(mut self, threads: usize) -> Self {
        self.native_threads = Some(threads);
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid {}: {:?}", key, raw))),
    }
}

fn parse_cluster_count(raw: &str) -> Result<ClusterCount> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(ClusterCount::Auto);
    }
    raw.parse()
        .map(ClusterCount::Fixed)
        .map_err(|_| Error::Config(format!("invalid AGORA_CLUSTERS: {:?}", raw)))
}
