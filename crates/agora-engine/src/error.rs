//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to engine callers.
///
/// Only contract and data errors appear here. Backend selection problems are
/// absorbed by [`BackendSelector`](crate::BackendSelector).
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown strategy or bad confidence level
    #[error(transparent)]
    Ranking(#[from] agora_ranking::Error),

    /// Vote value outside {-1, 0, 1}
    #[error(transparent)]
    Consensus(#[from] agora_consensus::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a backend could not be used. Never returned from [`Engine`](crate::Engine) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not be initialized on this host.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
