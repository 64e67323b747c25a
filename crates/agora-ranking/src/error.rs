//! Error types for agora-ranking.

use thiserror::Error;

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ranking.
///
/// Data problems (empty lists, zero counts) are never errors; these are
/// contract violations by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The strategy name is not one of the known sort orders.
    #[error("unknown ranking strategy: {0:?}")]
    UnknownStrategy(String),

    /// A confidence level outside the open interval (0, 1).
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidence(f64),
}
