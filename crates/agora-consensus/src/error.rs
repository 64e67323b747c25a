//! Error types for agora-consensus.

use thiserror::Error;

/// Result type for consensus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a vote matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A vote value outside {-1, 0, 1}.
    #[error("invalid vote {value} from {participant_id:?} on {statement_id:?}: expected -1, 0 or 1")]
    InvalidVote {
        participant_id: String,
        statement_id: String,
        value: i64,
    },
}
