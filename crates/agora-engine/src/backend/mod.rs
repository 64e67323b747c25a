//! Computation backends.
//!
//! A backend supplies the embarrassingly parallel maps of the pipeline:
//! per-item scores, per-statement statistics, per-participant vectors and
//! the k-means assignment step. Everything order-sensitive (sorting, centroid
//! sums, cluster labelling) lives in the provided methods of [`Backend`], so
//! two backends that compute the maps correctly produce the same output.

mod fallback;
mod native;
mod selector;

use std::fmt;
use std::str::FromStr;

use agora_consensus::{
    assemble, build_clusters, log_outcome, ClusterConfig, ConsensusResult, KMeansOutcome,
    StatementResult, VoteMatrix,
};
use agora_ranking::{rank_scores, ScorableItem, ScoreContext, ScoredItem, SortStrategy};
use serde::{Deserialize, Serialize};

pub use fallback::FallbackBackend;
pub use native::NativeBackend;
pub use selector::BackendSelector;

/// Which implementation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Multi-threaded
    Native,
    /// Single-threaded, always available
    Fallback,
}

impl BackendKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configured backend choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Native when it initializes, otherwise fallback
    #[default]
    Auto,
    /// Same as `Auto`, but a failed start is logged as a warning
    Native,
    /// Never start the native backend
    Fallback,
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "native" => Ok(Self::Native),
            "fallback" => Ok(Self::Fallback),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

/// Executor for the engine's pure maps.
pub trait Backend: fmt::Debug + Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Score every item, in input order.
    fn score(&self, items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<f64>;

    /// Statistics for every statement, in statement order.
    fn statement_results(&self, matrix: &VoteMatrix) -> Vec<StatementResult>;

    /// Opinion vector of every participant, in participant order.
    fn participant_vectors(&self, matrix: &VoteMatrix) -> Vec<Vec<f64>>;

    /// k-means over `vectors`.
    fn cluster(&self, vectors: &[Vec<f64>], k: usize, max_iterations: usize) -> KMeansOutcome;

    /// Rank items; ordering is shared by all backends.
    fn rank(&self, items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<ScoredItem> {
        rank_scores(items, strategy, &self.score(items, strategy, ctx))
    }

    /// Full consensus analysis of a matrix.
    fn analyze(&self, matrix: &VoteMatrix, config: &ClusterConfig) -> ConsensusResult {
        if matrix.is_empty() {
            return ConsensusResult::empty();
        }

        let statements = self.statement_results(matrix);
        let vectors = self.participant_vectors(matrix);
        let k = config.count.resolve(matrix.participant_count());
        let outcome = self.cluster(&vectors, k, config.max_iterations);
        log_outcome(matrix, k, &outcome);

        let clusters = build_clusters(matrix, &outcome.assignments, k);
        assemble(matrix, statements, clusters)
    }
}
