//! Single-threaded backend.

use agora_consensus::{kmeans, participant_vectors, statement_results, KMeansOutcome, StatementResult, VoteMatrix};
use agora_ranking::{score_all, ScorableItem, ScoreContext, SortStrategy};

use super::{Backend, BackendKind};

/// Sequential reference implementation. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackBackend;

impl Backend for FallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn score(&self, items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<f64> {
        score_all(items, strategy, ctx)
    }

    fn statement_results(&self, matrix: &VoteMatrix) -> Vec<StatementResult> {
        statement_results(matrix)
    }

    fn participant_vectors(&self, matrix: &VoteMatrix) -> Vec<Vec<f64>> {
        participant_vectors(matrix)
    }

    fn cluster(&self, vectors: &[Vec<f64>], k: usize, max_iterations: usize) -> KMeansOutcome {
        kmeans(vectors, k, max_iterations)
    }
}
