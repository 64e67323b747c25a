//! Multi-threaded backend on a dedicated rayon pool.

use agora_consensus::{
    kmeans_with, nearest_centroid, statement_result, KMeansOutcome, StatementResult, VoteMatrix,
};
use agora_ranking::{score, ScorableItem, ScoreContext, SortStrategy};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{Backend, BackendKind};
use crate::error::BackendError;

/// Parallel backend. Construct with [`NativeBackend::start`].
#[derive(Debug)]
pub struct NativeBackend {
    pool: ThreadPool,
}

impl NativeBackend {
    /// Start the worker pool. `threads = None` uses one worker per core.
    pub fn start(threads: Option<usize>) -> Result<Self, BackendError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("agora-native-{}", i));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Backend for NativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn score(&self, items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<f64> {
        self.pool
            .install(|| items.par_iter().map(|item| score(item, strategy, ctx)).collect())
    }

    fn statement_results(&self, matrix: &VoteMatrix) -> Vec<StatementResult> {
        self.pool.install(|| {
            (0..matrix.statement_count())
                .into_par_iter()
                .filter_map(|s| statement_result(matrix, s))
                .collect()
        })
    }

    fn participant_vectors(&self, matrix: &VoteMatrix) -> Vec<Vec<f64>> {
        self.pool.install(|| {
            (0..matrix.participant_count())
                .into_par_iter()
                .map(|p| matrix.participant_vector(p))
                .collect()
        })
    }

    fn cluster(&self, vectors: &[Vec<f64>], k: usize, max_iterations: usize) -> KMeansOutcome {
        self.pool.install(|| {
            kmeans_with(vectors, k, max_iterations, |vectors, centroids| {
                vectors
                    .par_iter()
                    .map(|v| nearest_centroid(v, centroids))
                    .collect()
            })
        })
    }
}
