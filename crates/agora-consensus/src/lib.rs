//! Agora Consensus Analysis
//!
//! Polis-style analysis of a deliberation: participants vote agree (+1),
//! disagree (-1) or pass (0) on statements, and the analysis reports how
//! each statement landed and which groups of participants vote alike.
//!
//! # Pipeline
//!
//! 1. [`VoteMatrix::from_events`] validates and deduplicates raw events
//!    (last write wins)
//! 2. [`statement_results`] computes agreement and divisiveness
//! 3. [`kmeans`] groups participants by their vote vectors
//! 4. [`build_clusters`] labels groups canonically
//!
//! [`ConsensusAnalyzer`] runs the whole pipeline sequentially.
//!
//! # Degenerate Input
//!
//! Zero votes is not an error: the result has no statements and no clusters.

mod analyzer;
mod cluster;
mod error;
mod matrix;
mod statistics;
mod vote;

pub use analyzer::{
    assemble, build_clusters, log_outcome, participant_agreement, participant_vectors, Cluster,
    ConsensusAnalyzer, ConsensusResult,
};
pub use cluster::{
    assign_sequential, auto_cluster_count, canonical_groups, fill_empty_clusters,
    initial_centroids, kmeans, kmeans_with, nearest_centroid, squared_distance,
    update_centroids, ClusterConfig, ClusterCount, KMeansOutcome, DEFAULT_MAX_ITERATIONS,
    MAX_AUTO_CLUSTERS,
};
pub use error::{Error, Result};
pub use matrix::VoteMatrix;
pub use statistics::{divisiveness, statement_result, statement_results, StatementResult};
pub use vote::{Tally, Vote, VoteEvent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_analysis() {
        let result = ConsensusAnalyzer::default().analyze_events(&[]).unwrap();
        assert_eq!(result, ConsensusResult::empty());
        assert_eq!(result.total_participants, 0);
        assert_eq!(result.cluster_count, 0);
    }

    #[test]
    fn divisiveness_shape() {
        assert_eq!(divisiveness(0.5), 1.0);
        assert_eq!(divisiveness(0.75), 0.5);
        assert_eq!(divisiveness(0.0), 0.0);
        assert_eq!(divisiveness(1.0), 0.0);
    }
}
