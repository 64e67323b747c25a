//! Consensus analysis: statement statistics plus opinion clusters.
//!
//! The analysis is assembled from independent pieces
//! ([`statement_results`], [`participant_vectors`], [`kmeans_with`],
//! [`build_clusters`]) so that an accelerated executor can swap in parallel
//! versions of the maps without touching the arithmetic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::{assign_sequential, canonical_groups, kmeans_with, ClusterConfig, KMeansOutcome};
use crate::error::Result;
use crate::matrix::VoteMatrix;
use crate::statistics::{statement_results, StatementResult};
use crate::vote::{Tally, VoteEvent};

/// A group of participants with similar voting patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position in [`ConsensusResult::clusters`]
    pub cluster_id: usize,
    /// Participant ids, sorted
    pub member_ids: Vec<String>,
    pub member_count: usize,
    /// Mean over members of each member's agree votes / votes cast
    pub avg_agreement: f64,
    /// Agreement ratio of the members on each statement they voted on
    /// decisively
    #[serde(default)]
    pub statement_agreement: BTreeMap<String, f64>,
}

/// Full output of a consensus analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub total_participants: usize,
    /// One entry per statement, ordered by statement id
    pub statements: Vec<StatementResult>,
    /// Ordered by `cluster_id`
    pub clusters: Vec<Cluster>,
    pub cluster_count: usize,
}

impl ConsensusResult {
    /// Result for zero votes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Statement ids every cluster agrees with at `min_ratio` or better.
    ///
    /// Only clusters that voted decisively on a statement are consulted; a
    /// statement no cluster voted on decisively is never a consensus.
    pub fn consensus_statements(&self, min_ratio: f64) -> Vec<&str> {
        self.statements
            .iter()
            .map(|s| s.statement_id.as_str())
            .filter(|id| {
                let mut ratios = self
                    .clusters
                    .iter()
                    .filter_map(|c| c.statement_agreement.get(*id))
                    .peekable();
                ratios.peek().is_some() && ratios.all(|&r| r >= min_ratio)
            })
            .collect()
    }

    /// The `n` most divisive statements (ties → statement id).
    pub fn most_divisive(&self, n: usize) -> Vec<&StatementResult> {
        let mut ranked: Vec<&StatementResult> = self.statements.iter().collect();
        ranked.sort_by(|a, b| {
            b.divisiveness
                .total_cmp(&a.divisiveness)
                .then_with(|| a.statement_id.cmp(&b.statement_id))
        });
        ranked.truncate(n);
        ranked
    }

    /// The cluster a participant belongs to.
    pub fn cluster_of(&self, participant_id: &str) -> Option<&Cluster> {
        self.clusters
            .iter()
            .find(|c| c.member_ids.binary_search_by(|m| m.as_str().cmp(participant_id)).is_ok())
    }

    /// Look up a statement's statistics.
    pub fn statement(&self, statement_id: &str) -> Option<&StatementResult> {
        self.statements
            .binary_search_by(|s| s.statement_id.as_str().cmp(statement_id))
            .ok()
            .map(|i| &self.statements[i])
    }
}

/// Share of a participant's votes that are agrees.
pub fn participant_agreement(matrix: &VoteMatrix, participant: usize) -> f64 {
    matrix.participant_tally(participant).agree_rate()
}

/// Opinion vectors for every participant, in participant order.
pub fn participant_vectors(matrix: &VoteMatrix) -> Vec<Vec<f64>> {
    (0..matrix.participant_count())
        .map(|p| matrix.participant_vector(p))
        .collect()
}

/// Turn k-means assignments into labelled clusters.
pub fn build_clusters(matrix: &VoteMatrix, assignments: &[usize], k: usize) -> Vec<Cluster> {
    canonical_groups(assignments, k)
        .into_iter()
        .enumerate()
        .map(|(cluster_id, members)| build_cluster(matrix, cluster_id, &members))
        .collect()
}

fn build_cluster(matrix: &VoteMatrix, cluster_id: usize, members: &[usize]) -> Cluster {
    let avg_agreement = members
        .iter()
        .map(|&p| participant_agreement(matrix, p))
        .sum::<f64>()
        / members.len().max(1) as f64;

    let statement_agreement = matrix
        .statements()
        .iter()
        .enumerate()
        .filter_map(|(s, id)| {
            let tally = Tally::from_votes(members.iter().filter_map(|&p| matrix.vote_at(p, s)));
            (tally.decisive() > 0).then(|| (id.clone(), tally.agreement_ratio()))
        })
        .collect();

    Cluster {
        cluster_id,
        member_ids: members
            .iter()
            .map(|&p| matrix.participants()[p].clone())
            .collect(),
        member_count: members.len(),
        avg_agreement,
        statement_agreement,
    }
}

/// Combine the pieces into a result.
pub fn assemble(
    matrix: &VoteMatrix,
    statements: Vec<StatementResult>,
    clusters: Vec<Cluster>,
) -> ConsensusResult {
    ConsensusResult {
        total_participants: matrix.participant_count(),
        statements,
        cluster_count: clusters.len(),
        clusters,
    }
}

/// Sequential consensus analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsensusAnalyzer {
    config: ClusterConfig,
}

impl ConsensusAnalyzer {
    /// Create an analyzer with the given clustering settings.
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Effective cluster count for a matrix.
    pub fn cluster_count_for(&self, matrix: &VoteMatrix) -> usize {
        self.config.count.resolve(matrix.participant_count())
    }

    /// Build a matrix from events and analyze it.
    pub fn analyze_events(&self, events: &[VoteEvent]) -> Result<ConsensusResult> {
        Ok(self.analyze(&VoteMatrix::from_events(events)?))
    }

    /// Analyze a matrix.
    pub fn analyze(&self, matrix: &VoteMatrix) -> ConsensusResult {
        if matrix.is_empty() {
            return ConsensusResult::empty();
        }

        let statements = statement_results(matrix);
        let vectors = participant_vectors(matrix);
        let k = self.cluster_count_for(matrix);
        let outcome = kmeans_with(&vectors, k, self.config.max_iterations, assign_sequential);
        log_outcome(matrix, k, &outcome);

        let clusters = build_clusters(matrix, &outcome.assignments, k);
        assemble(matrix, statements, clusters)
    }
}

/// Shared debug line for every executor.
pub fn log_outcome(matrix: &VoteMatrix, k: usize, outcome: &KMeansOutcome) {
    debug!(
        participants = matrix.participant_count(),
        statements = matrix.statement_count(),
        k,
        iterations = outcome.iterations,
        converged = outcome.converged,
        "Clustered participants"
    );
}
