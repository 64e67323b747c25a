//! Opinion clustering: k-means over participant vote vectors.
//!
//! # Determinism
//!
//! The algorithm has no random input:
//!
//! 1. The first centroid is participant 0 (lowest id).
//! 2. Each further centroid is the participant farthest from its nearest
//!    chosen centroid (ties → lowest index).
//! 3. Assignment picks the nearest centroid by squared Euclidean distance
//!    (ties → lowest centroid index).
//! 4. A cluster left without members takes the participant farthest from
//!    its own centroid, drawn from clusters with more than one member (ties
//!    → lowest index). With at least `k` participants every cluster is
//!    therefore non-empty, even when fewer than `k` vote vectors are
//!    distinct.
//! 5. Centroids move to the mean of their members.
//!
//! Steps 3–5 repeat until assignments stop changing or the iteration cap is
//! reached. The assignment step is the only part a backend may run in
//! parallel: it is a pure per-participant map, so any executor produces the
//! same assignments.

use serde::{Deserialize, Serialize};

/// Default cap on assignment/update rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Upper bound on the automatically chosen cluster count.
pub const MAX_AUTO_CLUSTERS: usize = 4;

/// How many clusters to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterCount {
    /// `min(4, ceil(sqrt(participants / 2)))`, at least 1
    #[default]
    Auto,
    /// Exactly `k`, reduced to the participant count when larger
    Fixed(usize),
}

impl ClusterCount {
    /// Effective k for a number of participants. Zero participants → 0.
    pub fn resolve(&self, participants: usize) -> usize {
        if participants == 0 {
            return 0;
        }
        match *self {
            Self::Auto => auto_cluster_count(participants),
            Self::Fixed(k) => k.clamp(1, participants),
        }
    }
}

/// `min(4, ceil(sqrt(n / 2)))` with a floor of 1, never above `n`.
pub fn auto_cluster_count(participants: usize) -> usize {
    if participants == 0 {
        return 0;
    }
    let k = (participants as f64 / 2.0).sqrt().ceil() as usize;
    k.clamp(1, MAX_AUTO_CLUSTERS).min(participants)
}

/// Clustering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster count policy
    pub count: ClusterCount,
    /// Cap on k-means rounds
    pub max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            count: ClusterCount::Auto,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ClusterConfig {
    /// Builder: Use exactly `k` clusters.
    #[must_use]
    pub fn with_fixed_count(mut self, k: usize) -> Self {
        self.count = ClusterCount::Fixed(k);
        self
    }

    /// Builder: Set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOutcome {
    /// Centroid index per input vector
    pub assignments: Vec<usize>,
    /// Final centroid positions
    pub centroids: Vec<Vec<f64>>,
    /// Assignment rounds performed
    pub iterations: usize,
    /// Whether assignments stabilized before the cap
    pub converged: bool,
}

/// Squared Euclidean distance.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid (ties → lowest index).
pub fn nearest_centroid(vector: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(vector, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

/// Sequential assignment step.
pub fn assign_sequential(vectors: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    vectors
        .iter()
        .map(|v| nearest_centroid(v, centroids))
        .collect()
}

/// Farthest-point initialization.
pub fn initial_centroids(vectors: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let k = k.min(vectors.len());
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    if k == 0 {
        return centroids;
    }

    centroids.push(vectors[0].clone());
    while centroids.len() < k {
        let mut best = 0;
        let mut best_distance = f64::NEG_INFINITY;
        for (i, vector) in vectors.iter().enumerate() {
            let nearest = centroids
                .iter()
                .map(|c| squared_distance(vector, c))
                .fold(f64::INFINITY, f64::min);
            if nearest > best_distance {
                best_distance = nearest;
                best = i;
            }
        }
        centroids.push(vectors[best].clone());
    }

    centroids
}

/// Give every empty cluster one member.
///
/// The member moved is the one farthest from its current centroid among
/// clusters with more than one member (ties → lowest index); the empty
/// centroid jumps onto it. Stops early only when no cluster can spare a
/// member, which needs fewer vectors than centroids.
pub fn fill_empty_clusters(vectors: &[Vec<f64>], assignments: &mut [usize], centroids: &mut [Vec<f64>]) {
    let mut counts = vec![0usize; centroids.len()];
    for &cluster in assignments.iter() {
        counts[cluster] += 1;
    }

    for empty in 0..centroids.len() {
        if counts[empty] > 0 {
            continue;
        }

        let distance = |i: usize| squared_distance(&vectors[i], &centroids[assignments[i]]);
        let donor = (0..assignments.len())
            .filter(|&i| counts[assignments[i]] > 1)
            .max_by(|&a, &b| distance(a).total_cmp(&distance(b)).then(b.cmp(&a)));
        let Some(member) = donor else {
            break;
        };

        counts[assignments[member]] -= 1;
        counts[empty] = 1;
        assignments[member] = empty;
        centroids[empty] = vectors[member].clone();
    }
}

/// Move each centroid to the mean of its members.
///
/// Sums run in input order so that every backend gets bit-identical
/// centroids. A centroid with no members keeps its position.
pub fn update_centroids(vectors: &[Vec<f64>], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    let dims = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (vector, &cluster) in vectors.iter().zip(assignments) {
        counts[cluster] += 1;
        for (sum, x) in sums[cluster].iter_mut().zip(vector) {
            *sum += x;
        }
    }

    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            *centroid = sum.into_iter().map(|s| s / count as f64).collect();
        }
    }
}

/// Sequential k-means.
pub fn kmeans(vectors: &[Vec<f64>], k: usize, max_iterations: usize) -> KMeansOutcome {
    kmeans_with(vectors, k, max_iterations, assign_sequential)
}

/// k-means with a caller-supplied assignment step.
///
/// `assign` must return `nearest_centroid(v, centroids)` for every `v`, in
/// input order; how it schedules that work is up to the caller.
pub fn kmeans_with<A>(vectors: &[Vec<f64>], k: usize, max_iterations: usize, assign: A) -> KMeansOutcome
where
    A: Fn(&[Vec<f64>], &[Vec<f64>]) -> Vec<usize>,
{
    let mut centroids = initial_centroids(vectors, k);
    if centroids.is_empty() {
        return KMeansOutcome {
            assignments: Vec::new(),
            centroids,
            iterations: 0,
            converged: true,
        };
    }

    let max_iterations = max_iterations.max(1);
    let mut assignments = assign(vectors, &centroids);
    fill_empty_clusters(vectors, &mut assignments, &mut centroids);
    let mut iterations = 1;
    let mut converged = false;

    while iterations < max_iterations {
        update_centroids(vectors, &assignments, &mut centroids);
        let mut next = assign(vectors, &centroids);
        fill_empty_clusters(vectors, &mut next, &mut centroids);
        iterations += 1;
        if next == assignments {
            converged = true;
            break;
        }
        assignments = next;
    }

    KMeansOutcome {
        assignments,
        centroids,
        iterations,
        converged,
    }
}

/// Group member indices by centroid, drop empty groups, and order groups by
/// their lowest member index.
pub fn canonical_groups(assignments: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (member, &cluster) in assignments.iter().enumerate() {
        if let Some(group) = groups.get_mut(cluster) {
            group.push(member);
        }
    }
    groups.retain(|g| !g.is_empty());
    groups.sort_by_key(|g| g[0]);
    groups
}
