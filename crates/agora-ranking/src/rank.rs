//! Ranking: total order over scored items.
//!
//! Order is score descending, then `id` ascending. With unique ids this is a
//! total order, so the result does not depend on input order and ranking an
//! already ranked list returns it unchanged.
//!
//! Newest is the exception to "by score": its score is the creation instant
//! in epoch milliseconds, which is too coarse to order sub-millisecond
//! timestamps, so it orders on the full-precision instant instead.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::item::ScorableItem;
use crate::score::{score, ScoreContext, SortStrategy};

/// An item id with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    /// Item identifier
    pub id: String,
    /// Strategy score (higher ranks first)
    pub score: f64,
}

impl ScoredItem {
    /// Create a scored item.
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Canonical comparison: score descending, then id ascending.
pub fn compare(a_score: f64, a_id: &str, b_score: f64, b_id: &str) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_id.cmp(b_id))
}

/// Score every item with `strategy`, in input order.
pub fn score_all(items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<f64> {
    items.iter().map(|item| score(item, strategy, ctx)).collect()
}

/// Rank items by `strategy`.
pub fn rank(items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<ScoredItem> {
    let ranked = rank_scores(items, strategy, &score_all(items, strategy, ctx));
    debug!(strategy = %strategy, items = ranked.len(), "Ranked items");
    ranked
}

/// Rank items by `strategy`, returning only the ids.
pub fn rank_ids(items: &[ScorableItem], strategy: SortStrategy, ctx: &ScoreContext) -> Vec<String> {
    rank(items, strategy, ctx)
        .into_iter()
        .map(|scored| scored.id)
        .collect()
}

/// Rank items by `strategy`, returning the records themselves in order.
pub fn rank_items<'a>(
    items: &'a [ScorableItem],
    strategy: SortStrategy,
    ctx: &ScoreContext,
) -> Vec<&'a ScorableItem> {
    let scores = score_all(items, strategy, ctx);
    order_indices(items, strategy, &scores)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Order precomputed `strategy` scores. `scores[i]` belongs to `items[i]`.
///
/// Shared by every backend so that they agree on tie-breaking.
pub fn rank_scores(items: &[ScorableItem], strategy: SortStrategy, scores: &[f64]) -> Vec<ScoredItem> {
    order_indices(items, strategy, scores)
        .into_iter()
        .map(|i| ScoredItem::new(items[i].id.clone(), scores[i]))
        .collect()
}

fn order_indices(items: &[ScorableItem], strategy: SortStrategy, scores: &[f64]) -> Vec<usize> {
    debug_assert_eq!(items.len(), scores.len());

    let mut indices: Vec<usize> = (0..items.len().min(scores.len())).collect();
    match strategy {
        SortStrategy::Newest => indices.sort_by(|&a, &b| {
            items[b]
                .created_or_epoch()
                .cmp(&items[a].created_or_epoch())
                .then_with(|| items[a].id.cmp(&items[b].id))
        }),
        _ => indices.sort_by(|&a, &b| compare(scores[a], &items[a].id, scores[b], &items[b].id)),
    }
    indices
}
