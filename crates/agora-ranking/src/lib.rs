//! Agora Feed Ranking
//!
//! Orders content items for a feed. Ranking is a pure function of the items
//! and an explicit reference instant: no clocks are read, no state is kept.
//!
//! # Strategies
//!
//! - **Newest**: creation time, most recent first
//! - **Trending**: net engagement divided by `(age_hours + 2)^gravity`
//! - **Wilson** ("best"): lower bound of the 95% Wilson interval on approval
//! - **Controversial**: vote volume scaled by how evenly it splits
//!
//! # Total Order
//!
//! Every strategy sorts by score descending and breaks ties by `id`
//! ascending. Input order never leaks into the output:
//!
//! ```
//! use agora_ranking::{rank_ids, ScorableItem, ScoreContext, SortStrategy};
//! use chrono::Utc;
//!
//! let items = vec![
//!     ScorableItem::new("b").with_likes(3),
//!     ScorableItem::new("a").with_likes(3),
//! ];
//! let ctx = ScoreContext::at(Utc::now());
//! assert_eq!(rank_ids(&items, SortStrategy::Wilson, &ctx), vec!["a", "b"]);
//! ```

mod config;
mod error;
mod item;
mod rank;
mod score;

pub use config::{
    z_for_confidence, ScoreConfig, AGE_OFFSET_HOURS, DEFAULT_GRAVITY, DEFAULT_REPLY_WEIGHT,
    DEFAULT_REPOST_WEIGHT, DEFAULT_WILSON_Z,
};
pub use error::{Error, Result};
pub use item::{parse_timestamp, ScorableItem};
pub use rank::{compare, rank, rank_ids, rank_items, rank_scores, score_all, ScoredItem};
pub use score::{
    age_hours, balance, controversy, engagement, newest, score, trending, wilson_lower_bound,
    ScoreContext, SortStrategy,
};
