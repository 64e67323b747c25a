//! Scoring strategies.
//!
//! Every strategy maps one item to a finite `f64`; higher ranks first. No
//! strategy can produce NaN or infinity: zero-sample cases have an explicit
//! floor of 0.
//!
//! | Strategy | Score |
//! |---|---|
//! | Newest | `created_at` in epoch milliseconds |
//! | Trending | `engagement / (age_hours + 2)^gravity` |
//! | Wilson | lower bound of the Wilson interval on `likes / (likes + downvotes)` |
//! | Controversial | `total × (1 − 2·|ratio − 0.5|)` |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ScoreConfig, AGE_OFFSET_HOURS};
use crate::error::Error;
use crate::item::ScorableItem;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Sort order requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Most recent first
    Newest,
    /// Engagement decayed by age ("hot")
    Trending,
    /// Wilson lower bound on approval ("best")
    Wilson,
    /// Large and evenly split
    Controversial,
}

impl SortStrategy {
    /// All strategies, in documentation order.
    pub const ALL: [Self; 4] = [
        Self::Newest,
        Self::Trending,
        Self::Wilson,
        Self::Controversial,
    ];

    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Trending => "trending",
            Self::Wilson => "wilson",
            Self::Controversial => "controversial",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "new" => Ok(Self::Newest),
            "trending" | "hot" => Ok(Self::Trending),
            "wilson" | "best" => Ok(Self::Wilson),
            "controversial" => Ok(Self::Controversial),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Inputs every strategy may consult besides the item itself.
///
/// `now` is explicit so that ranking stays a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    /// Scoring weights
    pub config: ScoreConfig,
    /// Reference instant for age computations
    pub now: DateTime<Utc>,
}

impl ScoreContext {
    /// Create a context.
    pub fn new(config: ScoreConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    /// Default weights at a given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::new(ScoreConfig::default(), now)
    }
}

/// Score one item with the given strategy.
pub fn score(item: &ScorableItem, strategy: SortStrategy, ctx: &ScoreContext) -> f64 {
    match strategy {
        SortStrategy::Newest => newest(item),
        SortStrategy::Trending => trending(item, &ctx.config, ctx.now),
        SortStrategy::Wilson => wilson_lower_bound(
            item.like_count,
            item.downvote_count,
            ctx.config.wilson_z,
        ),
        SortStrategy::Controversial => controversy(item.like_count, item.downvote_count),
    }
}

/// Creation instant in epoch milliseconds (0 when absent).
pub fn newest(item: &ScorableItem) -> f64 {
    item.created_or_epoch().timestamp_millis() as f64
}

/// Hours between `created_at` and `now`, never negative.
pub fn age_hours(item: &ScorableItem, now: DateTime<Utc>) -> f64 {
    let millis = (now - item.created_or_epoch()).num_milliseconds();
    (millis as f64 / MILLIS_PER_HOUR).max(0.0)
}

/// Net engagement: likes minus downvotes plus weighted replies and reposts.
pub fn engagement(item: &ScorableItem, config: &ScoreConfig) -> f64 {
    item.like_count as f64 - item.downvote_count as f64
        + config.reply_weight * item.reply_count as f64
        + config.repost_weight * item.repost_count as f64
}

/// Engagement decayed by `(age_hours + 2)^gravity`.
///
/// Negative engagement yields a negative score, so buried items sink below
/// quiet ones.
pub fn trending(item: &ScorableItem, config: &ScoreConfig, now: DateTime<Utc>) -> f64 {
    let decay = (age_hours(item, now) + AGE_OFFSET_HOURS).powf(config.gravity);
    finite_or_zero(engagement(item, config) / decay)
}

/// Lower bound of the Wilson score interval for `likes` successes out of
/// `likes + downvotes` trials.
///
/// Returns 0 when there are no trials. Penalizes small samples: 1/1 ranks
/// below 90/100.
pub fn wilson_lower_bound(likes: u64, downvotes: u64, z: f64) -> f64 {
    let n = likes.saturating_add(downvotes);
    if n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let p = likes as f64 / n;
    let z2 = z * z;

    let centre = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    let bound = (centre - margin) / (1.0 + z2 / n);

    finite_or_zero(bound).clamp(0.0, 1.0)
}

/// Volume times balance: `total × (1 − 2·|ratio − 0.5|)`.
///
/// Returns 0 with no votes. A 1000/1000 split outranks 10/10, and 10/10
/// outranks 19/1.
pub fn controversy(likes: u64, downvotes: u64) -> f64 {
    let total = likes.saturating_add(downvotes);
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let ratio = likes as f64 / total;
    total * balance(ratio)
}

/// `1 − 2·|ratio − 0.5|`: 1 for an even split, 0 for a unanimous one.
pub fn balance(ratio: f64) -> f64 {
    (1.0 - 2.0 * (ratio - 0.5).abs()).max(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn strategy_names_parse() {
        for strategy in SortStrategy::ALL {
            assert_eq!(strategy.name().parse::<SortStrategy>(), Ok(strategy));
        }
        assert_eq!("Best".parse::<SortStrategy>(), Ok(SortStrategy::Wilson));
        assert_eq!("HOT".parse::<SortStrategy>(), Ok(SortStrategy::Trending));
    }

    #[test]
    fn unknown_strategy_rejected() {
        assert_eq!(
            "random".parse::<SortStrategy>(),
            Err(Error::UnknownStrategy("random".to_string()))
        );
        assert!("".parse::<SortStrategy>().is_err());
    }

    #[test]
    fn newest_uses_epoch_when_missing() {
        assert_eq!(newest(&ScorableItem::new("a")), 0.0);

        let item = ScorableItem::new("b").with_created_at(now());
        assert_eq!(newest(&item), now().timestamp_millis() as f64);
    }

    #[test]
    fn trending_fresh_item() {
        // 10 likes, age 0: 10 / 2^1.5
        let item = ScorableItem::new("a").with_created_at(now()).with_likes(10);
        let score = trending(&item, &ScoreConfig::default(), now());
        assert!((score - 10.0 / 2f64.powf(1.5)).abs() < 1e-12);
    }

    #[test]
    fn trending_decays_with_age() {
        let config = ScoreConfig::default();
        let fresh = ScorableItem::new("a").with_created_at(now()).with_likes(50);
        let stale = ScorableItem::new("b")
            .with_created_at(now() - Duration::hours(48))
            .with_likes(50);

        assert!(trending(&fresh, &config, now()) > trending(&stale, &config, now()));
    }

    #[test]
    fn trending_future_items_clamp_age() {
        let config = ScoreConfig::default();
        let future = ScorableItem::new("a")
            .with_created_at(now() + Duration::hours(5))
            .with_likes(4);
        let present = ScorableItem::new("b").with_created_at(now()).with_likes(4);

        assert_eq!(age_hours(&future, now()), 0.0);
        assert_eq!(trending(&future, &config, now()), trending(&present, &config, now()));
    }

    #[test]
    fn trending_negative_engagement() {
        let item = ScorableItem::new("a").with_created_at(now()).with_downvotes(8);
        assert!(trending(&item, &ScoreConfig::default(), now()) < 0.0);
    }

    #[test]
    fn trending_weights_apply() {
        let item = ScorableItem::new("a")
            .with_created_at(now())
            .with_replies(3)
            .with_reposts(2);
        let config = ScoreConfig::default()
            .with_reply_weight(2.0)
            .with_repost_weight(0.5);

        assert_eq!(engagement(&item, &config), 7.0);
    }

    #[test]
    fn wilson_zero_votes_is_zero() {
        assert_eq!(wilson_lower_bound(0, 0, 1.96), 0.0);
    }

    #[test]
    fn wilson_reference_value() {
        // 5 up / 0 down at 95%: 0.5655
        let score = wilson_lower_bound(5, 0, 1.96);
        assert!((score - 0.5655).abs() < 1e-4, "got {}", score);

        // All negative votes bound at zero
        assert!(wilson_lower_bound(0, 12, 1.96) < 1e-12);
    }

    #[test]
    fn wilson_penalizes_small_samples() {
        assert!(wilson_lower_bound(90, 10, 1.96) > wilson_lower_bound(1, 0, 1.96));
        assert!(wilson_lower_bound(100, 0, 1.96) > wilson_lower_bound(10, 0, 1.96));
    }

    #[test]
    fn controversy_split_beats_skew() {
        assert!(controversy(10, 10) > controversy(19, 1));
        assert!(controversy(1000, 1000) > controversy(10, 10));
        assert_eq!(controversy(10, 10), 20.0);
        assert_eq!(controversy(0, 0), 0.0);
        assert_eq!(controversy(7, 0), 0.0);
    }

    #[test]
    fn score_dispatches() {
        let ctx = ScoreContext::at(now());
        let item = ScorableItem::new("a")
            .with_created_at(now())
            .with_likes(6)
            .with_downvotes(2);

        assert_eq!(score(&item, SortStrategy::Newest, &ctx), newest(&item));
        assert_eq!(
            score(&item, SortStrategy::Wilson, &ctx),
            wilson_lower_bound(6, 2, 1.96)
        );
        assert_eq!(score(&item, SortStrategy::Controversial, &ctx), 4.0);
    }
}
