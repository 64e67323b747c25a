use agora_ranking::{
    controversy, rank_ids, wilson_lower_bound, ScorableItem, ScoreContext, SortStrategy,
    DEFAULT_WILSON_Z,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()
}

fn arb_strategy() -> impl Strategy<Value = SortStrategy> {
    prop_oneof![
        Just(SortStrategy::Newest),
        Just(SortStrategy::Trending),
        Just(SortStrategy::Wilson),
        Just(SortStrategy::Controversial),
    ]
}

/// Items with unique ids and random engagement, some without timestamps.
fn arb_items() -> impl Strategy<Value = Vec<ScorableItem>> {
    prop::collection::vec(
        (
            prop::option::of(0i64..500),
            0u64..200,
            0u64..200,
            0u64..50,
            0u64..50,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (hours_ago, likes, downvotes, replies, reposts))| {
                let mut item = ScorableItem::new(format!("item-{:03}", i))
                    .with_likes(likes)
                    .with_downvotes(downvotes)
                    .with_replies(replies)
                    .with_reposts(reposts);
                if let Some(h) = hours_ago {
                    item = item.with_created_at(now() - Duration::hours(h));
                }
                item
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn output_is_a_permutation(items in arb_items(), strategy in arb_strategy()) {
        let ids = rank_ids(&items, strategy, &ScoreContext::at(now()));
        prop_assert_eq!(ids.len(), items.len());

        let mut sorted = ids.clone();
        sorted.sort();
        let mut expected: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn order_independent(items in arb_items(), strategy in arb_strategy()) {
        let ctx = ScoreContext::at(now());
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(rank_ids(&items, strategy, &ctx), rank_ids(&reversed, strategy, &ctx));
    }

    #[test]
    fn idempotent(items in arb_items(), strategy in arb_strategy()) {
        let ctx = ScoreContext::at(now());
        let first = rank_ids(&items, strategy, &ctx);
        let reordered: Vec<ScorableItem> = first
            .iter()
            .map(|id| items.iter().find(|i| &i.id == id).unwrap().clone())
            .collect();
        prop_assert_eq!(rank_ids(&reordered, strategy, &ctx), first);
    }

    #[test]
    fn newest_is_descending(items in arb_items()) {
        let ids = rank_ids(&items, SortStrategy::Newest, &ScoreContext::at(now()));
        let times: Vec<_> = ids
            .iter()
            .map(|id| items.iter().find(|i| &i.id == id).unwrap().created_or_epoch())
            .collect();
        for pair in times.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn newest_is_descending_below_a_millisecond(offsets in prop::collection::vec(0i64..5_000_000, 0..40)) {
        let items: Vec<ScorableItem> = offsets
            .iter()
            .enumerate()
            .map(|(i, &nanos)| {
                ScorableItem::new(format!("item-{:03}", i))
                    .with_created_at(now() - Duration::nanoseconds(nanos))
            })
            .collect();
        let ids = rank_ids(&items, SortStrategy::Newest, &ScoreContext::at(now()));
        let times: Vec<_> = ids
            .iter()
            .map(|id| items.iter().find(|i| &i.id == id).unwrap().created_or_epoch())
            .collect();
        for pair in times.windows(2) {
            prop_assert!(pair[0] >= pair[1], "{} before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn wilson_monotone_in_likes(likes in 0u64..10_000, downvotes in 0u64..10_000) {
        let lower = wilson_lower_bound(likes, downvotes, DEFAULT_WILSON_Z);
        let higher = wilson_lower_bound(likes + 1, downvotes, DEFAULT_WILSON_Z);
        prop_assert!(higher + 1e-12 >= lower, "{} -> {}", lower, higher);
    }

    #[test]
    fn wilson_antitone_in_downvotes(likes in 0u64..10_000, downvotes in 0u64..10_000) {
        let before = wilson_lower_bound(likes, downvotes, DEFAULT_WILSON_Z);
        let after = wilson_lower_bound(likes, downvotes + 1, DEFAULT_WILSON_Z);
        prop_assert!(after <= before + 1e-12, "{} -> {}", before, after);
    }

    #[test]
    fn wilson_in_unit_interval(likes in 0u64..100_000, downvotes in 0u64..100_000) {
        let score = wilson_lower_bound(likes, downvotes, DEFAULT_WILSON_Z);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn even_split_maximizes_controversy(total in 1u64..5_000) {
        let half = total / 2;
        let even = controversy(half, total - half);
        for likes in 0..=total.min(200) {
            prop_assert!(controversy(likes, total - likes) <= even + 1e-9);
        }
    }
}
