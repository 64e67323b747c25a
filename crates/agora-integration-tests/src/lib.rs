//! Shared fixtures for Agora integration tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use agora_consensus::{ConsensusResult, Vote, VoteEvent};
use agora_engine::{Engine, EngineConfig, FallbackBackend, NativeBackend};
use agora_ranking::ScorableItem;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Relative tolerance for cross-backend float comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Instant every fixture is evaluated at.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Fifty items with spread-out ages and engagement, including ties,
/// undated items and zero-vote items.
pub fn feed() -> Vec<ScorableItem> {
    (0..50u64)
        .map(|i| {
            let item = ScorableItem::new(format!("post-{:02}", i))
                .with_likes(i * 7 % 23)
                .with_downvotes(i * 5 % 11)
                .with_replies(i % 4)
                .with_reposts(i % 3);
            if i % 10 == 9 {
                item
            } else {
                item.with_created_at(reference_now() - Duration::minutes((i * 37 % 600) as i64))
            }
        })
        .collect()
}

/// Ten participants voting on three statements: two camps, a few
/// abstentions and some missing votes.
pub fn deliberation() -> Vec<VoteEvent> {
    let mut events = Vec::new();
    for p in 0..10 {
        let participant = format!("voter-{}", p);
        let camp_a = p < 6;
        for s in 0..3 {
            if (p + s) % 7 == 6 {
                continue;
            }
            let vote = match (camp_a, s) {
                (_, 2) if p % 3 == 0 => Vote::Pass,
                (true, 0) | (false, 1) => Vote::Agree,
                (true, 1) | (false, 0) => Vote::Disagree,
                _ => Vote::Agree,
            };
            events.push(VoteEvent::new(participant.clone(), format!("statement-{}", s), vote));
        }
    }
    events
}

/// Engine pinned to the fallback backend.
pub fn fallback_engine(config: EngineConfig) -> Engine {
    Engine::with_backend(config, Arc::new(FallbackBackend))
}

/// Engine pinned to a native pool, or `None` if this host cannot start one.
///
/// A `None` is reported on stderr under `test` so that skipped parity runs
/// show up in the test output.
pub fn native_engine(config: EngineConfig, test: &str) -> Option<Engine> {
    match NativeBackend::start(Some(4)) {
        Ok(native) => Some(Engine::with_backend(config, Arc::new(native))),
        Err(e) => {
            eprintln!("{}: skipped, native backend unavailable ({})", test, e);
            None
        }
    }
}

/// Cluster memberships as sets, independent of cluster labels.
pub fn membership_sets(result: &ConsensusResult) -> BTreeSet<BTreeSet<String>> {
    result
        .clusters
        .iter()
        .map(|c| c.member_ids.iter().cloned().collect())
        .collect()
}

/// `|a - b| <= TOLERANCE * max(1, |a|, |b|)`.
pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * 1f64.max(a.abs()).max(b.abs())
}
