//! ScorableItem model - one rankable content unit.
//!
//! Items arrive from the content feed as loosely-typed records. Missing
//! counters default to zero and a missing or unreadable timestamp is treated
//! as the Unix epoch, so every well-typed record is rankable.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A content item that can be scored by any [`SortStrategy`](crate::SortStrategy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorableItem {
    /// Opaque stable identifier, unique within one ranking call
    pub id: String,

    /// Creation instant (RFC 3339 string or epoch milliseconds on the wire)
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// Positive reactions
    #[serde(default)]
    pub like_count: u64,

    /// Negative reactions
    #[serde(default)]
    pub downvote_count: u64,

    /// Replies in the thread
    #[serde(default)]
    pub reply_count: u64,

    /// Reposts / shares
    #[serde(default)]
    pub repost_count: u64,
}

impl ScorableItem {
    /// Create an item with no timestamp and zero engagement.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            like_count: 0,
            downvote_count: 0,
            reply_count: 0,
            repost_count: 0,
        }
    }

    /// Builder: Set creation instant.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builder: Set like count.
    pub fn with_likes(mut self, likes: u64) -> Self {
        self.like_count = likes;
        self
    }

    /// Builder: Set downvote count.
    pub fn with_downvotes(mut self, downvotes: u64) -> Self {
        self.downvote_count = downvotes;
        self
    }

    /// Builder: Set reply count.
    pub fn with_replies(mut self, replies: u64) -> Self {
        self.reply_count = replies;
        self
    }

    /// Builder: Set repost count.
    pub fn with_reposts(mut self, reposts: u64) -> Self {
        self.repost_count = reposts;
        self
    }

    /// Creation instant, falling back to the Unix epoch.
    pub fn created_or_epoch(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Likes plus downvotes: the sample size for binomial scores.
    pub fn vote_total(&self) -> u64 {
        self.like_count.saturating_add(self.downvote_count)
    }
}

/// Wire forms accepted for `created_at`.
///
/// Anything else (fractional or oversized numbers that do not fit a
/// timestamp, booleans, objects) lands in `Other` and is treated as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawTimestamp::Millis(ms) => from_millis(ms as f64, Utc.timestamp_millis_opt(ms).single()),
        RawTimestamp::FractionalMillis(ms) => from_millis(ms, fractional_millis(ms)),
        RawTimestamp::Text(text) => parse_timestamp(&text),
        RawTimestamp::Other(_) => {
            warn!("Unsupported created_at value, treating as epoch");
            None
        }
    }))
}

fn fractional_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let secs = (ms / 1000.0).floor();
    let nanos = ((ms - secs * 1000.0) * 1_000_000.0).round().clamp(0.0, 999_999_999.0);
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(secs as i64, nanos as u32)
}

fn from_millis(raw: f64, parsed: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    if parsed.is_none() {
        warn!(millis = raw, "Out-of-range created_at, treating as epoch");
    }
    parsed
}

/// Parse an RFC 3339 timestamp, logging and discarding anything unreadable.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(timestamp = text, error = %e, "Unparseable created_at, treating as epoch");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_zeroed() {
        let item = ScorableItem::new("post-1");
        assert_eq!(item.id, "post-1");
        assert_eq!(item.created_at, None);
        assert_eq!(item.vote_total(), 0);
        assert_eq!(item.created_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn builder_sets_counts() {
        let item = ScorableItem::new("post-2")
            .with_likes(10)
            .with_downvotes(3)
            .with_replies(4)
            .with_reposts(1);

        assert_eq!(item.like_count, 10);
        assert_eq!(item.downvote_count, 3);
        assert_eq!(item.reply_count, 4);
        assert_eq!(item.repost_count, 1);
        assert_eq!(item.vote_total(), 13);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let item: ScorableItem = serde_json::from_str(r#"{"id":"a"}"#).unwrap();
        assert_eq!(item, ScorableItem::new("a"));
    }

    #[test]
    fn accepts_rfc3339_and_millis() {
        let text: ScorableItem =
            serde_json::from_str(r#"{"id":"a","created_at":"2024-03-01T12:00:00Z"}"#).unwrap();
        let millis: ScorableItem =
            serde_json::from_str(r#"{"id":"b","created_at":1709294400000}"#).unwrap();

        assert_eq!(text.created_at, millis.created_at);
        assert!(text.created_at.is_some());
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let item: ScorableItem =
            serde_json::from_str(r#"{"id":"a","created_at":"2024-03-01T14:00:00+02:00"}"#)
                .unwrap();
        assert_eq!(
            item.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_timestamp_is_epoch() {
        let item: ScorableItem =
            serde_json::from_str(r#"{"id":"a","created_at":"yesterday-ish"}"#).unwrap();
        assert_eq!(item.created_at, None);

        let null: ScorableItem = serde_json::from_str(r#"{"id":"a","created_at":null}"#).unwrap();
        assert_eq!(null.created_at, None);
    }

    #[test]
    fn fractional_millis_keep_precision() {
        let item: ScorableItem =
            serde_json::from_str(r#"{"id":"a","created_at":1709294400000.5}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::microseconds(500);
        assert_eq!(item.created_at, Some(expected));
    }

    #[test]
    fn unusable_timestamps_are_epoch() {
        let cases = [
            r#"{"id":"a","created_at":18446744073709551615}"#,
            r#"{"id":"a","created_at":1e300}"#,
            r#"{"id":"a","created_at":-1e300}"#,
            r#"{"id":"a","created_at":9223372036854775807}"#,
            r#"{"id":"a","created_at":true}"#,
            r#"{"id":"a","created_at":{"seconds":5}}"#,
            r#"{"id":"a","created_at":[2024, 3, 1]}"#,
        ];
        for json in cases {
            let item: ScorableItem = serde_json::from_str(json)
                .unwrap_or_else(|e| panic!("{} rejected: {}", json, e));
            assert_eq!(item.created_at, None, "{}", json);
            assert_eq!(item.created_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let item = ScorableItem::new("post-3")
            .with_created_at(Utc.with_ymd_and_hms(2023, 7, 4, 9, 30, 0).unwrap())
            .with_likes(2);

        let json = serde_json::to_string(&item).unwrap();
        let back: ScorableItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
