//! Agora Engine
//!
//! Ties feed ranking ([`agora_ranking`]) and consensus analysis
//! ([`agora_consensus`]) to a computation backend chosen at startup.
//!
//! # Backends
//!
//! - **Native**: a dedicated rayon pool runs the per-item and
//!   per-participant maps in parallel
//! - **Fallback**: the same maps, sequentially
//!
//! [`BackendSelector`] tries the native pool once. If it cannot start, the
//! engine runs on the fallback without surfacing an error. Both backends
//! share the ordering and aggregation code, so results are identical.
//!
//! # Example
//!
//! ```
//! use agora_engine::{Engine, EngineConfig};
//! use agora_ranking::ScorableItem;
//!
//! let engine = Engine::new(EngineConfig::default());
//! let items = vec![
//!     ScorableItem::new("a").with_likes(10).with_downvotes(10),
//!     ScorableItem::new("b").with_likes(19).with_downvotes(1),
//! ];
//! let ranked = engine.rank(&items, "controversial").unwrap();
//! assert_eq!(ranked, vec!["a", "b"]);
//! ```

mod backend;
mod config;
mod engine;
mod error;

pub use backend::{
    Backend, BackendKind, BackendPreference, BackendSelector, FallbackBackend, NativeBackend,
};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{BackendError, Error, Result};

pub use agora_consensus::{Cluster, ConsensusResult, StatementResult, Vote, VoteEvent};
pub use agora_ranking::{ScorableItem, ScoredItem, SortStrategy};
