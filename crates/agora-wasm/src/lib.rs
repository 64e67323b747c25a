//! WebAssembly bindings.
//!
//! JSON in, JSON out. The `*_json` functions carry the logic and are plain
//! Rust; the `#[wasm_bindgen]` exports only convert errors into JS
//! exceptions. Browsers without thread support get the fallback backend.

use std::sync::OnceLock;

use agora_engine::{Engine, EngineConfig, ScorableItem, VoteEvent};
use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

fn engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(|| Engine::new(EngineConfig::default()))
}

/// Rank a JSON array of items, returning a JSON array of ids.
pub fn rank_json(engine: &Engine, items_json: &str, strategy: &str, now: DateTime<Utc>) -> agora_engine::Result<String> {
    let items: Vec<ScorableItem> = serde_json::from_str(items_json)?;
    let ids = engine.rank_at(&items, strategy, now)?;
    Ok(serde_json::to_string(&ids)?)
}

/// Rank a JSON array of items, returning `[{id, score}]`.
pub fn rank_scored_json(engine: &Engine, items_json: &str, strategy: &str, now: DateTime<Utc>) -> agora_engine::Result<String> {
    let items: Vec<ScorableItem> = serde_json::from_str(items_json)?;
    let ranked = engine.rank_scored(&items, strategy, now)?;
    Ok(serde_json::to_string(&ranked)?)
}

/// Analyze a JSON array of vote events.
pub fn analyze_json(engine: &Engine, votes_json: &str) -> agora_engine::Result<String> {
    let votes: Vec<VoteEvent> = serde_json::from_str(votes_json)?;
    let result = engine.analyze_consensus(&votes)?;
    Ok(serde_json::to_string(&result)?)
}

fn to_js(e: agora_engine::Error) -> JsValue {
    tracing::debug!(error = %e, "Rejected call from JS");
    JsValue::from_str(&e.to_string())
}

/// Rank items as of now. Throws on unknown strategy or malformed JSON.
#[wasm_bindgen]
pub fn rank(items_json: &str, strategy: &str) -> Result<String, JsValue> {
    rank_json(engine(), items_json, strategy, Utc::now()).map_err(to_js)
}

/// Rank items with scores as of now.
#[wasm_bindgen(js_name = rankScored)]
pub fn rank_scored(items_json: &str, strategy: &str) -> Result<String, JsValue> {
    rank_scored_json(engine(), items_json, strategy, Utc::now()).map_err(to_js)
}

/// Consensus analysis. Throws on out-of-range votes or malformed JSON.
#[wasm_bindgen(js_name = analyzeConsensus)]
pub fn analyze_consensus(votes_json: &str) -> Result<String, JsValue> {
    analyze_json(engine(), votes_json).map_err(to_js)
}

/// Name of the backend in use.
#[wasm_bindgen]
pub fn backend() -> String {
    engine().backend_kind().to_string()
}
