//! Engine facade.

use std::sync::Arc;

use agora_consensus::{ConsensusResult, VoteEvent, VoteMatrix};
use agora_ranking::{ScorableItem, ScoreContext, ScoredItem, SortStrategy};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::backend::{Backend, BackendKind, BackendSelector};
use crate::config::EngineConfig;
use crate::error::Result;

/// Ranking and consensus engine.
///
/// Stateless apart from its configuration and the selected backend;
/// cloning is cheap and clones share the backend.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    backend: Arc<dyn Backend>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine, selecting the backend from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let backend = BackendSelector::from_config(&config).select();
        info!(backend = %backend.kind(), "Engine ready");
        Self { config, backend }
    }

    /// Create an engine on an explicit backend.
    pub fn with_backend(config: EngineConfig, backend: Arc<dyn Backend>) -> Self {
        Self { config, backend }
    }

    /// Create an engine from `AGORA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(EngineConfig::from_env()?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Backend in use.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Rank items by strategy name as of now.
    pub fn rank(&self, items: &[ScorableItem], strategy: &str) -> Result<Vec<String>> {
        self.rank_at(items, strategy, Utc::now())
    }

    /// Rank items by strategy name as of `now`.
    pub fn rank_at(&self, items: &[ScorableItem], strategy: &str, now: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(self
            .rank_scored(items, strategy, now)?
            .into_iter()
            .map(|scored| scored.id)
            .collect())
    }

    /// Rank items and keep their scores.
    pub fn rank_scored(&self, items: &[ScorableItem], strategy: &str, now: DateTime<Utc>) -> Result<Vec<ScoredItem>> {
        let strategy: SortStrategy = strategy.parse()?;
        Ok(self.rank_with(items, strategy, now))
    }

    /// Rank items by a parsed strategy.
    pub fn rank_with(&self, items: &[ScorableItem], strategy: SortStrategy, now: DateTime<Utc>) -> Vec<ScoredItem> {
        let ctx = ScoreContext::new(self.config.scoring, now);
        let ranked = self.backend.rank(items, strategy, &ctx);
        debug!(
            strategy = %strategy,
            items = ranked.len(),
            backend = %self.backend.kind(),
            "Ranked items"
        );
        ranked
    }

    /// Analyze raw vote events.
    pub fn analyze_consensus(&self, votes: &[VoteEvent]) -> Result<ConsensusResult> {
        let matrix = VoteMatrix::from_events(votes)?;
        Ok(self.analyze_matrix(&matrix))
    }

    /// Analyze an already built matrix.
    pub fn analyze_matrix(&self, matrix: &VoteMatrix) -> ConsensusResult {
        let result = self.backend.analyze(matrix, &self.config.clustering);
        debug!(
            participants = result.total_participants,
            statements = result.statements.len(),
            clusters = result.cluster_count,
            backend = %self.backend.kind(),
            "Analyzed consensus"
        );
        result
    }
}
