//! Per-statement agreement and divisiveness.
//!
//! `agreement_ratio = agree / (agree + disagree)` and
//! `divisiveness = 1 − 2·|agreement_ratio − 0.5|`. Passes count toward
//! `total_votes` but not toward either ratio. A statement that only received
//! passes reports 0 for both, by convention.

use serde::{Deserialize, Serialize};

use crate::matrix::VoteMatrix;
use crate::vote::Tally;

/// Aggregate votes on one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    pub statement_id: String,
    /// Share of decisive votes that agree, in [0, 1]
    pub agreement_ratio: f64,
    /// 1 for an even agree/disagree split, 0 for a unanimous one
    pub divisiveness: f64,
    pub total_votes: usize,
    pub agree_count: usize,
    pub disagree_count: usize,
    pub pass_count: usize,
}

impl StatementResult {
    /// Derive statistics from a tally.
    pub fn from_tally(statement_id: impl Into<String>, tally: Tally) -> Self {
        let (agreement_ratio, divisiveness) = if tally.decisive() > 0 {
            let ratio = tally.agreement_ratio();
            (ratio, divisiveness(ratio))
        } else {
            (0.0, 0.0)
        };

        Self {
            statement_id: statement_id.into(),
            agreement_ratio,
            divisiveness,
            total_votes: tally.total(),
            agree_count: tally.agree,
            disagree_count: tally.disagree,
            pass_count: tally.pass,
        }
    }
}

/// `1 − 2·|ratio − 0.5|`, clamped to [0, 1].
pub fn divisiveness(agreement_ratio: f64) -> f64 {
    (1.0 - 2.0 * (agreement_ratio - 0.5).abs()).clamp(0.0, 1.0)
}

/// Statistics for the statement at column `statement`, if it exists.
pub fn statement_result(matrix: &VoteMatrix, statement: usize) -> Option<StatementResult> {
    let statement_id = matrix.statements().get(statement)?;
    Some(StatementResult::from_tally(
        statement_id.clone(),
        matrix.statement_tally(statement),
    ))
}

/// Statistics for every statement, in statement id order.
///
/// Every statement in the matrix has at least one vote by construction.
pub fn statement_results(matrix: &VoteMatrix) -> Vec<StatementResult> {
    (0..matrix.statement_count())
        .filter_map(|s| statement_result(matrix, s))
        .collect()
}
