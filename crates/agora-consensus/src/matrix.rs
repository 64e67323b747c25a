//! Participant × statement vote matrix.
//!
//! Ids are sorted and indexed densely, so row `i` is always the `i`-th
//! participant in lexicographic order regardless of event arrival order.
//! Cells hold `Option<Vote>`: `None` means "did not vote", which is distinct
//! from an explicit pass.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::error::Result;
use crate::vote::{Tally, Vote, VoteEvent};

/// Deduplicated votes with O(1) lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteMatrix {
    participants: Vec<String>,
    statements: Vec<String>,
    participant_index: HashMap<String, usize>,
    statement_index: HashMap<String, usize>,
    /// Row-major: `cells[p * statements.len() + s]`
    cells: Vec<Option<Vote>>,
    overwritten: usize,
}

impl VoteMatrix {
    /// Build from events in arrival order. Later votes on the same
    /// (participant, statement) pair replace earlier ones.
    ///
    /// Fails on the first value outside {-1, 0, 1}; nothing is built in that
    /// case.
    pub fn from_events(events: &[VoteEvent]) -> Result<Self> {
        let votes = events
            .iter()
            .map(|event| event.vote())
            .collect::<Result<Vec<Vote>>>()?;

        let participants: Vec<String> = events
            .iter()
            .map(|e| e.participant_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let statements: Vec<String> = events
            .iter()
            .map(|e| e.statement_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let participant_index = index_of(&participants);
        let statement_index = index_of(&statements);

        let width = statements.len();
        let mut cells = vec![None; participants.len() * width];
        let mut overwritten = 0;

        for (event, vote) in events.iter().zip(votes) {
            let p = participant_index[&event.participant_id];
            let s = statement_index[&event.statement_id];
            let cell = &mut cells[p * width + s];
            if cell.is_some() {
                overwritten += 1;
            }
            *cell = Some(vote);
        }

        trace!(
            events = events.len(),
            participants = participants.len(),
            statements = statements.len(),
            overwritten,
            "Built vote matrix"
        );

        Ok(Self {
            participants,
            statements,
            participant_index,
            statement_index,
            cells,
            overwritten,
        })
    }

    /// Whether no votes were recorded.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participant ids, sorted.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Statement ids, sorted.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Number of events that replaced an earlier vote.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    /// Row index of a participant.
    pub fn participant_index(&self, participant_id: &str) -> Option<usize> {
        self.participant_index.get(participant_id).copied()
    }

    /// Column index of a statement.
    pub fn statement_index(&self, statement_id: &str) -> Option<usize> {
        self.statement_index.get(statement_id).copied()
    }

    /// A participant's vote on a statement, by id.
    pub fn vote(&self, participant_id: &str, statement_id: &str) -> Option<Vote> {
        let p = self.participant_index(participant_id)?;
        let s = self.statement_index(statement_id)?;
        self.vote_at(p, s)
    }

    /// A participant's vote on a statement, by index. Out-of-range indices
    /// give `None`.
    pub fn vote_at(&self, participant: usize, statement: usize) -> Option<Vote> {
        if statement >= self.statements.len() {
            return None;
        }
        let cell = participant
            .checked_mul(self.statements.len())?
            .checked_add(statement)?;
        self.cells.get(cell).copied().flatten()
    }

    /// All cells of one participant, in statement order. Empty for an
    /// out-of-range index.
    pub fn row(&self, participant: usize) -> &[Option<Vote>] {
        let width = self.statements.len();
        participant
            .checked_mul(width)
            .and_then(|start| Some(start..start.checked_add(width)?))
            .and_then(|range| self.cells.get(range))
            .unwrap_or(&[])
    }

    /// Votes cast on one statement, in participant order.
    pub fn column(&self, statement: usize) -> impl Iterator<Item = Vote> + '_ {
        (0..self.participants.len()).filter_map(move |p| self.vote_at(p, statement))
    }

    /// Opinion vector of a participant: one coordinate per statement, with
    /// missing votes at 0.
    pub fn participant_vector(&self, participant: usize) -> Vec<f64> {
        self.row(participant)
            .iter()
            .map(|cell| cell.map_or(0.0, Vote::coordinate))
            .collect()
    }

    /// Vote counts of one participant.
    pub fn participant_tally(&self, participant: usize) -> Tally {
        Tally::from_votes(self.row(participant).iter().flatten().copied())
    }

    /// Vote counts on one statement.
    pub fn statement_tally(&self, statement: usize) -> Tally {
        Tally::from_votes(self.column(statement))
    }
}

fn index_of(ids: &[String]) -> HashMap<String, usize> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect()
}
