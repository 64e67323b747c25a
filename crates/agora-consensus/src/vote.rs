//! Ternary votes and tallies.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated vote on a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Vote {
    /// -1
    Disagree,
    /// 0
    Pass,
    /// +1
    Agree,
}

impl Vote {
    /// Wire value: -1, 0 or 1.
    pub const fn value(self) -> i64 {
        match self {
            Self::Disagree => -1,
            Self::Pass => 0,
            Self::Agree => 1,
        }
    }

    /// Coordinate in a participant's opinion vector.
    pub const fn coordinate(self) -> f64 {
        match self {
            Self::Disagree => -1.0,
            Self::Pass => 0.0,
            Self::Agree => 1.0,
        }
    }
}

impl TryFrom<i64> for Vote {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Disagree),
            0 => Ok(Self::Pass),
            1 => Ok(Self::Agree),
            other => Err(format!("vote value must be -1, 0 or 1, got {}", other)),
        }
    }
}

impl From<Vote> for i64 {
    fn from(vote: Vote) -> Self {
        vote.value()
    }
}

/// One vote as reported by the voting collaborator.
///
/// `value` is kept raw so that out-of-range input can be reported with the
/// participant and statement it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteEvent {
    /// Who voted
    pub participant_id: String,
    /// What was voted on
    pub statement_id: String,
    /// -1 disagree, 0 pass, 1 agree
    pub value: i64,
}

impl VoteEvent {
    /// Create an event from a validated vote.
    pub fn new(participant_id: impl Into<String>, statement_id: impl Into<String>, vote: Vote) -> Self {
        Self::raw(participant_id, statement_id, vote.value())
    }

    /// Create an event from an unchecked wire value.
    pub fn raw(participant_id: impl Into<String>, statement_id: impl Into<String>, value: i64) -> Self {
        Self {
            participant_id: participant_id.into(),
            statement_id: statement_id.into(),
            value,
        }
    }

    /// Validate the value.
    pub fn vote(&self) -> Result<Vote> {
        Vote::try_from(self.value).map_err(|_| Error::InvalidVote {
            participant_id: self.participant_id.clone(),
            statement_id: self.statement_id.clone(),
            value: self.value,
        })
    }
}

/// Counts of each vote kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub agree: usize,
    pub disagree: usize,
    pub pass: usize,
}

impl Tally {
    /// Count one vote.
    pub fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Agree => self.agree += 1,
            Vote::Disagree => self.disagree += 1,
            Vote::Pass => self.pass += 1,
        }
    }

    /// Tally a sequence of votes.
    pub fn from_votes(votes: impl IntoIterator<Item = Vote>) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            tally.record(vote);
        }
        tally
    }

    /// All votes, passes included.
    pub fn total(&self) -> usize {
        self.agree + self.disagree + self.pass
    }

    /// Agree plus disagree.
    pub fn decisive(&self) -> usize {
        self.agree + self.disagree
    }

    /// Share of decisive votes that agree; 0 when there are none.
    pub fn agreement_ratio(&self) -> f64 {
        match self.decisive() {
            0 => 0.0,
            n => self.agree as f64 / n as f64,
        }
    }

    /// Share of all votes that agree; 0 when there are none.
    pub fn agree_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.agree as f64 / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_values() {
        for vote in [Vote::Disagree, Vote::Pass, Vote::Agree] {
            assert_eq!(Vote::try_from(vote.value()), Ok(vote));
            assert_eq!(vote.coordinate(), vote.value() as f64);
        }
        assert!(Vote::try_from(2).is_err());
        assert!(Vote::try_from(-5).is_err());
    }

    #[test]
    fn event_validation_names_the_vote() {
        let event = VoteEvent::raw("p1", "s1", 3);
        assert_eq!(
            event.vote(),
            Err(Error::InvalidVote {
                participant_id: "p1".to_string(),
                statement_id: "s1".to_string(),
                value: 3,
            })
        );
        assert_eq!(VoteEvent::new("p1", "s1", Vote::Agree).vote(), Ok(Vote::Agree));
    }

    #[test]
    fn event_deserializes_from_wire() {
        let event: VoteEvent =
            serde_json::from_str(r#"{"participant_id":"p","statement_id":"s","value":-1}"#)
                .unwrap();
        assert_eq!(event.vote(), Ok(Vote::Disagree));
    }

    #[test]
    fn vote_serde_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<Vote>("1").unwrap(), Vote::Agree);
        assert!(serde_json::from_str::<Vote>("7").is_err());
    }

    #[test]
    fn tally_ratios() {
        let tally = Tally {
            agree: 6,
            disagree: 2,
            pass: 2,
        };
        assert_eq!(tally.total(), 10);
        assert_eq!(tally.decisive(), 8);
        assert_eq!(tally.agreement_ratio(), 0.75);
        assert_eq!(tally.agree_rate(), 0.6);
    }

    #[test]
    fn tally_empty_ratios_are_zero() {
        let passes = Tally::from_votes([Vote::Pass, Vote::Pass]);
        assert_eq!(passes.agreement_ratio(), 0.0);
        assert_eq!(Tally::default().agree_rate(), 0.0);
    }
}
