//! Bracket match, its lifecycle status, and the slot a winner is placed into.

use crate::models::participant::{Division, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match. `Completed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// One of the two participant positions of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Slot that the winner of match `match_number` (1-based) takes in the next round:
    /// odd numbers feed the first slot, even numbers the second.
    pub fn fed_by(match_number: u32) -> Self {
        if match_number % 2 == 1 {
            Slot::First
        } else {
            Slot::Second
        }
    }
}

/// A single-elimination match inside a division's bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub division: Division,
    /// 1 = first round, increasing toward the final.
    pub round: u32,
    /// 1-based position within its round.
    pub match_number: u32,
    /// None if not yet determined (or a bye).
    pub participant1_id: Option<ParticipantId>,
    pub participant2_id: Option<ParticipantId>,
    pub winner_id: Option<ParticipantId>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl BracketMatch {
    pub fn new(fields: NewMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            division: fields.division,
            round: fields.round,
            match_number: fields.match_number,
            participant1_id: fields.participant1_id,
            participant2_id: fields.participant2_id,
            winner_id: fields.winner_id,
            status: fields.status,
            created_at: Utc::now(),
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::First => self.participant1_id,
            Slot::Second => self.participant2_id,
        }
    }

    /// True if `participant` sits in either slot.
    pub fn has_participant(&self, participant: ParticipantId) -> bool {
        self.participant1_id == Some(participant) || self.participant2_id == Some(participant)
    }

    /// Both slots are filled and no result has been recorded yet.
    pub fn is_playable(&self) -> bool {
        self.participant1_id.is_some()
            && self.participant2_id.is_some()
            && self.status != MatchStatus::Completed
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Apply the fields present in `patch` (no lifecycle checks).
    pub fn apply(&mut self, patch: &MatchPatch) {
        if let Some(p1) = patch.participant1_id {
            self.participant1_id = p1;
        }
        if let Some(p2) = patch.participant2_id {
            self.participant2_id = p2;
        }
        if let Some(winner) = patch.winner_id {
            self.winner_id = Some(winner);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Fields for creating a match; the store assigns id and timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub division: Division,
    pub round: u32,
    pub match_number: u32,
    #[serde(default)]
    pub participant1_id: Option<ParticipantId>,
    #[serde(default)]
    pub participant2_id: Option<ParticipantId>,
    #[serde(default)]
    pub winner_id: Option<ParticipantId>,
    #[serde(default)]
    pub status: MatchStatus,
}

impl NewMatch {
    /// Empty pending match at `round` / `match_number`.
    pub fn placeholder(division: Division, round: u32, match_number: u32) -> Self {
        Self {
            division,
            round,
            match_number,
            participant1_id: None,
            participant2_id: None,
            winner_id: None,
            status: MatchStatus::Pending,
        }
    }
}

/// Partial match update; absent fields are left unchanged. A slot sent as
/// `null` is emptied (`Some(None)`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPatch {
    #[serde(
        default,
        deserialize_with = "crate::models::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub participant1_id: Option<Option<ParticipantId>>,
    #[serde(
        default,
        deserialize_with = "crate::models::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub participant2_id: Option<Option<ParticipantId>>,
    #[serde(default)]
    pub winner_id: Option<ParticipantId>,
    #[serde(default)]
    pub status: Option<MatchStatus>,
}

impl MatchPatch {
    /// Record a result: completed with `winner`.
    pub fn completed(winner: ParticipantId) -> Self {
        Self {
            winner_id: Some(winner),
            status: Some(MatchStatus::Completed),
            ..Self::default()
        }
    }

    /// Empty a single slot.
    pub fn clear(slot: Slot) -> Self {
        match slot {
            Slot::First => Self {
                participant1_id: Some(None),
                ..Self::default()
            },
            Slot::Second => Self {
                participant2_id: Some(None),
                ..Self::default()
            },
        }
    }

    /// Fill a single slot.
    pub fn fill(slot: Slot, participant: ParticipantId) -> Self {
        match slot {
            Slot::First => Self {
                participant1_id: Some(Some(participant)),
                ..Self::default()
            },
            Slot::Second => Self {
                participant2_id: Some(Some(participant)),
                ..Self::default()
            },
        }
    }
}
