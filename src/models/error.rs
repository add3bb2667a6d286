//! Errors raised by bracket, match and registration operations.

use crate::models::bracket_match::MatchId;
use crate::models::participant::{Division, ParticipantId};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),
    /// The reported winner occupies neither slot of the match.
    #[error("Participant {winner} is not playing in match {match_id}")]
    InvalidWinner {
        match_id: MatchId,
        winner: ParticipantId,
    },
    #[error("A completed match needs a winner (match {0})")]
    MissingWinner(MatchId),
    #[error("A winner can only be set when completing match {0}")]
    WinnerWithoutCompletion(MatchId),
    /// No transition leaves `completed`.
    #[error("Match {0} is already completed")]
    MatchCompleted(MatchId),
    /// Completing a match that still waits for an opponent who can arrive.
    #[error("Match {0} is still waiting for a participant")]
    NotPlayable(MatchId),
    /// Round and match number must describe a place in a bracket.
    #[error("No bracket has round {round} match {match_number}")]
    InvalidPosition { round: u32, match_number: u32 },
    /// Division membership is frozen once the participant is placed in a bracket.
    #[error("Participant {participant} is already placed in the {division} bracket")]
    DivisionLocked {
        participant: ParticipantId,
        division: Division,
    },
    #[error("Player name must not be empty")]
    EmptyName,
    /// Failure reported by the backing store.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BracketError {
    /// True for lookups of ids that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BracketError::MatchNotFound(_) | BracketError::ParticipantNotFound(_)
        )
    }
}
