//! Data structures for division brackets: participants, matches, errors.

mod bracket_match;
mod error;
mod participant;

pub use bracket_match::{BracketMatch, MatchId, MatchPatch, MatchStatus, NewMatch, Slot};
pub use error::BracketError;
pub use participant::{
    Division, NewParticipant, Participant, ParticipantId, ParticipantPatch, ParticipantStatus,
    UnknownDivision,
};

use serde::{Deserialize, Deserializer};

/// Patch field that tells an explicit `null` (clear the value) apart from a
/// missing key (leave it alone). Use with `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
