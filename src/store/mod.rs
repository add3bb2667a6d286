//! Storage collaborator for the bracket core.
//!
//! Every core operation takes a `BracketStore`, so the bracket logic never
//! assumes a storage technology. Lookups of missing ids return `None` / `false`;
//! `Err` is reserved for failures of the backing engine itself.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    BracketError, BracketMatch, Division, MatchId, MatchPatch, NewMatch, NewParticipant,
    Participant, ParticipantId, ParticipantPatch,
};

pub trait BracketStore {
    fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>, BracketError>;
    /// Participants of `division`, in registration order.
    fn list_participants(&self, division: Division) -> Result<Vec<Participant>, BracketError>;
    fn all_participants(&self) -> Result<Vec<Participant>, BracketError>;
    fn create_participant(&mut self, fields: NewParticipant) -> Result<Participant, BracketError>;
    fn update_participant(
        &mut self,
        id: ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<Option<Participant>, BracketError>;
    fn delete_participant(&mut self, id: ParticipantId) -> Result<bool, BracketError>;

    fn get_match(&self, id: MatchId) -> Result<Option<BracketMatch>, BracketError>;
    /// Matches of `division`, ordered by round then match number.
    fn list_matches(&self, division: Division) -> Result<Vec<BracketMatch>, BracketError>;
    fn all_matches(&self) -> Result<Vec<BracketMatch>, BracketError>;
    fn create_match(&mut self, fields: NewMatch) -> Result<BracketMatch, BracketError>;
    /// Raw field update, no lifecycle checks and no advancement.
    fn update_match(
        &mut self,
        id: MatchId,
        patch: &MatchPatch,
    ) -> Result<Option<BracketMatch>, BracketError>;
    fn delete_match(&mut self, id: MatchId) -> Result<bool, BracketError>;
}
