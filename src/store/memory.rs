//! In-process store: participants and matches kept in plain vectors.

use crate::models::{
    BracketError, BracketMatch, Division, MatchId, MatchPatch, NewMatch, NewParticipant,
    Participant, ParticipantId, ParticipantPatch,
};
use crate::store::BracketStore;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Registration order.
    participants: Vec<Participant>,
    /// Creation order.
    matches: Vec<BracketMatch>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BracketStore for MemoryStore {
    fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>, BracketError> {
        Ok(self.participants.iter().find(|p| p.id == id).cloned())
    }

    fn list_participants(&self, division: Division) -> Result<Vec<Participant>, BracketError> {
        Ok(self
            .participants
            .iter()
            .filter(|p| p.division == division)
            .cloned()
            .collect())
    }

    fn all_participants(&self) -> Result<Vec<Participant>, BracketError> {
        Ok(self.participants.clone())
    }

    fn create_participant(&mut self, fields: NewParticipant) -> Result<Participant, BracketError> {
        let participant = Participant::from_registration(fields);
        self.participants.push(participant.clone());
        Ok(participant)
    }

    fn update_participant(
        &mut self,
        id: ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<Option<Participant>, BracketError> {
        Ok(self.participants.iter_mut().find(|p| p.id == id).map(|p| {
            p.apply(patch);
            p.clone()
        }))
    }

    fn delete_participant(&mut self, id: ParticipantId) -> Result<bool, BracketError> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        Ok(self.participants.len() != before)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<BracketMatch>, BracketError> {
        Ok(self.matches.iter().find(|m| m.id == id).cloned())
    }

    fn list_matches(&self, division: Division) -> Result<Vec<BracketMatch>, BracketError> {
        let mut matches: Vec<_> = self
            .matches
            .iter()
            .filter(|m| m.division == division)
            .cloned()
            .collect();
        // Stable sort keeps creation order for matches created by hand with duplicate numbers.
        matches.sort_by_key(|m| (m.round, m.match_number));
        Ok(matches)
    }

    fn all_matches(&self) -> Result<Vec<BracketMatch>, BracketError> {
        Ok(self.matches.clone())
    }

    fn create_match(&mut self, fields: NewMatch) -> Result<BracketMatch, BracketError> {
        let m = BracketMatch::new(fields);
        self.matches.push(m.clone());
        Ok(m)
    }

    fn update_match(
        &mut self,
        id: MatchId,
        patch: &MatchPatch,
    ) -> Result<Option<BracketMatch>, BracketError> {
        Ok(self.matches.iter_mut().find(|m| m.id == id).map(|m| {
            m.apply(patch);
            m.clone()
        }))
    }

    fn delete_match(&mut self, id: MatchId) -> Result<bool, BracketError> {
        let before = self.matches.len();
        self.matches.retain(|m| m.id != id);
        Ok(self.matches.len() != before)
    }
}
