//! Participant registration, edits and removal.

use crate::logic::bracket::generate_bracket;
use crate::models::{BracketError, NewParticipant, Participant, ParticipantId, ParticipantPatch};
use crate::store::BracketStore;
use rand::Rng;

/// Register a participant. With `regenerate`, the division's bracket is rebuilt
/// from scratch afterwards, discarding any recorded results.
pub fn register_participant<S, R>(
    store: &mut S,
    rng: &mut R,
    mut registration: NewParticipant,
    regenerate: bool,
) -> Result<Participant, BracketError>
where
    S: BracketStore + ?Sized,
    R: Rng + ?Sized,
{
    let name = registration.player_name.trim();
    if name.is_empty() {
        return Err(BracketError::EmptyName);
    }
    registration.player_name = name.to_string();

    let participant = store.create_participant(registration)?;
    log::info!(
        "Registered {} in {} ({})",
        participant.player_name,
        participant.division,
        participant.id
    );
    if regenerate {
        generate_bracket(store, rng, participant.division)?;
    }
    Ok(participant)
}

/// Partially update a participant; a new name is trimmed like at registration.
/// Moving a participant to another division is refused once they sit in a
/// match of their current division.
pub fn edit_participant<S: BracketStore + ?Sized>(
    store: &mut S,
    id: ParticipantId,
    patch: &ParticipantPatch,
) -> Result<Participant, BracketError> {
    let existing = store
        .get_participant(id)?
        .ok_or(BracketError::ParticipantNotFound(id))?;

    let mut patch = patch.clone();
    if let Some(name) = patch.player_name.as_mut() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BracketError::EmptyName);
        }
        *name = trimmed.to_string();
    }
    if let Some(division) = patch.division {
        let placed = division != existing.division
            && store
                .list_matches(existing.division)?
                .iter()
                .any(|m| m.has_participant(id));
        if placed {
            return Err(BracketError::DivisionLocked {
                participant: id,
                division: existing.division,
            });
        }
    }

    store
        .update_participant(id, &patch)?
        .ok_or(BracketError::ParticipantNotFound(id))
}

pub fn remove_participant<S: BracketStore + ?Sized>(
    store: &mut S,
    id: ParticipantId,
) -> Result<(), BracketError> {
    if store.delete_participant(id)? {
        log::info!("Removed participant {}", id);
        Ok(())
    } else {
        Err(BracketError::ParticipantNotFound(id))
    }
}
