//! Match updates and result reporting. Completing a match advances its winner.

use crate::logic::advancement::{advance_winner, receives_entrants};
use crate::logic::bracket::is_valid_position;
use crate::models::{
    BracketError, BracketMatch, MatchId, MatchPatch, MatchStatus, NewMatch, ParticipantId, Slot,
};
use crate::store::BracketStore;

/// Record that `winner` won match `match_id` and advance them.
pub fn report_result<S: BracketStore + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    winner: ParticipantId,
) -> Result<BracketMatch, BracketError> {
    apply_match_update(store, match_id, &MatchPatch::completed(winner))
}

/// Apply a partial update to a match.
///
/// `completed` is terminal: a completed match only accepts an identical
/// re-report, which re-runs advancement without writing anything new.
/// A winner may only be set together with `status: completed` and must sit
/// in one of the slots. A match can only be completed once both slots are
/// filled, or as a bye when the empty slot can no longer receive anyone.
pub fn apply_match_update<S: BracketStore + ?Sized>(
    store: &mut S,
    id: MatchId,
    patch: &MatchPatch,
) -> Result<BracketMatch, BracketError> {
    let existing = store.get_match(id)?.ok_or(BracketError::MatchNotFound(id))?;

    if existing.is_completed() {
        if !leaves_unchanged(&existing, patch) {
            return Err(BracketError::MatchCompleted(id));
        }
        if patch.status == Some(MatchStatus::Completed) {
            advance_winner(store, &existing)?;
        }
        return Ok(existing);
    }

    let mut candidate = existing.clone();
    candidate.apply(patch);
    check_result(&candidate)?;
    if candidate.is_completed() {
        let division_matches = store.list_matches(candidate.division)?;
        if awaits_entrant(&division_matches, &candidate) {
            return Err(BracketError::NotPlayable(id));
        }
    }

    let updated = store
        .update_match(id, patch)?
        .ok_or(BracketError::MatchNotFound(id))?;
    if updated.is_completed() {
        let advancement = advance_winner(store, &updated)?;
        log::debug!(
            "{} round {} match {} completed: {:?}",
            updated.division,
            updated.round,
            updated.match_number,
            advancement
        );
    }
    Ok(updated)
}

/// Create a single match by hand (admin tooling).
pub fn create_match<S: BracketStore + ?Sized>(
    store: &mut S,
    fields: NewMatch,
) -> Result<BracketMatch, BracketError> {
    if !is_valid_position(fields.round, fields.match_number) {
        return Err(BracketError::InvalidPosition {
            round: fields.round,
            match_number: fields.match_number,
        });
    }
    let candidate = BracketMatch::new(fields.clone());
    check_result(&candidate)?;
    store.create_match(fields)
}

pub fn delete_match<S: BracketStore + ?Sized>(
    store: &mut S,
    id: MatchId,
) -> Result<(), BracketError> {
    if store.delete_match(id)? {
        Ok(())
    } else {
        Err(BracketError::MatchNotFound(id))
    }
}

/// Winner only on completed matches, completed matches always have one, and it is a player.
fn check_result(m: &BracketMatch) -> Result<(), BracketError> {
    match (m.status, m.winner_id) {
        (MatchStatus::Completed, None) => Err(BracketError::MissingWinner(m.id)),
        (MatchStatus::Completed, Some(winner)) if !m.has_participant(winner) => {
            Err(BracketError::InvalidWinner {
                match_id: m.id,
                winner,
            })
        }
        (MatchStatus::Pending | MatchStatus::InProgress, Some(_)) => {
            Err(BracketError::WinnerWithoutCompletion(m.id))
        }
        _ => Ok(()),
    }
}

/// True if `m` has an empty slot that a live feeder in the previous round can still fill.
/// A round-1 match with one participant is a bye.
fn awaits_entrant(division_matches: &[BracketMatch], m: &BracketMatch) -> bool {
    let empty = match (m.participant1_id, m.participant2_id) {
        (Some(_), Some(_)) => return false,
        (None, None) => return true,
        (Some(_), None) => Slot::Second,
        (None, Some(_)) => Slot::First,
    };
    if m.round <= 1 {
        return false;
    }
    let feeder = match empty {
        Slot::First => m.match_number.saturating_mul(2).saturating_sub(1),
        Slot::Second => m.match_number.saturating_mul(2),
    };
    let first_round = division_matches.iter().filter(|x| x.round == 1).count();
    receives_entrants(first_round, m.round - 1, feeder)
}

fn leaves_unchanged(m: &BracketMatch, patch: &MatchPatch) -> bool {
    fn same<T: PartialEq>(new: Option<T>, current: Option<T>) -> bool {
        new.is_none() || new == current
    }
    same(patch.participant1_id, Some(m.participant1_id))
        && same(patch.participant2_id, Some(m.participant2_id))
        && same(patch.winner_id, m.winner_id)
        && same(patch.status, Some(m.status))
}
