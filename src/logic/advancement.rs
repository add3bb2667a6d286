//! Advancement: move the winner of a completed match into its slot of the next round.

use crate::models::{BracketError, BracketMatch, Division, MatchId, MatchPatch, ParticipantId, Slot};
use crate::store::BracketStore;

/// What advancing a completed match did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advancement {
    /// Winner placed into `slot` of `target`.
    Advanced { target: MatchId, slot: Slot },
    /// The slot already holds this winner; nothing written.
    AlreadyAdvanced { target: MatchId, slot: Slot },
    /// The slot holds someone else; it is never overwritten.
    SlotTaken {
        target: MatchId,
        slot: Slot,
        occupant: ParticipantId,
    },
    /// The match was the final: the winner is the division champion.
    Champion(ParticipantId),
    /// No match at the expected position of the next round.
    DanglingReference {
        division: Division,
        round: u32,
        index: usize,
    },
}

/// Advance the winner of `completed` into the next round of its division.
///
/// Matches `2i-1` and `2i` of round `r` feed match `i` of round `r+1`; odd
/// numbers take the first slot, even numbers the second. When the sibling
/// feeder can never produce a winner (the tail of a short first round), the
/// target only ever receives this winner, so it is completed as a bye and
/// advanced too.
pub fn advance_winner<S: BracketStore + ?Sized>(
    store: &mut S,
    completed: &BracketMatch,
) -> Result<Advancement, BracketError> {
    let winner = completed
        .winner_id
        .ok_or(BracketError::MissingWinner(completed.id))?;
    let division = completed.division;
    let division_matches = store.list_matches(division)?;

    let mut next: Vec<&BracketMatch> = match completed.round.checked_add(1) {
        Some(next_round) => division_matches
            .iter()
            .filter(|m| m.round == next_round)
            .collect(),
        None => Vec::new(),
    };
    next.sort_by_key(|m| m.match_number);
    let Some(next_round) = next.first().map(|m| m.round) else {
        log::info!("{} champion decided: {}", division, winner);
        return Ok(Advancement::Champion(winner));
    };

    let index = (completed.match_number.saturating_sub(1) / 2) as usize;
    let Some(target) = next.get(index) else {
        log::warn!(
            "{} round {} has no match at index {} to receive the winner of match {}",
            division,
            next_round,
            index,
            completed.id
        );
        return Ok(Advancement::DanglingReference {
            division,
            round: next_round,
            index,
        });
    };

    let slot = Slot::fed_by(completed.match_number);
    match target.slot(slot) {
        Some(occupant) if occupant == winner => {
            return Ok(Advancement::AlreadyAdvanced {
                target: target.id,
                slot,
            });
        }
        Some(occupant) => {
            log::warn!(
                "Not overwriting {:?} slot of {} round {} match {}: held by {}, winner {}",
                slot,
                division,
                next_round,
                target.match_number,
                occupant,
                winner
            );
            return Ok(Advancement::SlotTaken {
                target: target.id,
                slot,
                occupant,
            });
        }
        None => {}
    }

    let updated = store
        .update_match(target.id, &MatchPatch::fill(slot, winner))?
        .ok_or(BracketError::MatchNotFound(target.id))?;

    let sibling = match slot {
        Slot::First => completed.match_number.saturating_add(1),
        Slot::Second => completed.match_number.saturating_sub(1),
    };
    let first_round = division_matches.iter().filter(|m| m.round == 1).count();
    let sibling_live = receives_entrants(first_round, completed.round, sibling);
    if !sibling_live && !updated.is_completed() {
        log::debug!(
            "{} round {} match {} has a single entrant, completing as a bye",
            division,
            next_round,
            updated.match_number
        );
        let bye = store
            .update_match(updated.id, &MatchPatch::completed(winner))?
            .ok_or(BracketError::MatchNotFound(updated.id))?;
        advance_winner(store, &bye)?;
    }

    Ok(Advancement::Advanced {
        target: updated.id,
        slot,
    })
}

/// Whether match `match_number` of `round` can ever receive a participant when
/// round 1 holds matches `1..=first_round`. Its subtree starts at round-1 match
/// `(match_number - 1) * 2^(round - 1) + 1`; the match is dead if that one was never created.
pub fn receives_entrants(first_round: usize, round: u32, match_number: u32) -> bool {
    if match_number == 0 || round == 0 {
        return false;
    }
    let span = 1usize.checked_shl(round - 1).unwrap_or(usize::MAX);
    ((match_number - 1) as usize).saturating_mul(span) < first_round
}
