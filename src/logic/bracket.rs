//! Bracket generation: seed a division into a single-elimination tree.

use crate::logic::advancement::advance_winner;
use crate::models::{BracketError, BracketMatch, Division, MatchStatus, NewMatch};
use crate::store::BracketStore;
use rand::seq::SliceRandom;
use rand::Rng;

/// A bracket needs at least one pairing.
pub const MIN_PARTICIPANTS: usize = 2;

/// Deepest round a bracket may have (a bracket of 2^32 slots).
pub const MAX_ROUNDS: u32 = 32;

/// Result of a generation request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketOutcome {
    /// Previous matches were discarded and these created.
    Generated(Vec<BracketMatch>),
    /// Fewer than two participants: nothing changed, `existing` is the prior bracket.
    InsufficientParticipants {
        found: usize,
        existing: Vec<BracketMatch>,
    },
}

impl BracketOutcome {
    /// The division's matches after the request, whichever way it went.
    pub fn matches(&self) -> &[BracketMatch] {
        match self {
            BracketOutcome::Generated(matches) => matches,
            BracketOutcome::InsufficientParticipants { existing, .. } => existing,
        }
    }

    pub fn into_matches(self) -> Vec<BracketMatch> {
        match self {
            BracketOutcome::Generated(matches) => matches,
            BracketOutcome::InsufficientParticipants { existing, .. } => existing,
        }
    }
}

/// Smallest power of two that fits `participants`.
pub fn bracket_size(participants: usize) -> usize {
    participants.max(1).next_power_of_two()
}

/// Rounds needed to reduce `participants` to a champion.
pub fn total_rounds(participants: usize) -> u32 {
    bracket_size(participants).trailing_zeros()
}

/// Matches in `round` (1-based) of a bracket of `size` slots.
pub fn matches_in_round(size: usize, round: u32) -> usize {
    size >> round
}

/// Whether `round` / `match_number` name a place that some bracket can have.
pub fn is_valid_position(round: u32, match_number: u32) -> bool {
    (1..=MAX_ROUNDS).contains(&round)
        && (1..=(1u32 << (MAX_ROUNDS - round))).contains(&match_number)
}

/// Regenerate the bracket of `division` from its current participants.
///
/// 1. Discard every existing match of the division.
/// 2. Shuffle participants (uniform, from `rng`).
/// 3. Round 1: pair consecutive participants; an odd one out gets a bye (completed, auto-won).
/// 4. Rounds 2..=total: empty pending placeholders.
/// 5. Advance round-1 byes into round 2.
///
/// Returns the new matches ordered by round then match number.
pub fn generate_bracket<S, R>(
    store: &mut S,
    rng: &mut R,
    division: Division,
) -> Result<BracketOutcome, BracketError>
where
    S: BracketStore + ?Sized,
    R: Rng + ?Sized,
{
    let mut participants = store.list_participants(division)?;
    let existing = store.list_matches(division)?;
    if participants.len() < MIN_PARTICIPANTS {
        log::debug!(
            "Not generating {} bracket: {} participant(s)",
            division,
            participants.len()
        );
        return Ok(BracketOutcome::InsufficientParticipants {
            found: participants.len(),
            existing,
        });
    }

    for m in &existing {
        store.delete_match(m.id)?;
    }

    let n = participants.len();
    let size = bracket_size(n);
    let rounds = total_rounds(n);
    participants.shuffle(rng);

    let mut byes = Vec::new();
    for (i, pair) in participants.chunks(2).enumerate() {
        let match_number = i as u32 + 1;
        let first = pair[0].id;
        let fields = match pair.get(1) {
            Some(second) => NewMatch {
                participant1_id: Some(first),
                participant2_id: Some(second.id),
                ..NewMatch::placeholder(division, 1, match_number)
            },
            None => NewMatch {
                participant1_id: Some(first),
                winner_id: Some(first),
                status: MatchStatus::Completed,
                ..NewMatch::placeholder(division, 1, match_number)
            },
        };
        let created = store.create_match(fields)?;
        if created.is_completed() {
            byes.push(created);
        }
    }

    for round in 2..=rounds {
        for match_number in 1..=matches_in_round(size, round) {
            store.create_match(NewMatch::placeholder(division, round, match_number as u32))?;
        }
    }

    for bye in &byes {
        advance_winner(store, bye)?;
    }

    let matches = store.list_matches(division)?;
    log::info!(
        "Generated {} bracket: {} participants, {} rounds, {} matches ({} bye(s))",
        division,
        n,
        rounds,
        matches.len(),
        byes.len()
    );
    Ok(BracketOutcome::Generated(matches))
}
