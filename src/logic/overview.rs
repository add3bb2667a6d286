//! Read-only view of a division's bracket, grouped by round.

use crate::models::{BracketError, BracketMatch, Division, ParticipantId};
use crate::store::BracketStore;
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DivisionBracket {
    pub division: Division,
    pub total_rounds: u32,
    /// One entry per round that has matches, in round order; each ordered by match number.
    pub rounds: Vec<Vec<BracketMatch>>,
    pub champion: Option<ParticipantId>,
}

pub fn division_bracket<S: BracketStore + ?Sized>(
    store: &S,
    division: Division,
) -> Result<DivisionBracket, BracketError> {
    let matches = store.list_matches(division)?;
    let total_rounds = matches.iter().map(|m| m.round).max().unwrap_or(0);
    let champion = champion_of(&matches);

    // `list_matches` is round-major, so each round is a contiguous run.
    let mut rounds: Vec<Vec<BracketMatch>> = Vec::new();
    for m in matches {
        match rounds.last_mut() {
            Some(round) if round.last().is_some_and(|prev| prev.round == m.round) => round.push(m),
            _ => rounds.push(vec![m]),
        }
    }

    Ok(DivisionBracket {
        division,
        total_rounds,
        rounds,
        champion,
    })
}

/// Winner of the division's final, once it has been played.
pub fn division_champion<S: BracketStore + ?Sized>(
    store: &S,
    division: Division,
) -> Result<Option<ParticipantId>, BracketError> {
    Ok(champion_of(&store.list_matches(division)?))
}

fn champion_of(matches: &[BracketMatch]) -> Option<ParticipantId> {
    let last_round = matches.iter().map(|m| m.round).max()?;
    let mut finals = matches.iter().filter(|m| m.round == last_round);
    match (finals.next(), finals.next()) {
        (Some(final_match), None) if final_match.is_completed() => final_match.winner_id,
        _ => None,
    }
}
