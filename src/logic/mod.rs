//! Bracket business logic: generation, advancement, results, registration.

mod advancement;
mod bracket;
mod overview;
mod registration;
mod results;

pub use advancement::{advance_winner, receives_entrants, Advancement};
pub use bracket::{
    bracket_size, generate_bracket, is_valid_position, matches_in_round, total_rounds,
    BracketOutcome, MAX_ROUNDS, MIN_PARTICIPANTS,
};
pub use overview::{division_bracket, division_champion, DivisionBracket};
pub use registration::{edit_participant, register_participant, remove_participant};
pub use results::{apply_match_update, create_match, delete_match, report_result};
