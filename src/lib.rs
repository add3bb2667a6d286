//! Division tournament brackets: library with models, storage and bracket logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    advance_winner, apply_match_update, bracket_size, create_match, delete_match,
    division_bracket, division_champion, edit_participant, generate_bracket, is_valid_position,
    matches_in_round, receives_entrants, register_participant, remove_participant, report_result,
    total_rounds, Advancement, BracketOutcome, DivisionBracket, MAX_ROUNDS, MIN_PARTICIPANTS,
};
pub use models::{
    BracketError, BracketMatch, Division, MatchId, MatchPatch, MatchStatus, NewMatch,
    NewParticipant, Participant, ParticipantId, ParticipantPatch, ParticipantStatus, Slot,
    UnknownDivision,
};
pub use store::{BracketStore, MemoryStore};
