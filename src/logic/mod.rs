//! Tournament engine: bracket topology, setup, scoring, progression, corrections.

mod bracket;
mod correction;
mod progression;
mod scoring;
mod setup;

pub use bracket::{
    generate_bracket, generate_for, generate_single_elimination, Edge, MatchNode, NodeKey,
    DOUBLE_ELIMINATION_PLAYERS,
};
pub use correction::{undo_last_throw, undo_throw};
pub use progression::{activate_match, complete_match_progression, declare_winner, Progression};
pub use scoring::{
    apply_turn, player_to_throw, record_turn, set_starting_player, validate_turn, MatchEvent,
    MatchRules, Transition, Turn, TurnOutcome, DARTS_PER_TURN, MAX_DART_SCORE, MAX_TURN_SCORE,
};
pub use setup::{instantiate_bracket, match_at, start_tournament};
