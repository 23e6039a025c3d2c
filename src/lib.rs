//! Dart tournament engine: bracket topology, leg/set/match scoring, and bracket progression.

pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use logic::{
    activate_match, apply_turn, complete_match_progression, declare_winner, generate_bracket,
    generate_for, generate_single_elimination, instantiate_bracket, match_at, player_to_throw,
    record_turn, set_starting_player, start_tournament, undo_last_throw, undo_throw, validate_turn,
    Edge, MatchEvent, MatchNode, MatchRules, NodeKey, Progression, Transition, Turn, TurnOutcome,
    DARTS_PER_TURN, DOUBLE_ELIMINATION_PLAYERS, MAX_DART_SCORE, MAX_TURN_SCORE,
};
pub use models::{
    BracketKind, Entity, GameMatch, GameSet, Leg, LegId, LegStarter, MatchId, MatchStatus,
    PlayStatus, Player, PlayerId, Route, SetId, Slot, Throw, ThrowId, Tournament,
    TournamentConfig, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
pub use roster::read_roster;
pub use store::TournamentStore;
