//! Data structures for the dart tournament: players, matches, sets, legs, tournament state.

mod game;
mod leg;
mod player;
mod tournament;

pub use game::{BracketKind, GameMatch, MatchId, MatchStatus, Route, Slot};
pub use leg::{GameSet, Leg, LegId, PlayStatus, SetId, Throw, ThrowId};
pub use player::{Player, PlayerId};
pub use tournament::{
    Entity, LegStarter, Tournament, TournamentConfig, TournamentError, TournamentFormat,
    TournamentId, TournamentStatus,
};
