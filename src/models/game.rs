//! Match (game), Slot, and the bracket coordinates a match is routed by.

use crate::models::leg::{GameSet, Leg, PlayStatus};
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two player positions of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    #[serde(rename = "slot1")]
    One,
    #[serde(rename = "slot2")]
    Two,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::One, Slot::Two];

    /// Index into per-slot arrays (`[T; 2]`).
    pub fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

/// Which part of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BracketKind {
    Winners,
    Losers,
    GrandFinal,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Winners => write!(f, "Winners"),
            BracketKind::Losers => write!(f, "Losers"),
            BracketKind::GrandFinal => write!(f, "Grand Final"),
        }
    }
}

/// Lifecycle of a match: `Pending -> Active -> Completed`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Active => write!(f, "active"),
            MatchStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Where a winner or loser goes next.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub target: MatchId,
    pub slot: Slot,
}

/// A live match between two slots, scored in sets of legs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub bracket: BracketKind,
    pub round: u32,
    pub position: u32,
    /// Display name, e.g. "Winners R1 M2" or "Losers Final".
    pub label: String,
    /// Slot players; `None` is "TBD" until seeding or routing fills it.
    pub players: [Option<PlayerId>; 2],
    pub status: MatchStatus,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    pub winner_route: Option<Route>,
    pub loser_route: Option<Route>,
    pub sets_won: [u32; 2],
    /// Ordinal of the set the next turn is played in.
    pub current_set: u32,
    /// Ordinal of the leg (within the current set) the next turn is played in.
    pub current_leg: u32,
    /// Operator-chosen player who throws first; slot 1 when unset.
    pub starting_player: Option<PlayerId>,
    /// Set once winner and loser have been routed onward.
    pub progressed: bool,
    pub sets: Vec<GameSet>,
}

impl GameMatch {
    pub fn new(bracket: BracketKind, round: u32, position: u32, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket,
            round,
            position,
            label: label.into(),
            players: [None, None],
            status: MatchStatus::Pending,
            winner: None,
            loser: None,
            winner_route: None,
            loser_route: None,
            sets_won: [0, 0],
            current_set: 1,
            current_leg: 1,
            starting_player: None,
            progressed: false,
            sets: Vec::new(),
        }
    }

    pub fn player(&self, slot: Slot) -> Option<PlayerId> {
        self.players[slot.index()]
    }

    /// Slot the given player occupies in this match, if any.
    pub fn slot_of(&self, player: PlayerId) -> Option<Slot> {
        Slot::BOTH
            .into_iter()
            .find(|&slot| self.player(slot) == Some(player))
    }

    /// Both slots filled.
    pub fn is_ready(&self) -> bool {
        self.players.iter().all(Option::is_some)
    }

    pub fn is_open(&self) -> bool {
        self.status != MatchStatus::Completed
    }

    /// Legs started so far across all sets.
    pub fn legs_played(&self) -> usize {
        self.sets.iter().map(|s| s.legs.len()).sum()
    }

    pub fn active_set(&self) -> Option<&GameSet> {
        self.sets.iter().find(|s| s.status == PlayStatus::Active)
    }

    pub fn active_leg(&self) -> Option<&Leg> {
        self.active_set()
            .and_then(|s| s.legs.iter().find(|l| l.status == PlayStatus::Active))
    }
}
