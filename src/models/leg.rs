//! Sets, legs, and the throws recorded inside a leg.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type SetId = Uuid;
pub type LegId = Uuid;
pub type ThrowId = Uuid;

/// Status of a set or a leg: `Active -> Completed`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayStatus::Active => write!(f, "active"),
            PlayStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A race to win a fixed number of legs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSet {
    pub id: SetId,
    pub ordinal: u32,
    pub legs_won: [u32; 2],
    pub status: PlayStatus,
    pub winner: Option<PlayerId>,
    pub legs: Vec<Leg>,
}

impl GameSet {
    pub fn new(ordinal: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            ordinal,
            legs_won: [0, 0],
            status: PlayStatus::Active,
            winner: None,
            legs: Vec::new(),
        }
    }
}

/// One race to zero from the starting score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub id: LegId,
    pub ordinal: u32,
    /// Remaining score per slot.
    pub remaining: [u32; 2],
    pub starting_player: PlayerId,
    /// Whose turn it is.
    pub current_player: PlayerId,
    pub status: PlayStatus,
    pub winner: Option<PlayerId>,
    /// Append-only, except that the last entry may be undone while the leg is active.
    pub throws: Vec<Throw>,
}

impl Leg {
    pub fn new(ordinal: u32, starting_score: u32, starting_player: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            ordinal,
            remaining: [starting_score, starting_score],
            starting_player,
            current_player: starting_player,
            status: PlayStatus::Active,
            winner: None,
            throws: Vec::new(),
        }
    }
}

/// One turn (up to three darts) by one player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Throw {
    pub id: ThrowId,
    pub player: PlayerId,
    /// Score applied to the leg; 0 for a bust.
    pub score: u32,
    /// Thrower's remaining score after this turn.
    pub remaining: u32,
    pub bust: bool,
    /// Individual dart values, when the scorer entered them.
    #[serde(default)]
    pub darts: Vec<u32>,
    pub thrown_at: DateTime<Utc>,
}

impl Throw {
    pub fn scored(player: PlayerId, score: u32, remaining: u32, darts: Vec<u32>, thrown_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            score,
            remaining,
            bust: false,
            darts,
            thrown_at,
        }
    }

    /// A voided turn: nothing is applied and the remaining score stays put.
    pub fn bust(player: PlayerId, remaining: u32, darts: Vec<u32>, thrown_at: DateTime<Utc>) -> Self {
        Self {
            bust: true,
            ..Self::scored(player, 0, remaining, darts, thrown_at)
        }
    }
}
