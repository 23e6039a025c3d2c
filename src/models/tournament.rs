//! Tournament, its configuration, and TournamentError.

use crate::models::game::{GameMatch, MatchId, MatchStatus};
use crate::models::leg::{LegId, ThrowId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Kind of entity an id failed to resolve to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entity {
    Tournament,
    Match,
    Leg,
    Throw,
    Player,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Tournament => write!(f, "Tournament"),
            Entity::Match => write!(f, "Match"),
            Entity::Leg => write!(f, "Leg"),
            Entity::Throw => write!(f, "Throw"),
            Entity::Player => write!(f, "Player"),
        }
    }
}

/// Errors that can occur during tournament operations.
///
/// None of these are retried internally; a failed operation leaves the tournament unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Malformed input: turn score out of range, wrong player count, bad configuration.
    Validation(String),
    /// Unknown entity id.
    NotFound { entity: Entity, id: Uuid },
    /// Operation not allowed for the entity's current status.
    State { id: Uuid, expected: String, actual: String },
    /// Activation requested while another match holds the board.
    Conflict { requested: MatchId, active: MatchId },
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TournamentError::Validation(msg.into())
    }

    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        TournamentError::NotFound { entity, id }
    }

    pub fn state(id: Uuid, expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        TournamentError::State {
            id,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            TournamentError::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            TournamentError::State { id, expected, actual } => {
                write!(f, "{} is {}, expected {}", id, actual, expected)
            }
            TournamentError::Conflict { requested, active } => {
                write!(f, "Cannot activate {}: match {} is already active", requested, active)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentFormat {
    SingleElimination,
    #[default]
    DoubleElimination,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Players known, bracket not yet instantiated.
    #[default]
    Setup,
    Active,
    Completed,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentStatus::Setup => write!(f, "setup"),
            TournamentStatus::Active => write!(f, "active"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Who throws first in a new leg.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegStarter {
    /// Every leg starts with the match's starting player (slot 1 unless set).
    #[default]
    MatchStarter,
    /// Legs alternate, beginning with the match's starting player.
    Alternate,
}

fn default_sets_to_win() -> u32 {
    1
}

fn default_legs_to_win() -> u32 {
    3
}

fn default_starting_score() -> u32 {
    501
}

/// Tournament configuration supplied by the surrounding application.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default = "default_sets_to_win")]
    pub sets_to_win: u32,
    #[serde(default = "default_legs_to_win")]
    pub legs_to_win: u32,
    #[serde(default = "default_starting_score")]
    pub starting_score: u32,
    /// Player names in seed order (first = seed 1).
    pub player_names: Vec<String>,
    #[serde(default)]
    pub leg_starter: LegStarter,
}

impl TournamentConfig {
    pub fn new(name: impl Into<String>, format: TournamentFormat, player_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            format,
            sets_to_win: default_sets_to_win(),
            legs_to_win: default_legs_to_win(),
            starting_score: default_starting_score(),
            player_names,
            leg_starter: LegStarter::default(),
        }
    }
}

/// Full tournament state: seeded players, the instantiated bracket, and the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub sets_to_win: u32,
    pub legs_to_win: u32,
    pub starting_score: u32,
    pub leg_starter: LegStarter,
    pub status: TournamentStatus,
    /// Players ordered by seed.
    pub players: Vec<Player>,
    /// Empty until the tournament is started.
    pub matches: Vec<GameMatch>,
    /// The one match allowed on the board; claimed only while empty.
    pub active_match: Option<MatchId>,
    pub champion: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament in Setup from a validated config. Seeds follow `player_names` order.
    pub fn from_config(config: TournamentConfig) -> Result<Self, TournamentError> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(TournamentError::validation("tournament name must not be empty"));
        }
        if config.sets_to_win == 0 || config.legs_to_win == 0 {
            return Err(TournamentError::validation("sets and legs to win must be at least 1"));
        }
        if config.starting_score < 2 {
            return Err(TournamentError::validation("starting score must be at least 2"));
        }

        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(config.player_names.len());
        for (i, raw) in config.player_names.iter().enumerate() {
            let player_name = raw.trim();
            if player_name.is_empty() {
                return Err(TournamentError::validation(format!("player {} has no name", i + 1)));
            }
            if !seen.insert(player_name.to_lowercase()) {
                return Err(TournamentError::validation(format!(
                    "duplicate player name {:?}",
                    player_name
                )));
            }
            players.push(Player::new(player_name, i as u32 + 1));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            format: config.format,
            sets_to_win: config.sets_to_win,
            legs_to_win: config.legs_to_win,
            starting_score: config.starting_score,
            leg_starter: config.leg_starter,
            status: TournamentStatus::Setup,
            players,
            matches: Vec::new(),
            active_match: None,
            champion: None,
            created_at: Utc::now(),
        })
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players sorted by seed (1 first).
    pub fn seeded_players(&self) -> Vec<&Player> {
        let mut players: Vec<_> = self.players.iter().collect();
        players.sort_by_key(|p| p.seed);
        players
    }

    pub fn has_match(&self, id: MatchId) -> bool {
        self.matches.iter().any(|m| m.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Result<usize, TournamentError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::not_found(Entity::Match, id))
    }

    pub fn get_match(&self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        self.match_index(id).map(|i| &self.matches[i])
    }

    /// (match, set, leg) indices of a leg.
    pub fn locate_leg(&self, id: LegId) -> Option<(usize, usize, usize)> {
        self.matches.iter().enumerate().find_map(|(mi, m)| {
            m.sets.iter().enumerate().find_map(|(si, s)| {
                s.legs.iter().position(|l| l.id == id).map(|li| (mi, si, li))
            })
        })
    }

    /// Leg id and position within the leg of a throw.
    pub fn locate_throw(&self, id: ThrowId) -> Option<(LegId, usize)> {
        self.matches
            .iter()
            .flat_map(|m| m.sets.iter())
            .flat_map(|s| s.legs.iter())
            .find_map(|l| l.throws.iter().position(|t| t.id == id).map(|ti| (l.id, ti)))
    }

    /// The match currently holding the board, if it is still being played.
    pub fn board_holder(&self) -> Option<MatchId> {
        self.active_match.filter(|&id| {
            self.matches
                .iter()
                .any(|m| m.id == id && m.status == MatchStatus::Active)
        })
    }

    /// Any match still pending or active.
    pub fn has_open_matches(&self) -> bool {
        self.matches.iter().any(GameMatch::is_open)
    }
}
