//! Turn scoring: one turn at a time inside a leg, cascading leg -> set -> match completion.
//!
//! [`apply_turn`] is a pure transition over a match: it returns the next match state, the
//! outcome reported to the scorer, and the events the bracket controller consumes.
//! [`record_turn`] commits a transition to the tournament and runs progression on a match win.

use crate::logic::progression::complete_match_progression;
use crate::models::{
    GameMatch, GameSet, Leg, LegId, LegStarter, MatchId, MatchStatus, PlayStatus, PlayerId, SetId,
    Slot, Throw, Tournament, TournamentError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest score three darts can make.
pub const MAX_TURN_SCORE: u32 = 180;
/// Highest single dart (treble 20).
pub const MAX_DART_SCORE: u32 = 60;
pub const DARTS_PER_TURN: usize = 3;

/// Match format rules taken from the tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchRules {
    pub sets_to_win: u32,
    pub legs_to_win: u32,
    pub starting_score: u32,
    pub leg_starter: LegStarter,
}

impl MatchRules {
    pub fn of(tournament: &Tournament) -> Self {
        Self {
            sets_to_win: tournament.sets_to_win,
            legs_to_win: tournament.legs_to_win,
            starting_score: tournament.starting_score,
            leg_starter: tournament.leg_starter,
        }
    }
}

/// A turn as entered by the scorer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub player: PlayerId,
    pub score: u32,
    /// Optional per-dart values for the audit trail.
    #[serde(default)]
    pub darts: Vec<u32>,
}

impl Turn {
    pub fn new(player: PlayerId, score: u32) -> Self {
        Self {
            player,
            score,
            darts: Vec::new(),
        }
    }

    pub fn with_darts(player: PlayerId, darts: Vec<u32>) -> Self {
        Self {
            player,
            score: darts.iter().sum(),
            darts,
        }
    }
}

/// What a turn did, as reported back to the scorer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Score applied; turn passed.
    Scored { remaining: u32 },
    /// Turn voided; remaining unchanged; turn passed.
    Bust { remaining: u32 },
    LegWon,
    /// Leg and set won.
    SetWon,
    /// Leg, set, and match won.
    MatchWon,
}

impl TurnOutcome {
    pub fn is_bust(&self) -> bool {
        matches!(self, TurnOutcome::Bust { .. })
    }

    pub fn leg_won(&self) -> bool {
        matches!(self, TurnOutcome::LegWon | TurnOutcome::SetWon | TurnOutcome::MatchWon)
    }

    pub fn set_won(&self) -> bool {
        matches!(self, TurnOutcome::SetWon | TurnOutcome::MatchWon)
    }

    pub fn match_won(&self) -> bool {
        matches!(self, TurnOutcome::MatchWon)
    }

    /// Thrower's remaining score, for turns that did not finish the leg.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            TurnOutcome::Scored { remaining } | TurnOutcome::Bust { remaining } => Some(*remaining),
            _ => None,
        }
    }
}

/// Completion emitted by a transition, in cascade order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    LegWon { leg: LegId, winner: PlayerId },
    SetWon { set: SetId, winner: PlayerId },
    MatchWon { game: MatchId, winner: PlayerId, loser: PlayerId },
}

/// Result of applying one turn to a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub game: GameMatch,
    pub outcome: TurnOutcome,
    pub events: Vec<MatchEvent>,
}

/// Check a turn's shape before it touches any state.
pub fn validate_turn(turn: &Turn) -> Result<(), TournamentError> {
    if turn.score > MAX_TURN_SCORE {
        return Err(TournamentError::validation(format!(
            "turn score {} is outside 0..={}",
            turn.score, MAX_TURN_SCORE
        )));
    }
    if turn.darts.is_empty() {
        return Ok(());
    }
    if turn.darts.len() > DARTS_PER_TURN {
        return Err(TournamentError::validation(format!(
            "a turn has at most {} darts, got {}",
            DARTS_PER_TURN,
            turn.darts.len()
        )));
    }
    if let Some(dart) = turn.darts.iter().find(|&&d| d > MAX_DART_SCORE) {
        return Err(TournamentError::validation(format!(
            "dart score {} is outside 0..={}",
            dart, MAX_DART_SCORE
        )));
    }
    let total: u32 = turn.darts.iter().sum();
    if total != turn.score {
        return Err(TournamentError::validation(format!(
            "darts add up to {}, turn score is {}",
            total, turn.score
        )));
    }
    Ok(())
}

/// Player who throws first in the leg about to be created.
fn next_leg_starter(game: &GameMatch, players: [PlayerId; 2], rules: &MatchRules) -> PlayerId {
    let first = game.starting_player.unwrap_or(players[0]);
    match rules.leg_starter {
        LegStarter::MatchStarter => first,
        LegStarter::Alternate if game.legs_played() % 2 == 0 => first,
        LegStarter::Alternate => {
            if first == players[0] {
                players[1]
            } else {
                players[0]
            }
        }
    }
}

/// Apply one turn to a match. The input is untouched; the returned transition holds the new state.
pub fn apply_turn(
    game: &GameMatch,
    rules: &MatchRules,
    turn: &Turn,
    now: DateTime<Utc>,
) -> Result<Transition, TournamentError> {
    validate_turn(turn)?;
    if game.status != MatchStatus::Active {
        return Err(TournamentError::state(game.id, MatchStatus::Active, game.status));
    }
    let players = match game.players {
        [Some(one), Some(two)] => [one, two],
        _ => return Err(TournamentError::state(game.id, "both players assigned", "waiting for a player")),
    };
    let slot = game.slot_of(turn.player).ok_or_else(|| {
        TournamentError::validation(format!("player {} is not in match {}", turn.player, game.id))
    })?;
    let opponent = players[slot.other().index()];
    let idx = slot.index();

    let mut next = game.clone();
    let open_set = next.sets.iter().position(|s| s.status == PlayStatus::Active);
    let set_index = match open_set {
        Some(i) => i,
        None => {
            next.sets.push(GameSet::new(next.current_set));
            next.sets.len() - 1
        }
    };
    let open_leg = next.sets[set_index]
        .legs
        .iter()
        .position(|l| l.status == PlayStatus::Active);
    let leg_index = match open_leg {
        Some(i) => i,
        None => {
            let starter = next_leg_starter(&next, players, rules);
            let leg = Leg::new(next.current_leg, rules.starting_score, starter);
            next.sets[set_index].legs.push(leg);
            next.sets[set_index].legs.len() - 1
        }
    };

    let leg = &mut next.sets[set_index].legs[leg_index];
    let remaining = leg.remaining[idx];
    let darts = turn.darts.clone();

    match remaining.checked_sub(turn.score) {
        None | Some(1) => {
            leg.throws.push(Throw::bust(turn.player, remaining, darts, now));
            leg.current_player = opponent;
            return Ok(Transition {
                game: next,
                outcome: TurnOutcome::Bust { remaining },
                events: Vec::new(),
            });
        }
        Some(0) => {}
        Some(after) => {
            leg.throws.push(Throw::scored(turn.player, turn.score, after, darts, now));
            leg.remaining[idx] = after;
            leg.current_player = opponent;
            return Ok(Transition {
                game: next,
                outcome: TurnOutcome::Scored { remaining: after },
                events: Vec::new(),
            });
        }
    }

    // Checkout: close the leg and cascade.
    leg.throws.push(Throw::scored(turn.player, turn.score, 0, darts, now));
    leg.remaining[idx] = 0;
    leg.status = PlayStatus::Completed;
    leg.winner = Some(turn.player);
    let mut events = vec![MatchEvent::LegWon {
        leg: leg.id,
        winner: turn.player,
    }];

    let set = &mut next.sets[set_index];
    set.legs_won[idx] += 1;
    if set.legs_won[idx] < rules.legs_to_win {
        next.current_leg += 1;
        return Ok(Transition {
            game: next,
            outcome: TurnOutcome::LegWon,
            events,
        });
    }

    set.status = PlayStatus::Completed;
    set.winner = Some(turn.player);
    events.push(MatchEvent::SetWon {
        set: set.id,
        winner: turn.player,
    });
    next.sets_won[idx] += 1;
    next.current_set += 1;
    next.current_leg = 1;
    if next.sets_won[idx] < rules.sets_to_win {
        return Ok(Transition {
            game: next,
            outcome: TurnOutcome::SetWon,
            events,
        });
    }

    next.status = MatchStatus::Completed;
    next.winner = Some(turn.player);
    next.loser = Some(opponent);
    events.push(MatchEvent::MatchWon {
        game: next.id,
        winner: turn.player,
        loser: opponent,
    });
    Ok(Transition {
        game: next,
        outcome: TurnOutcome::MatchWon,
        events,
    })
}

/// Record a turn against a match and, when it wins the match, route the players onward.
pub fn record_turn(tournament: &mut Tournament, match_id: MatchId, turn: Turn) -> Result<TurnOutcome, TournamentError> {
    let rules = MatchRules::of(tournament);
    let index = tournament.match_index(match_id)?;
    let transition = apply_turn(&tournament.matches[index], &rules, &turn, Utc::now())?;
    log::debug!(
        "Match {}: player {} scored {} -> {:?}",
        match_id,
        turn.player,
        turn.score,
        transition.outcome
    );
    tournament.matches[index] = transition.game;

    for event in &transition.events {
        if let MatchEvent::MatchWon { game, winner, .. } = *event {
            log::info!("Match {} won by {}", game, winner);
            complete_match_progression(tournament, game)?;
        }
    }
    Ok(transition.outcome)
}

/// Choose who throws first in this match's legs. Allowed until the match is completed.
pub fn set_starting_player(
    tournament: &mut Tournament,
    match_id: MatchId,
    player: PlayerId,
) -> Result<(), TournamentError> {
    let index = tournament.match_index(match_id)?;
    let game = &mut tournament.matches[index];
    if game.status == MatchStatus::Completed {
        return Err(TournamentError::state(game.id, "pending or active", game.status));
    }
    if game.slot_of(player).is_none() {
        return Err(TournamentError::validation(format!(
            "player {} is not in match {}",
            player, match_id
        )));
    }
    game.starting_player = Some(player);
    Ok(())
}

/// Slot whose turn it is in the match's open leg.
pub fn player_to_throw(game: &GameMatch) -> Option<Slot> {
    game.active_leg().and_then(|leg| game.slot_of(leg.current_player))
}
