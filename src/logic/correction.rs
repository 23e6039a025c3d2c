//! Correction log: take back the most recent turn of an open leg.
//!
//! Only turns in a leg that is still being played can be undone. A checkout closes its leg,
//! so undoing it is refused rather than reopening the leg, set, or match.

use crate::models::{
    Entity, LegId, MatchStatus, PlayStatus, Throw, ThrowId, Tournament, TournamentError,
};

/// Remove the leg's most recent throw, give its score back to the thrower, and hand the turn
/// back to them. Returns the removed throw.
pub fn undo_last_throw(tournament: &mut Tournament, leg_id: LegId) -> Result<Throw, TournamentError> {
    let (mi, si, li) = tournament
        .locate_leg(leg_id)
        .ok_or(TournamentError::not_found(Entity::Leg, leg_id))?;
    let game = &mut tournament.matches[mi];
    if game.status != MatchStatus::Active {
        return Err(TournamentError::state(game.id, MatchStatus::Active, game.status));
    }
    let players = game.players;
    let leg = &mut game.sets[si].legs[li];
    if leg.status != PlayStatus::Active {
        return Err(TournamentError::state(leg_id, PlayStatus::Active, leg.status));
    }
    let last = leg
        .throws
        .last()
        .ok_or_else(|| TournamentError::state(leg_id, "at least one throw", "no throws"))?;
    let slot = players
        .iter()
        .position(|p| *p == Some(last.player))
        .ok_or_else(|| TournamentError::state(last.id, "thrown by a seated player", "unknown thrower"))?;

    let throw = leg.throws.pop().ok_or_else(|| TournamentError::state(leg_id, "at least one throw", "no throws"))?;
    leg.remaining[slot] += throw.score;
    leg.current_player = throw.player;
    log::debug!(
        "Undid throw {} in leg {}: {} gets {} back",
        throw.id,
        leg_id,
        throw.player,
        throw.score
    );
    Ok(throw)
}

/// Undo a throw by id. Only the most recent throw of its leg qualifies.
pub fn undo_throw(tournament: &mut Tournament, throw_id: ThrowId) -> Result<Throw, TournamentError> {
    let (leg_id, position) = tournament
        .locate_throw(throw_id)
        .ok_or(TournamentError::not_found(Entity::Throw, throw_id))?;
    let (mi, si, li) = tournament
        .locate_leg(leg_id)
        .ok_or(TournamentError::not_found(Entity::Leg, leg_id))?;
    let thrown = tournament.matches[mi].sets[si].legs[li].throws.len();
    if position + 1 != thrown {
        return Err(TournamentError::state(throw_id, "the most recent throw", "an earlier throw"));
    }
    undo_last_throw(tournament, leg_id)
}
