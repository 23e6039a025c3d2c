//! Bracket progression: route a finished match's winner and loser onward and decide which
//! match takes the single board next.

use crate::models::{
    MatchId, MatchStatus, PlayerId, Route, Tournament, TournamentError, TournamentStatus,
};
use serde::Serialize;

/// What routing a completed match changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Progression {
    /// Matches that received a player, in routing order (winner first).
    pub advanced: Vec<MatchId>,
    /// Match put on the board as a result, if any.
    pub activated: Option<MatchId>,
    pub tournament_completed: bool,
}

/// Put a pending, fully seated match on the board. Fails with `Conflict` while another match
/// is being played.
pub fn activate_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let index = tournament.match_index(match_id)?;
    let game = &tournament.matches[index];
    if game.status != MatchStatus::Pending {
        return Err(TournamentError::state(match_id, MatchStatus::Pending, game.status));
    }
    if !game.is_ready() {
        return Err(TournamentError::state(match_id, "both players assigned", "waiting for a player"));
    }
    if let Some(active) = tournament.board_holder() {
        return Err(TournamentError::Conflict {
            requested: match_id,
            active,
        });
    }
    tournament.active_match = Some(match_id);
    tournament.matches[index].status = MatchStatus::Active;
    log::info!("Match {} ({}) is now on the board", tournament.matches[index].label, match_id);
    Ok(())
}

/// Route a completed match's players onward. Runs exactly once per match; a second call is
/// reported as a state error and changes nothing.
pub fn complete_match_progression(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Progression, TournamentError> {
    let index = tournament.match_index(match_id)?;
    let game = &tournament.matches[index];
    if game.status != MatchStatus::Completed {
        return Err(TournamentError::state(match_id, MatchStatus::Completed, game.status));
    }
    if game.progressed {
        return Err(TournamentError::state(match_id, "awaiting progression", "already progressed"));
    }
    let winner = game
        .winner
        .ok_or_else(|| TournamentError::state(match_id, "a winner", "no winner"))?;
    let loser = game
        .slot_of(winner)
        .and_then(|slot| game.player(slot.other()))
        .ok_or_else(|| TournamentError::state(match_id, "two seated players", "winner without opponent"))?;

    let routes: Vec<(PlayerId, Route)> = [(winner, game.winner_route), (loser, game.loser_route)]
        .into_iter()
        .filter_map(|(player, route)| route.map(|r| (player, r)))
        .collect();

    // Check every target before writing anything.
    for (player, route) in &routes {
        let target = tournament.get_match(route.target)?;
        match target.player(route.slot) {
            Some(seated) if seated != *player => {
                return Err(TournamentError::state(
                    route.target,
                    format!("{:?} free", route.slot),
                    format!("{:?} taken by {}", route.slot, seated),
                ));
            }
            _ => {}
        }
    }

    let game = &mut tournament.matches[index];
    game.loser = Some(loser);
    game.progressed = true;
    if tournament.active_match == Some(match_id) {
        tournament.active_match = None;
    }

    let mut progression = Progression::default();
    for (player, route) in routes {
        let target = tournament.match_index(route.target)?;
        tournament.matches[target].players[route.slot.index()] = Some(player);
        progression.advanced.push(route.target);
    }

    for &target in &progression.advanced {
        let game = tournament.get_match(target)?;
        if game.status != MatchStatus::Pending || !game.is_ready() {
            continue;
        }
        match tournament.board_holder() {
            None => {
                activate_match(tournament, target)?;
                progression.activated = Some(target);
            }
            Some(active) => {
                log::warn!("Match {} is ready but waits for match {} to finish", target, active);
            }
        }
    }

    if !tournament.has_open_matches() {
        tournament.status = TournamentStatus::Completed;
        tournament.champion = Some(winner);
        progression.tournament_completed = true;
        log::info!("Tournament {} ({}) completed, champion {}", tournament.name, tournament.id, winner);
    }
    Ok(progression)
}

/// Enter a result without scoring it (walkover or retirement), then progress the bracket.
pub fn declare_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: PlayerId,
) -> Result<Progression, TournamentError> {
    let index = tournament.match_index(match_id)?;
    let game = &mut tournament.matches[index];
    if game.status == MatchStatus::Completed {
        return Err(TournamentError::state(match_id, "pending or active", game.status));
    }
    if !game.is_ready() {
        return Err(TournamentError::state(match_id, "both players assigned", "waiting for a player"));
    }
    let slot = game.slot_of(winner).ok_or_else(|| {
        TournamentError::validation(format!("player {} is not in match {}", winner, match_id))
    })?;
    game.status = MatchStatus::Completed;
    game.winner = Some(winner);
    game.loser = game.player(slot.other());
    log::info!("Match {} declared for {}", match_id, winner);
    complete_match_progression(tournament, match_id)
}
