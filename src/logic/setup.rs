//! Setup phase: start the tournament by instantiating its bracket (Setup -> Active).

use crate::logic::bracket::{generate_for, Edge, MatchNode, NodeKey};
use crate::models::{
    GameMatch, MatchId, MatchStatus, Route, Tournament, TournamentError, TournamentStatus,
};
use std::collections::HashMap;

/// Materialize topology nodes as live matches: route edges become match ids, round-1 slots
/// are filled by seed, and the first seeded match takes the board.
pub fn instantiate_bracket(tournament: &mut Tournament, nodes: &[MatchNode]) -> Result<(), TournamentError> {
    let seeded = tournament.seeded_players();
    let ids: HashMap<NodeKey, MatchId> = nodes
        .iter()
        .map(|n| (n.key, uuid::Uuid::new_v4()))
        .collect();
    let route = |e: &Edge| -> Result<Route, TournamentError> {
        let target = ids.get(&e.target).copied().ok_or_else(|| {
            TournamentError::validation(format!("edge to unknown node {:?}", e.target))
        })?;
        Ok(Route { target, slot: e.slot })
    };

    let mut matches = Vec::with_capacity(nodes.len());
    for node in nodes {
        let mut game = GameMatch::new(node.key.bracket, node.key.round, node.key.position, node.label.clone());
        game.id = ids[&node.key];
        game.winner_route = node.winner_edge.as_ref().map(&route).transpose()?;
        game.loser_route = node.loser_edge.as_ref().map(&route).transpose()?;
        if let Some(seeds) = node.seeds {
            for (slot, seed) in seeds.into_iter().enumerate() {
                let player = (seed as usize)
                    .checked_sub(1)
                    .and_then(|i| seeded.get(i))
                    .ok_or_else(|| TournamentError::validation(format!("no player with seed {}", seed)))?;
                game.players[slot] = Some(player.id);
            }
        }
        matches.push(game);
    }

    let first = matches
        .iter_mut()
        .find(|m| m.is_ready())
        .ok_or_else(|| TournamentError::validation("bracket has no seeded match"))?;
    first.status = MatchStatus::Active;
    let first_id = first.id;

    tournament.matches = matches;
    tournament.active_match = Some(first_id);
    Ok(())
}

/// Start the tournament: build the format's topology for the seeded field and put it in play.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::state(tournament.id, TournamentStatus::Setup, tournament.status));
    }
    let nodes = generate_for(tournament.format, tournament.players.len())?;
    instantiate_bracket(tournament, &nodes)?;
    tournament.status = TournamentStatus::Active;
    log::info!(
        "Tournament {} ({}) started with {} players and {} matches",
        tournament.name,
        tournament.id,
        tournament.players.len(),
        tournament.matches.len()
    );
    Ok(())
}

/// The instantiated match at a bracket position.
pub fn match_at(tournament: &Tournament, key: NodeKey) -> Option<&GameMatch> {
    tournament
        .matches
        .iter()
        .find(|m| m.bracket == key.bracket && m.round == key.round && m.position == key.position)
}
