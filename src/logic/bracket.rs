//! Bracket topology: the static routing graph a tournament is instantiated from.
//!
//! Double elimination is a fixed 14-match graph for 8 seeds. Single elimination pairs
//! seeds sequentially and routes winners forward while rounds halve evenly.

use crate::models::{BracketKind, Slot, TournamentError, TournamentFormat};
use serde::{Deserialize, Serialize};

/// Players a double-elimination bracket is built for.
pub const DOUBLE_ELIMINATION_PLAYERS: usize = 8;

/// Round-1 winners pairings by seed, in bracket position order.
const ROUND_ONE_SEEDS: [[u32; 2]; 4] = [[1, 8], [4, 5], [2, 7], [3, 6]];

/// Bracket coordinates; unique per node.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct NodeKey {
    pub bracket: BracketKind,
    pub round: u32,
    pub position: u32,
}

impl NodeKey {
    pub fn winners(round: u32, position: u32) -> Self {
        Self {
            bracket: BracketKind::Winners,
            round,
            position,
        }
    }

    pub fn losers(round: u32, position: u32) -> Self {
        Self {
            bracket: BracketKind::Losers,
            round,
            position,
        }
    }

    pub fn grand_final() -> Self {
        Self {
            bracket: BracketKind::GrandFinal,
            round: 1,
            position: 1,
        }
    }
}

/// A routing edge: the node and slot a player moves to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: NodeKey,
    pub slot: Slot,
}

fn edge(target: NodeKey, slot: Slot) -> Option<Edge> {
    Some(Edge { target, slot })
}

/// A match in the topology, before any players are attached.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MatchNode {
    pub key: NodeKey,
    pub label: String,
    /// Seeds placed in slot 1 / slot 2 at instantiation (round-1 matches only).
    pub seeds: Option<[u32; 2]>,
    pub winner_edge: Option<Edge>,
    pub loser_edge: Option<Edge>,
}

impl MatchNode {
    fn new(key: NodeKey, winner_edge: Option<Edge>, loser_edge: Option<Edge>) -> Self {
        let label = match key.bracket {
            BracketKind::GrandFinal => "Grand Final".to_string(),
            bracket => match winner_edge {
                Some(e) if e.target.bracket == BracketKind::GrandFinal => format!("{} Final", bracket),
                _ => format!("{} R{} M{}", bracket, key.round, key.position),
            },
        };
        Self {
            key,
            label,
            seeds: None,
            winner_edge,
            loser_edge,
        }
    }

    fn seeded(mut self, seeds: [u32; 2]) -> Self {
        self.seeds = Some(seeds);
        self
    }
}

/// The 8-player double-elimination graph: winners rounds 1-3, losers rounds 1-4, grand final.
///
/// Pure and deterministic; two calls always compare equal.
pub fn generate_bracket() -> Vec<MatchNode> {
    use NodeKey as K;
    use Slot::{One, Two};

    let mut nodes = Vec::with_capacity(14);

    // Winners round 1: pairs feed winners R2 and drop into losers R1 side by side.
    for (i, seeds) in ROUND_ONE_SEEDS.into_iter().enumerate() {
        let position = i as u32 + 1;
        let next = (position + 1) / 2;
        let slot = if position % 2 == 1 { One } else { Two };
        nodes.push(
            MatchNode::new(
                K::winners(1, position),
                edge(K::winners(2, next), slot),
                edge(K::losers(1, next), slot),
            )
            .seeded(seeds),
        );
    }

    nodes.push(MatchNode::new(K::winners(2, 1), edge(K::winners(3, 1), One), edge(K::losers(2, 1), Two)));
    nodes.push(MatchNode::new(K::winners(2, 2), edge(K::winners(3, 1), Two), edge(K::losers(2, 2), Two)));
    nodes.push(MatchNode::new(K::winners(3, 1), edge(K::grand_final(), One), edge(K::losers(4, 1), Two)));

    nodes.push(MatchNode::new(K::losers(1, 1), edge(K::losers(2, 1), One), None));
    nodes.push(MatchNode::new(K::losers(1, 2), edge(K::losers(2, 2), One), None));
    nodes.push(MatchNode::new(K::losers(2, 1), edge(K::losers(3, 1), One), None));
    nodes.push(MatchNode::new(K::losers(2, 2), edge(K::losers(3, 1), Two), None));
    nodes.push(MatchNode::new(K::losers(3, 1), edge(K::losers(4, 1), One), None));
    nodes.push(MatchNode::new(K::losers(4, 1), edge(K::grand_final(), Two), None));

    nodes.push(MatchNode::new(K::grand_final(), None, None));

    nodes
}

/// Sequential single elimination for an even field: 1v2, 3v4, ...
///
/// Later rounds are generated only while the previous round has an even number of matches;
/// a round with an odd count is the last routed round.
pub fn generate_single_elimination(player_count: usize) -> Result<Vec<MatchNode>, TournamentError> {
    if player_count < 2 || player_count % 2 != 0 {
        return Err(TournamentError::validation(format!(
            "single elimination needs an even number of at least 2 players, got {}",
            player_count
        )));
    }

    let mut nodes = Vec::new();
    let mut round = 1;
    let mut matches_in_round = (player_count / 2) as u32;
    loop {
        let routed = matches_in_round % 2 == 0;
        for position in 1..=matches_in_round {
            let slot = if position % 2 == 1 { Slot::One } else { Slot::Two };
            let winner_edge = routed
                .then(|| Edge {
                    target: NodeKey::winners(round + 1, (position + 1) / 2),
                    slot,
                });
            let mut node = MatchNode::new(NodeKey::winners(round, position), winner_edge, None);
            if matches_in_round == 1 {
                node.label = "Final".to_string();
            }
            if round == 1 {
                node = node.seeded([2 * position - 1, 2 * position]);
            }
            nodes.push(node);
        }
        if !routed {
            break;
        }
        matches_in_round /= 2;
        round += 1;
    }
    Ok(nodes)
}

/// Topology for a tournament format and field size.
pub fn generate_for(format: TournamentFormat, player_count: usize) -> Result<Vec<MatchNode>, TournamentError> {
    match format {
        TournamentFormat::DoubleElimination => {
            if player_count != DOUBLE_ELIMINATION_PLAYERS {
                return Err(TournamentError::validation(format!(
                    "double elimination requires exactly {} players, got {}",
                    DOUBLE_ELIMINATION_PLAYERS, player_count
                )));
            }
            Ok(generate_bracket())
        }
        TournamentFormat::SingleElimination => generate_single_elimination(player_count),
    }
}
