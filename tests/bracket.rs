//! Bracket topology: the fixed double-elimination graph and sequential single elimination.

use dart_bracket::{
    generate_bracket, generate_for, generate_single_elimination, BracketKind, MatchNode, NodeKey,
    Slot, TournamentError, TournamentFormat,
};
use std::collections::HashMap;

fn node(nodes: &[MatchNode], key: NodeKey) -> &MatchNode {
    nodes.iter().find(|n| n.key == key).unwrap()
}

#[test]
fn double_elimination_has_fourteen_nodes() {
    let nodes = generate_bracket();
    assert_eq!(nodes.len(), 14);
    let count = |b: BracketKind| nodes.iter().filter(|n| n.key.bracket == b).count();
    assert_eq!(count(BracketKind::Winners), 7);
    assert_eq!(count(BracketKind::Losers), 6);
    assert_eq!(count(BracketKind::GrandFinal), 1);
}

#[test]
fn round_one_seeding_is_standard() {
    let nodes = generate_bracket();
    let seeds: Vec<[u32; 2]> = (1..=4)
        .map(|p| node(&nodes, NodeKey::winners(1, p)).seeds.unwrap())
        .collect();
    assert_eq!(seeds, vec![[1, 8], [4, 5], [2, 7], [3, 6]]);
    assert!(nodes
        .iter()
        .filter(|n| !(n.key.bracket == BracketKind::Winners && n.key.round == 1))
        .all(|n| n.seeds.is_none()));
}

#[test]
fn edges_per_bracket() {
    let nodes = generate_bracket();
    for n in &nodes {
        match n.key.bracket {
            BracketKind::Winners => {
                assert!(n.winner_edge.is_some(), "{:?}", n.key);
                assert!(n.loser_edge.is_some(), "{:?}", n.key);
            }
            BracketKind::Losers => {
                assert!(n.winner_edge.is_some(), "{:?}", n.key);
                assert!(n.loser_edge.is_none(), "{:?}", n.key);
            }
            BracketKind::GrandFinal => {
                assert!(n.winner_edge.is_none());
                assert!(n.loser_edge.is_none());
            }
        }
    }
}

#[test]
fn every_unseeded_slot_is_fed_exactly_once() {
    let nodes = generate_bracket();
    let mut fed: HashMap<(NodeKey, Slot), usize> = HashMap::new();
    for e in nodes.iter().flat_map(|n| n.winner_edge.iter().chain(n.loser_edge.iter())) {
        assert!(nodes.iter().any(|n| n.key == e.target), "dangling edge to {:?}", e.target);
        *fed.entry((e.target, e.slot)).or_default() += 1;
    }
    for n in nodes.iter().filter(|n| n.seeds.is_none()) {
        for slot in Slot::BOTH {
            assert_eq!(fed.get(&(n.key, slot)), Some(&1), "{:?} {:?}", n.key, slot);
        }
    }
}

#[test]
fn routing_table_matches_bracket() {
    let nodes = generate_bracket();
    let winner = |k| node(&nodes, k).winner_edge.map(|e| (e.target, e.slot));
    let loser = |k| node(&nodes, k).loser_edge.map(|e| (e.target, e.slot));

    assert_eq!(winner(NodeKey::winners(1, 1)), Some((NodeKey::winners(2, 1), Slot::One)));
    assert_eq!(loser(NodeKey::winners(1, 2)), Some((NodeKey::losers(1, 1), Slot::Two)));
    assert_eq!(winner(NodeKey::winners(1, 3)), Some((NodeKey::winners(2, 2), Slot::One)));
    assert_eq!(loser(NodeKey::winners(2, 1)), Some((NodeKey::losers(2, 1), Slot::Two)));
    assert_eq!(loser(NodeKey::winners(2, 2)), Some((NodeKey::losers(2, 2), Slot::Two)));
    assert_eq!(winner(NodeKey::winners(3, 1)), Some((NodeKey::grand_final(), Slot::One)));
    assert_eq!(loser(NodeKey::winners(3, 1)), Some((NodeKey::losers(4, 1), Slot::Two)));
    assert_eq!(winner(NodeKey::losers(1, 2)), Some((NodeKey::losers(2, 2), Slot::One)));
    assert_eq!(winner(NodeKey::losers(2, 2)), Some((NodeKey::losers(3, 1), Slot::Two)));
    assert_eq!(winner(NodeKey::losers(3, 1)), Some((NodeKey::losers(4, 1), Slot::One)));
    assert_eq!(winner(NodeKey::losers(4, 1)), Some((NodeKey::grand_final(), Slot::Two)));
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(generate_bracket(), generate_bracket());
}

#[test]
fn labels() {
    let nodes = generate_bracket();
    assert_eq!(node(&nodes, NodeKey::winners(1, 2)).label, "Winners R1 M2");
    assert_eq!(node(&nodes, NodeKey::winners(3, 1)).label, "Winners Final");
    assert_eq!(node(&nodes, NodeKey::losers(2, 1)).label, "Losers R2 M1");
    assert_eq!(node(&nodes, NodeKey::losers(4, 1)).label, "Losers Final");
    assert_eq!(node(&nodes, NodeKey::grand_final()).label, "Grand Final");
}

#[test]
fn double_elimination_needs_eight_players() {
    assert!(matches!(
        generate_for(TournamentFormat::DoubleElimination, 7),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(generate_for(TournamentFormat::DoubleElimination, 8).unwrap(), generate_bracket());
}

#[test]
fn single_elimination_pairs_sequentially_and_halves() {
    let nodes = generate_single_elimination(8).unwrap();
    assert_eq!(nodes.len(), 7);
    let seeds: Vec<_> = nodes.iter().filter_map(|n| n.seeds).collect();
    assert_eq!(seeds, vec![[1, 2], [3, 4], [5, 6], [7, 8]]);

    let r1m3 = node(&nodes, NodeKey::winners(1, 3));
    assert_eq!(r1m3.winner_edge.map(|e| (e.target, e.slot)), Some((NodeKey::winners(2, 2), Slot::One)));
    let r2m2 = node(&nodes, NodeKey::winners(2, 2));
    assert_eq!(r2m2.winner_edge.map(|e| (e.target, e.slot)), Some((NodeKey::winners(3, 1), Slot::Two)));

    let last = node(&nodes, NodeKey::winners(3, 1));
    assert!(last.winner_edge.is_none());
    assert_eq!(last.label, "Final");
    assert!(nodes.iter().all(|n| n.loser_edge.is_none()));
}

#[test]
fn single_elimination_stops_routing_at_odd_round() {
    let nodes = generate_single_elimination(6).unwrap();
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|n| n.winner_edge.is_none()));
}

#[test]
fn single_elimination_rejects_odd_fields() {
    for n in [0, 1, 5] {
        assert!(matches!(
            generate_single_elimination(n),
            Err(TournamentError::Validation(_))
        ));
    }
}
