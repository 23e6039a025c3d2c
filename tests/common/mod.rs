//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use dart_bracket::{
    match_at, record_turn, start_tournament, MatchId, NodeKey, PlayerId, Tournament,
    TournamentConfig, TournamentFormat, Turn, TurnOutcome,
};

pub fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("P{i}")).collect()
}

pub fn config(format: TournamentFormat, players: usize, legs_to_win: u32, sets_to_win: u32) -> TournamentConfig {
    let mut config = TournamentConfig::new("Club Open", format, names(players));
    config.legs_to_win = legs_to_win;
    config.sets_to_win = sets_to_win;
    config
}

/// An 8-player double-elimination tournament, already started.
pub fn started(legs_to_win: u32, sets_to_win: u32) -> Tournament {
    started_from(config(TournamentFormat::DoubleElimination, 8, legs_to_win, sets_to_win))
}

pub fn started_from(config: TournamentConfig) -> Tournament {
    let mut t = Tournament::from_config(config).unwrap();
    start_tournament(&mut t).unwrap();
    t
}

pub fn seed(t: &Tournament, seed: u32) -> PlayerId {
    t.players.iter().find(|p| p.seed == seed).unwrap().id
}

pub fn id_at(t: &Tournament, key: NodeKey) -> MatchId {
    match_at(t, key).unwrap().id
}

/// The match on the board and its slot-1 / slot-2 players.
pub fn board(t: &Tournament) -> (MatchId, PlayerId, PlayerId) {
    let id = t.active_match.unwrap();
    let game = t.get_match(id).unwrap();
    (id, game.players[0].unwrap(), game.players[1].unwrap())
}

pub fn throw(t: &mut Tournament, m: MatchId, player: PlayerId, score: u32) -> TurnOutcome {
    record_turn(t, m, Turn::new(player, score)).unwrap()
}

/// 180, 180, 141 for the winner with zero turns from the loser in between (501 start).
pub fn win_leg(t: &mut Tournament, m: MatchId, winner: PlayerId, loser: PlayerId) -> TurnOutcome {
    throw(t, m, winner, 180);
    throw(t, m, loser, 0);
    throw(t, m, winner, 180);
    throw(t, m, loser, 0);
    throw(t, m, winner, 141)
}

/// Take the player from 501 down to 40 (180, 180, 101) with zero turns from the opponent.
pub fn leave_on_40(t: &mut Tournament, m: MatchId, player: PlayerId, opponent: PlayerId) {
    throw(t, m, player, 180);
    throw(t, m, opponent, 0);
    throw(t, m, player, 180);
    throw(t, m, opponent, 0);
    assert_eq!(throw(t, m, player, 101), TurnOutcome::Scored { remaining: 40 });
    throw(t, m, opponent, 0);
}
