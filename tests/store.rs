//! Store: tournament lifecycle, transactional commits, and serialized access under threads.

mod common;

use common::{config, names};
use dart_bracket::{
    read_roster, MatchId, PlayerId, TournamentConfig, TournamentError, TournamentFormat,
    TournamentId, TournamentStatus, TournamentStore, Turn, TurnOutcome,
};
use std::sync::Barrier;
use std::thread;
use uuid::Uuid;

fn started_store() -> (TournamentStore, TournamentId) {
    let store = TournamentStore::new();
    let t = store.create(config(TournamentFormat::DoubleElimination, 8, 3, 1)).unwrap();
    store.start_tournament(t.id).unwrap();
    (store, t.id)
}

fn board(store: &TournamentStore, id: TournamentId) -> (MatchId, PlayerId, PlayerId) {
    let t = store.get(id).unwrap();
    let m = t.get_match(t.active_match.unwrap()).unwrap();
    (m.id, m.players[0].unwrap(), m.players[1].unwrap())
}

#[test]
fn create_get_list_delete() {
    let store = TournamentStore::new();
    let first = store.create(TournamentConfig::new("Monday", TournamentFormat::DoubleElimination, names(8))).unwrap();
    let second = store.create(TournamentConfig::new("Friday", TournamentFormat::SingleElimination, names(4))).unwrap();
    assert_eq!(first.status, TournamentStatus::Setup);
    assert_eq!(store.get(first.id).unwrap().name, "Monday");

    let listed: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first.id) && listed.contains(&second.id));

    store.delete(first.id).unwrap();
    assert!(matches!(store.get(first.id), Err(TournamentError::NotFound { .. })));
    assert!(matches!(store.delete(first.id), Err(TournamentError::NotFound { .. })));
    assert_eq!(store.list().len(), 1);
}

#[test]
fn create_rejects_bad_config() {
    let store = TournamentStore::new();
    let mut config = TournamentConfig::new("  ", TournamentFormat::DoubleElimination, names(8));
    assert!(matches!(store.create(config.clone()), Err(TournamentError::Validation(_))));
    config.name = "Open".into();
    config.player_names[1] = "p1".into();
    assert!(matches!(store.create(config), Err(TournamentError::Validation(_))));
    assert!(store.list().is_empty());
}

#[test]
fn start_through_store() {
    let (store, id) = started_store();
    let t = store.get(id).unwrap();
    assert_eq!(t.status, TournamentStatus::Active);
    assert_eq!(t.matches.len(), 14);
    assert!(matches!(store.start_tournament(id), Err(TournamentError::State { .. })));
}

#[test]
fn failed_operation_commits_nothing() {
    let (store, id) = started_store();
    let before = store.get(id).unwrap();

    let result: Result<(), _> = store.transact(id, |t| {
        t.name = "renamed".into();
        t.active_match = None;
        Err(TournamentError::validation("rolled back"))
    });
    assert!(result.is_err());

    let after = store.get(id).unwrap();
    assert_eq!(after.name, before.name);
    assert_eq!(after.active_match, before.active_match);
}

#[test]
fn rejected_turn_leaves_match_unchanged() {
    let (store, id) = started_store();
    let (m, a, _) = board(&store, id);
    store.record_turn(m, Turn::new(a, 100)).unwrap();
    let before = store.get_match(m).unwrap();

    assert!(matches!(
        store.record_turn(m, Turn::new(a, 181)),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        store.record_turn(m, Turn::new(Uuid::new_v4(), 20)),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(store.get_match(m).unwrap(), before);
}

#[test]
fn unknown_ids_are_not_found() {
    let store = TournamentStore::new();
    let missing = Uuid::new_v4();
    assert!(matches!(store.get_match(missing), Err(TournamentError::NotFound { .. })));
    assert!(matches!(store.record_turn(missing, Turn::new(missing, 60)), Err(TournamentError::NotFound { .. })));
    assert!(matches!(store.activate_match(missing), Err(TournamentError::NotFound { .. })));
    assert!(matches!(store.undo_last_throw(missing), Err(TournamentError::NotFound { .. })));
    assert!(matches!(store.undo_throw(missing), Err(TournamentError::NotFound { .. })));
}

#[test]
fn concurrent_turns_are_all_recorded() {
    let (store, id) = started_store();
    let (m, a, _) = board(&store, id);

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..10 {
                    assert_eq!(store.record_turn(m, Turn::new(a, 0)).unwrap(), TurnOutcome::Scored { remaining: 501 });
                }
            });
        }
    });

    let game = store.get_match(m).unwrap();
    assert_eq!(game.active_leg().unwrap().throws.len(), 80);
}

#[test]
fn concurrent_activation_has_one_winner() {
    let (store, id) = started_store();
    let (m, a, _) = board(&store, id);
    store.declare_winner(m, a).unwrap();

    let t = store.get(id).unwrap();
    let contenders: Vec<MatchId> = t
        .matches
        .iter()
        .filter(|g| g.status == dart_bracket::MatchStatus::Pending && g.is_ready())
        .map(|g| g.id)
        .collect();
    assert_eq!(contenders.len(), 3);

    let barrier = Barrier::new(contenders.len());
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = contenders
            .iter()
            .map(|&c| {
                let (store, barrier) = (&store, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    store.activate_match(c)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(TournamentError::Conflict { .. })))
            .count(),
        2
    );
    let t = store.get(id).unwrap();
    let active: Vec<_> = t
        .matches
        .iter()
        .filter(|g| g.status == dart_bracket::MatchStatus::Active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(t.active_match, Some(active[0].id));
}

#[test]
fn undo_through_store() {
    let (store, id) = started_store();
    let (m, a, b) = board(&store, id);
    store.record_turn(m, Turn::new(a, 100)).unwrap();
    store.record_turn(m, Turn::new(b, 85)).unwrap();

    let leg = store.get_match(m).unwrap().active_leg().unwrap().clone();
    let undone = store.undo_throw(leg.throws[1].id).unwrap();
    assert_eq!(undone.score, 85);
    let undone = store.undo_last_throw(leg.id).unwrap();
    assert_eq!(undone.player, a);

    let open = store.get_match(m).unwrap().active_leg().unwrap().clone();
    assert_eq!(open.remaining, [501, 501]);
    assert!(open.throws.is_empty());
}

#[test]
fn starting_player_through_store() {
    let (store, id) = started_store();
    let (m, _, b) = board(&store, id);
    let game = store.set_starting_player(m, b).unwrap();
    assert_eq!(game.starting_player, Some(b));
}

#[test]
fn config_defaults_from_json() {
    let config: TournamentConfig =
        serde_json::from_str(r#"{ "name": "Club Night", "player_names": ["A", "B"] }"#).unwrap();
    assert_eq!(config.format, TournamentFormat::DoubleElimination);
    assert_eq!(config.sets_to_win, 1);
    assert_eq!(config.legs_to_win, 3);
    assert_eq!(config.starting_score, 501);
    assert_eq!(config, TournamentConfig::new("Club Night", TournamentFormat::DoubleElimination, vec!["A".into(), "B".into()]));

    let single: TournamentConfig = serde_json::from_str(
        r#"{ "name": "Cup", "format": "single-elimination", "legs_to_win": 2, "player_names": [] }"#,
    )
    .unwrap();
    assert_eq!(single.format, TournamentFormat::SingleElimination);
    assert_eq!(single.legs_to_win, 2);
}

#[test]
fn roster_import_feeds_seeding() {
    let csv = "name,seed\nHenk,8\nAnna,1\nBram,2\nCees,3\nDirk,4\nEvert,5\nFrits,6\nGijs,7\n";
    let roster = read_roster(csv.as_bytes()).unwrap();
    let store = TournamentStore::new();
    let t = store
        .create(TournamentConfig::new("Imported", TournamentFormat::DoubleElimination, roster))
        .unwrap();
    let t = store.start_tournament(t.id).unwrap();

    let seat = |name: &str| t.players.iter().find(|p| p.name == name).unwrap().clone();
    assert_eq!(seat("Anna").seed, 1);
    assert_eq!(seat("Henk").seed, 8);
    let (_, a, b) = board(&store, t.id);
    assert_eq!((a, b), (seat("Anna").id, seat("Henk").id));
}
