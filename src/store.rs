//! In-memory tournament store.
//!
//! Every tournament sits behind its own mutex, so operations on one tournament are serialized
//! (this is what keeps the single-board rule race free) while different tournaments proceed in
//! parallel. Each operation runs against a working copy that replaces the stored tournament only
//! when the operation succeeds.

use crate::logic::{self, Progression, Turn, TurnOutcome};
use crate::models::{
    Entity, GameMatch, LegId, MatchId, PlayerId, Throw, ThrowId, Tournament, TournamentConfig,
    TournamentError, TournamentId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type Entry = Arc<Mutex<Tournament>>;

#[derive(Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Entry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tournament in Setup from its configuration.
    pub fn create(&self, config: TournamentConfig) -> Result<Tournament, TournamentError> {
        let tournament = Tournament::from_config(config)?;
        self.insert(tournament.clone());
        log::info!("Created tournament {} ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    pub fn insert(&self, tournament: Tournament) {
        self.tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tournament.id, Arc::new(Mutex::new(tournament)));
    }

    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self.entry(id)?;
        let guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    /// All tournaments, newest first.
    pub fn list(&self) -> Vec<Tournament> {
        let mut all: Vec<Tournament> = self
            .entries()
            .iter()
            .map(|entry| entry.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn delete(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::not_found(Entity::Tournament, id))
    }

    /// Run `f` as one transaction on a tournament: under its lock, against a working copy that is
    /// committed only if `f` returns `Ok`.
    pub fn transact<R>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<R, TournamentError>,
    ) -> Result<R, TournamentError> {
        let entry = self.entry(id)?;
        // Commits swap the whole value, so a poisoned guard still holds a consistent tournament.
        let mut guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draft = guard.clone();
        let result = f(&mut draft)?;
        *guard = draft;
        Ok(result)
    }

    pub fn start_tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.transact(id, |t| {
            logic::start_tournament(t)?;
            Ok(t.clone())
        })
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<GameMatch, TournamentError> {
        let id = self.owner_of_match(match_id)?;
        let entry = self.entry(id)?;
        let guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let game = guard.get_match(match_id)?.clone();
        Ok(game)
    }

    pub fn record_turn(&self, match_id: MatchId, turn: Turn) -> Result<TurnOutcome, TournamentError> {
        let id = self.owner_of_match(match_id)?;
        self.transact(id, |t| logic::record_turn(t, match_id, turn))
    }

    pub fn complete_match_progression(&self, match_id: MatchId) -> Result<Progression, TournamentError> {
        let id = self.owner_of_match(match_id)?;
        self.transact(id, |t| logic::complete_match_progression(t, match_id))
    }

    pub fn declare_winner(&self, match_id: MatchId, winner: PlayerId) -> Result<Progression, TournamentError> {
        let id = self.owner_of_match(match_id)?;
        self.transact(id, |t| logic::declare_winner(t, match_id, winner))
    }

    pub fn activate_match(&self, match_id: MatchId) -> Result<(), TournamentError> {
        let id = self.owner_of_match(match_id)?;
        self.transact(id, |t| logic::activate_match(t, match_id))
    }

    pub fn set_starting_player(&self, match_id: MatchId, player: PlayerId) -> Result<GameMatch, TournamentError> {
        let id = self.owner_of_match(match_id)?;
        self.transact(id, |t| {
            logic::set_starting_player(t, match_id, player)?;
            t.get_match(match_id).cloned()
        })
    }

    pub fn undo_last_throw(&self, leg_id: LegId) -> Result<Throw, TournamentError> {
        let id = self
            .find(|t| t.locate_leg(leg_id).is_some())
            .ok_or(TournamentError::not_found(Entity::Leg, leg_id))?;
        self.transact(id, |t| logic::undo_last_throw(t, leg_id))
    }

    pub fn undo_throw(&self, throw_id: ThrowId) -> Result<Throw, TournamentError> {
        let id = self
            .find(|t| t.locate_throw(throw_id).is_some())
            .ok_or(TournamentError::not_found(Entity::Throw, throw_id))?;
        self.transact(id, |t| logic::undo_throw(t, throw_id))
    }

    fn entry(&self, id: TournamentId) -> Result<Entry, TournamentError> {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(TournamentError::not_found(Entity::Tournament, id))
    }

    fn entries(&self) -> Vec<Entry> {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// First tournament matching `pred`. Locks one tournament at a time.
    fn find(&self, pred: impl Fn(&Tournament) -> bool) -> Option<TournamentId> {
        self.entries().into_iter().find_map(|entry| {
            let guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
            pred(&*guard).then_some(guard.id)
        })
    }

    fn owner_of_match(&self, match_id: MatchId) -> Result<TournamentId, TournamentError> {
        self.find(|t| t.has_match(match_id))
            .ok_or(TournamentError::not_found(Entity::Match, match_id))
    }
}
