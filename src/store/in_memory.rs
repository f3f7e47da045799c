//! InMemoryRatingStore - table-shaped storage for tests and embedding.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{RatingStore, StoreError};
use crate::domain::{EventType, Performance, Player, ScoreEntry, Tournament, TournamentPlayer};

/// A player's registration in one tournament (`tournament_player` table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentEntry {
    pub tournament_id: i64,
    pub tournament_player_id: i64,
    pub usab_id: i64,
    pub player_name: String,
}

/// One raw result (`tournament_player_performance` table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRow {
    pub tournament_id: i64,
    pub tournament_player_id: i64,
    pub age_group: String,
    pub event_type: String,
    pub standing_level: String,
}

#[derive(Default)]
struct Tables {
    scores: Vec<ScoreEntry>,
    players: Vec<Player>,
    tournaments: Vec<Tournament>,
    entries: Vec<TournamentEntry>,
    performances: Vec<PerformanceRow>,
}

impl Tables {
    fn entry(&self, tournament_id: i64, tournament_player_id: i64) -> Option<&TournamentEntry> {
        self.entries.iter().find(|e| {
            e.tournament_id == tournament_id && e.tournament_player_id == tournament_player_id
        })
    }

    fn tournament(&self, tournament_id: i64) -> Option<&Tournament> {
        self.tournaments
            .iter()
            .find(|t| t.tournament_id == tournament_id)
    }

    fn is_registered(&self, usab_id: i64) -> bool {
        self.players.iter().any(|p| p.usab_id == usab_id)
    }

    /// Inner join of a result row with its entry and tournament.
    fn join(&self, row: &PerformanceRow) -> Option<Performance> {
        let entry = self.entry(row.tournament_id, row.tournament_player_id)?;
        let tournament = self.tournament(row.tournament_id)?;
        Some(Performance {
            tournament_id: row.tournament_id,
            tournament_player_id: row.tournament_player_id,
            tournament_name: tournament.tournament_name.clone(),
            tournament_description: tournament.description.clone(),
            tournament_type: tournament.tournament_type.clone(),
            end_date: tournament.end_date.clone(),
            event_type: row.event_type.clone(),
            age_group: row.age_group.clone(),
            standing_level: row.standing_level.clone(),
            usab_id: entry.usab_id,
            player_name: entry.player_name.clone(),
        })
    }

    fn joined_where(&self, keep: impl Fn(&PerformanceRow, &Performance) -> bool) -> Vec<Performance> {
        self.performances
            .iter()
            .filter_map(|row| self.join(row).filter(|joined| keep(row, joined)))
            .collect()
    }
}

/// In-memory store holding the five source tables.
///
/// Clone-friendly via Arc. Counts queries so callers can observe how often
/// the cache falls through to storage.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    tables: Arc<RwLock<Tables>>,
    queries: Arc<AtomicU64>,
}

impl InMemoryRatingStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queries served so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    fn read<T>(&self, query: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(query(&tables))
    }

    fn write(&self, change: impl FnOnce(&mut Tables)) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        change(&mut tables);
        Ok(())
    }

    /// Load a score entry. Stands in for the external loader.
    pub fn insert_score(&self, entry: ScoreEntry) -> Result<(), StoreError> {
        self.write(|t| t.scores.push(entry))
    }

    pub fn insert_player(&self, player: Player) -> Result<(), StoreError> {
        self.write(|t| t.players.push(player))
    }

    pub fn insert_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.write(|t| t.tournaments.push(tournament))
    }

    pub fn insert_entry(&self, entry: TournamentEntry) -> Result<(), StoreError> {
        self.write(|t| t.entries.push(entry))
    }

    pub fn insert_performance(&self, row: PerformanceRow) -> Result<(), StoreError> {
        self.write(|t| t.performances.push(row))
    }
}

impl RatingStore for InMemoryRatingStore {
    fn list_score_entries(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.read(|t| t.scores.clone())
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.read(|t| t.players.clone())
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        self.read(|t| t.tournaments.clone())
    }

    fn list_tournament_players(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlayer>, StoreError> {
        self.read(|t| {
            t.entries
                .iter()
                .filter(|e| e.tournament_id == tournament_id)
                .map(|e| TournamentPlayer {
                    tournament_player_id: e.tournament_player_id,
                    usab_id: e.usab_id,
                    player_name: e.player_name.clone(),
                })
                .collect()
        })
    }

    fn list_performances_by_player(&self, usab_id: i64) -> Result<Vec<Performance>, StoreError> {
        self.read(|t| t.joined_where(|_, joined| joined.usab_id == usab_id))
    }

    fn list_performances_by_tournament(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<Performance>, StoreError> {
        self.read(|t| {
            t.joined_where(|row, joined| {
                row.tournament_id == tournament_id && t.is_registered(joined.usab_id)
            })
        })
    }

    fn list_performances_by_event(
        &self,
        event_type: EventType,
    ) -> Result<Vec<Performance>, StoreError> {
        self.read(|t| t.joined_where(|row, _| event_type.matches(&row.event_type)))
    }
}
