//! Storage collaborator - read-only access to externally populated rating data.
//!
//! The rating core never writes through this trait. Implementations return
//! rows in storage order; sorting and filtering belong to the core.

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::fmt;

use crate::domain::{EventType, Performance, Player, ScoreEntry, Tournament, TournamentPlayer};

/// Error type for storage queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    /// The backend failed to open or run a query.
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Query(msg) => write!(f, "store query failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read-only queries the rating core needs from storage.
pub trait RatingStore: Send + Sync {
    /// Every ranking-point entry of every version.
    fn list_score_entries(&self) -> Result<Vec<ScoreEntry>, StoreError>;

    fn list_players(&self) -> Result<Vec<Player>, StoreError>;

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;

    fn list_tournament_players(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlayer>, StoreError>;

    /// Results of one player across all tournaments, joined with tournament
    /// display fields.
    fn list_performances_by_player(&self, usab_id: i64) -> Result<Vec<Performance>, StoreError>;

    /// Results recorded in one tournament by registered players only.
    fn list_performances_by_tournament(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<Performance>, StoreError>;

    /// Results of every player in one event type.
    fn list_performances_by_event(
        &self,
        event_type: EventType,
    ) -> Result<Vec<Performance>, StoreError>;
}

pub use in_memory::{InMemoryRatingStore, PerformanceRow, TournamentEntry};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteRatingStore, SCHEMA};
