//! Performance join - attaches ranking points to a player's results and
//! serves tournament result listings.
//!
//! Raw rows are cached per player and per tournament. Scored lists are cached
//! per (player, score version), so a response never mixes points from two
//! versions. Filters vary per request and are applied after cache retrieval.

mod filter;

pub use filter::{player_listing, tournament_listing, PerformanceFilter};

use tracing::warn;

use crate::cache::{keys, CacheExt, DerivedCache};
use crate::domain::{Performance, ScoreTable, ScoredPerformance};
use crate::error::RatingError;
use crate::store::RatingStore;

/// Look up the points of one performance.
///
/// A combination missing from the table is a data fault, never a zero score.
pub fn score(table: &ScoreTable, performance: Performance) -> Result<ScoredPerformance, RatingError> {
    let key = performance.score_key();
    match table.points(&key) {
        Some(points) => Ok(ScoredPerformance::new(performance, points)),
        None => {
            warn!(
                version = table.version,
                tournament_id = performance.tournament_id,
                usab_id = performance.usab_id,
                ?key,
                "performance has no score entry"
            );
            Err(RatingError::DataIntegrity {
                version: table.version,
                tournament_id: performance.tournament_id,
                tournament_type: key.tournament_type,
                age_group: key.age_group,
                standing_level: key.standing_level,
            })
        }
    }
}

/// Score every performance against one table, failing on the first miss.
pub fn score_all(
    table: &ScoreTable,
    performances: Vec<Performance>,
) -> Result<Vec<ScoredPerformance>, RatingError> {
    performances
        .into_iter()
        .map(|performance| score(table, performance))
        .collect()
}

/// Cached access to performance rows.
pub struct Performances<'a, S, C> {
    store: &'a S,
    cache: &'a C,
}

impl<'a, S: RatingStore, C: DerivedCache> Performances<'a, S, C> {
    pub fn new(store: &'a S, cache: &'a C) -> Self {
        Self { store, cache }
    }

    /// Raw results of a player, unscored.
    pub fn raw_for_player(&self, usab_id: i64) -> Result<Vec<Performance>, RatingError> {
        self.cache
            .get_or_compute(&keys::player_performances(usab_id), || {
                Ok(self.store.list_performances_by_player(usab_id)?)
            })
    }

    /// Results of a player scored against `table`, in storage order.
    pub fn for_player(
        &self,
        usab_id: i64,
        table: &ScoreTable,
    ) -> Result<Vec<ScoredPerformance>, RatingError> {
        self.cache.get_or_compute(
            &keys::scored_player_performances(usab_id, table.version),
            || score_all(table, self.raw_for_player(usab_id)?),
        )
    }

    /// Results recorded in one tournament, unscored.
    pub fn for_tournament(&self, tournament_id: i64) -> Result<Vec<Performance>, RatingError> {
        self.cache
            .get_or_compute(&keys::tournament_performances(tournament_id), || {
                Ok(self.store.list_performances_by_tournament(tournament_id)?)
            })
    }
}
