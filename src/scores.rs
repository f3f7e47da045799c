//! Score table resolution - which ranking-point table applies to a request.
//!
//! The whole `score` table is loaded once and grouped by version. Individual
//! versions and the "current" (highest) version are cached under their own
//! keys so later requests skip the grouping step.

use std::collections::BTreeMap;

use tracing::warn;

use crate::cache::{keys, CacheExt, DerivedCache};
use crate::domain::{ScoreEntry, ScoreKey, ScoreTable};
use crate::error::RatingError;
use crate::store::RatingStore;

/// Resolves score tables from storage through the cache.
pub struct ScoreTables<'a, S, C> {
    store: &'a S,
    cache: &'a C,
}

impl<'a, S: RatingStore, C: DerivedCache> ScoreTables<'a, S, C> {
    pub fn new(store: &'a S, cache: &'a C) -> Self {
        Self { store, cache }
    }

    /// Every version's table, keyed by version.
    pub fn all_tables(&self) -> Result<BTreeMap<i64, ScoreTable>, RatingError> {
        self.cache.get_or_compute(keys::SCORE_TABLES, || {
            let entries = self.store.list_score_entries()?;
            Ok(group_by_version(entries))
        })
    }

    /// Versions present in storage, ascending.
    pub fn versions(&self) -> Result<Vec<i64>, RatingError> {
        Ok(self.all_tables()?.into_keys().collect())
    }

    /// The table of one version. Fails with `InvalidVersion` if absent.
    pub fn table_for(&self, version: i64) -> Result<ScoreTable, RatingError> {
        self.cache.get_or_compute(&keys::score_table(version), || {
            self.all_tables()?
                .remove(&version)
                .ok_or_else(|| RatingError::InvalidVersion(version.to_string()))
        })
    }

    /// The table of the highest version. Fails with `NoVersionsAvailable`
    /// when storage holds no entries.
    pub fn current_table(&self) -> Result<ScoreTable, RatingError> {
        self.cache.get_or_compute(keys::CURRENT_SCORE_TABLE, || {
            let current = self
                .all_tables()?
                .into_keys()
                .next_back()
                .ok_or(RatingError::NoVersionsAvailable)?;
            self.table_for(current)
        })
    }

    /// `table_for(version)` when a version is given, the current table
    /// otherwise.
    pub fn resolve(&self, version: Option<i64>) -> Result<ScoreTable, RatingError> {
        match version {
            Some(version) => self.table_for(version),
            None => self.current_table(),
        }
    }
}

fn group_by_version(entries: Vec<ScoreEntry>) -> BTreeMap<i64, ScoreTable> {
    let mut tables: BTreeMap<i64, ScoreTable> = BTreeMap::new();
    for entry in entries {
        let key = ScoreKey::new(entry.tournament_type, entry.age_group, entry.standing_level);
        let table = tables
            .entry(entry.version)
            .or_insert_with(|| ScoreTable::new(entry.version));
        if let Some(previous) = table.insert(key.clone(), entry.ranking_points) {
            warn!(
                version = entry.version,
                ?key,
                previous,
                replaced_by = entry.ranking_points,
                "duplicate score entry"
            );
        }
    }
    tables
}
