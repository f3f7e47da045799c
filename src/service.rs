//! RatingService - the read operations served to clients.
//!
//! The service owns the store and an injected cache. Every operation takes
//! already-validated parameters (see [`crate::query`]) and resolves at most
//! one score table, so a response never mixes points from two versions.
//!
//! ## Example
//!
//! ```ignore
//! use usab_rankings::{InMemoryCache, RatingService, SqliteRatingStore};
//!
//! let service = RatingService::new(SqliteRatingStore::open(path)?, InMemoryCache::new());
//! let scores = service.get_scores(None)?;
//! let ranks = service.get_ranks(Bracket::new(EventType::BS, AgeGroup::U15))?;
//! ```

use tracing::{info, warn};

use crate::cache::{keys, CacheExt, CacheStats, DerivedCache};
use crate::domain::{
    Player, RankEntry, ScoreView, ScoredPerformance, Tournament, TournamentPerformance,
    TournamentPlayer,
};
use crate::error::RatingError;
use crate::performance::{player_listing, tournament_listing, PerformanceFilter, Performances};
use crate::query::PlayerPerformanceFilter;
use crate::ranking::{Bracket, Rankings};
use crate::scores::ScoreTables;
use crate::store::RatingStore;

/// Placeholder id used by the loader for unregistered players.
const UNREGISTERED_PLAYER: i64 = 0;

/// Read-only rating operations over a store and a derived-data cache.
pub struct RatingService<S, C> {
    store: S,
    cache: C,
}

impl<S: RatingStore, C: DerivedCache> RatingService<S, C> {
    pub fn new(store: S, cache: C) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn score_tables(&self) -> ScoreTables<'_, S, C> {
        ScoreTables::new(&self.store, &self.cache)
    }

    pub fn performances(&self) -> Performances<'_, S, C> {
        Performances::new(&self.store, &self.cache)
    }

    pub fn rankings(&self) -> Rankings<'_, S, C> {
        Rankings::new(&self.store, &self.cache)
    }

    /// Entries of one score version, or of the current version when none is
    /// given, ordered by (tournament_type, age_group, standing_level).
    pub fn get_scores(&self, version: Option<i64>) -> Result<Vec<ScoreView>, RatingError> {
        Ok(self.score_tables().resolve(version)?.views())
    }

    /// Registered players, ascending by USAB id.
    pub fn get_players(&self) -> Result<Vec<Player>, RatingError> {
        self.cache.get_or_compute(keys::PLAYERS, || {
            let mut players: Vec<Player> = self
                .store
                .list_players()?
                .into_iter()
                .filter(|p| p.usab_id != UNREGISTERED_PLAYER)
                .collect();
            players.sort_by_key(|p| p.usab_id);
            Ok(players)
        })
    }

    pub fn get_player(&self, usab_id: i64) -> Result<Player, RatingError> {
        let players = self.get_players()?;
        players
            .binary_search_by_key(&usab_id, |p| p.usab_id)
            .map(|idx| players[idx].clone())
            .map_err(|_| RatingError::NotFound(format!("player {}", usab_id)))
    }

    /// Tournaments, most recently finished first.
    pub fn get_tournaments(&self) -> Result<Vec<Tournament>, RatingError> {
        self.cache.get_or_compute(keys::TOURNAMENTS, || {
            let mut tournaments = self.store.list_tournaments()?;
            tournaments.sort_by(|a, b| b.end_date.cmp(&a.end_date));
            Ok(tournaments)
        })
    }

    pub fn get_tournament(&self, tournament_id: i64) -> Result<Tournament, RatingError> {
        self.get_tournaments()?
            .into_iter()
            .find(|t| t.tournament_id == tournament_id)
            .ok_or_else(|| RatingError::NotFound(format!("tournament {}", tournament_id)))
    }

    /// Entrants of a tournament, ascending by tournament player id.
    pub fn get_tournament_players(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlayer>, RatingError> {
        self.cache
            .get_or_compute(&keys::tournament_players(tournament_id), || {
                let mut players = self.store.list_tournament_players(tournament_id)?;
                players.sort_by_key(|p| p.tournament_player_id);
                Ok(players)
            })
    }

    /// Results of a tournament filtered by event type and age group.
    pub fn get_tournament_performance(
        &self,
        tournament_id: i64,
        filter: &PerformanceFilter,
    ) -> Result<Vec<TournamentPerformance>, RatingError> {
        let rows = self
            .performances()
            .for_tournament(tournament_id)?
            .into_iter()
            .map(TournamentPerformance::from)
            .collect();
        Ok(tournament_listing(rows, filter))
    }

    /// Scored results of a player, highest score first.
    pub fn get_player_performance(
        &self,
        usab_id: i64,
        request: &PlayerPerformanceFilter,
    ) -> Result<Vec<ScoredPerformance>, RatingError> {
        let table = self.score_tables().resolve(request.score_version)?;
        let scored = self.performances().for_player(usab_id, &table)?;
        Ok(player_listing(scored, &request.filter))
    }

    /// Ranking of one bracket against the current score version.
    pub fn get_ranks(&self, bracket: Bracket) -> Result<Vec<RankEntry>, RatingError> {
        let table = self.score_tables().current_table()?;
        self.rankings().for_bracket(bracket, &table)
    }

    /// Drop every cached value. Returns how many entries were dropped.
    pub fn flush_cache(&self) -> Result<usize, RatingError> {
        let dropped = self.cache.invalidate_all()?;
        info!(dropped, "cache flushed");
        Ok(dropped)
    }

    /// Drop everything derived for one player.
    pub fn flush_player(&self, usab_id: i64) -> Result<usize, RatingError> {
        Ok(self.cache.invalidate_prefix(&keys::player_prefix(usab_id))?)
    }

    /// Drop everything derived for one tournament.
    pub fn flush_tournament(&self, tournament_id: i64) -> Result<usize, RatingError> {
        Ok(self
            .cache
            .invalidate_prefix(&keys::tournament_prefix(tournament_id))?)
    }

    pub fn cache_stats(&self) -> Result<CacheStats, RatingError> {
        Ok(self.cache.stats()?)
    }

    /// Precompute score tables, listings and every bracket ranking.
    ///
    /// Ranking failures are logged and skipped so one bad bracket does not
    /// block startup; the failing bracket reports its error on request.
    pub fn warm(&self) -> Result<usize, RatingError> {
        let table = self.score_tables().current_table()?;
        self.get_players()?;
        self.get_tournaments()?;

        let mut warmed = 0;
        for bracket in Bracket::all() {
            match self.rankings().for_bracket(bracket, &table) {
                Ok(_) => warmed += 1,
                Err(e) => warn!(
                    event_type = %bracket.event_type,
                    age_group = %bracket.age_group,
                    error = %e,
                    "ranking warm-up failed"
                ),
            }
        }
        info!(version = table.version, brackets = warmed, "cache warmed");
        Ok(warmed)
    }
}
