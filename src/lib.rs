mod domain;
mod error;

pub mod cache;
pub mod config;
pub mod logging;
pub mod performance;
pub mod query;
pub mod ranking;
pub mod scores;
pub mod service;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use cache::{CacheError, CacheExt, CacheStats, DerivedCache, InMemoryCache};
pub use config::Config;
pub use domain::{
    age_ceiling, standing_rank, AgeGroup, EventType, Performance, Player, RankEntry, ScoreEntry,
    ScoreKey, ScoreTable, ScoreView, ScoredPerformance, Tournament, TournamentPerformance,
    TournamentPlayer, UnknownCode,
};
pub use error::RatingError;
pub use performance::PerformanceFilter;
pub use query::{
    PlayerPerformanceFilter, PlayerPerformanceQuery, RanksQuery, ScoresQuery,
    TournamentPerformanceQuery,
};
pub use ranking::{Bracket, COUNTED_RESULTS};
pub use service::RatingService;
pub use store::{InMemoryRatingStore, PerformanceRow, RatingStore, StoreError, TournamentEntry};
#[cfg(feature = "sqlite")]
pub use store::{SqliteRatingStore, SCHEMA};
