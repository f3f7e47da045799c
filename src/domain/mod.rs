//! Domain types shared by every layer of the rating service.

mod codes;
mod records;

pub use codes::{age_ceiling, standing_rank, AgeGroup, EventType, UnknownCode};
pub use records::{
    Performance, Player, RankEntry, ScoreEntry, ScoreKey, ScoreTable, ScoreView,
    ScoredPerformance, Tournament, TournamentPerformance, TournamentPlayer,
};
