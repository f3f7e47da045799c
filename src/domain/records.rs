//! Records read from storage and the views derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the ranking-point table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub version: i64,
    pub tournament_type: String,
    pub age_group: String,
    pub standing_level: String,
    pub ranking_points: i64,
}

/// A score entry as served to clients; the version is implied by the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub tournament_type: String,
    pub age_group: String,
    pub standing_level: String,
    pub ranking_points: i64,
}

/// Lookup key of a score table within one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoreKey {
    pub tournament_type: String,
    pub age_group: String,
    pub standing_level: String,
}

impl ScoreKey {
    pub fn new(
        tournament_type: impl Into<String>,
        age_group: impl Into<String>,
        standing_level: impl Into<String>,
    ) -> Self {
        Self {
            tournament_type: tournament_type.into(),
            age_group: age_group.into(),
            standing_level: standing_level.into(),
        }
    }
}

/// Ranking points of a single version, keyed by
/// (tournament_type, age_group, standing_level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub version: i64,
    points: BTreeMap<ScoreKey, i64>,
}

impl ScoreTable {
    pub fn new(version: i64) -> Self {
        Self {
            version,
            points: BTreeMap::new(),
        }
    }

    /// Insert an entry, returning the points it replaced if the key was
    /// already present.
    pub fn insert(&mut self, key: ScoreKey, points: i64) -> Option<i64> {
        self.points.insert(key, points)
    }

    pub fn points(&self, key: &ScoreKey) -> Option<i64> {
        self.points.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Entries of this version, ordered by key.
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.points
            .iter()
            .map(|(key, points)| ScoreEntry {
                version: self.version,
                tournament_type: key.tournament_type.clone(),
                age_group: key.age_group.clone(),
                standing_level: key.standing_level.clone(),
                ranking_points: *points,
            })
            .collect()
    }

    /// Client view of this version, ordered by key.
    pub fn views(&self) -> Vec<ScoreView> {
        self.points
            .iter()
            .map(|(key, points)| ScoreView {
                tournament_type: key.tournament_type.clone(),
                age_group: key.age_group.clone(),
                standing_level: key.standing_level.clone(),
                ranking_points: *points,
            })
            .collect()
    }
}

/// A registered USAB player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub usab_id: i64,
    pub player_name: String,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: i64,
    pub tournament_name: String,
    pub tournament_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

/// A player's entry in one tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPlayer {
    pub tournament_player_id: i64,
    pub usab_id: i64,
    pub player_name: String,
}

/// A player's result in one tournament event, with the tournament and player
/// display fields joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub tournament_id: i64,
    pub tournament_player_id: i64,
    pub tournament_name: String,
    pub tournament_description: Option<String>,
    pub tournament_type: String,
    pub end_date: String,
    pub event_type: String,
    pub age_group: String,
    pub standing_level: String,
    pub usab_id: i64,
    pub player_name: String,
}

impl Performance {
    /// Key of this result in a score table.
    pub fn score_key(&self) -> ScoreKey {
        ScoreKey::new(
            self.tournament_type.as_str(),
            self.age_group.as_str(),
            self.standing_level.as_str(),
        )
    }
}

/// A performance with its ranking points resolved against one score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPerformance {
    pub tournament_id: i64,
    pub tournament_name: String,
    pub tournament_description: Option<String>,
    pub tournament_type: String,
    pub end_date: String,
    pub event_type: String,
    pub age_group: String,
    pub player_name: String,
    pub usab_id: i64,
    pub standing_level: String,
    pub score: i64,
}

impl ScoredPerformance {
    pub fn new(performance: Performance, score: i64) -> Self {
        Self {
            tournament_id: performance.tournament_id,
            tournament_name: performance.tournament_name,
            tournament_description: performance.tournament_description,
            tournament_type: performance.tournament_type,
            end_date: performance.end_date,
            event_type: performance.event_type,
            age_group: performance.age_group,
            player_name: performance.player_name,
            usab_id: performance.usab_id,
            standing_level: performance.standing_level,
            score,
        }
    }
}

/// Tournament-centric view of a performance; no points attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPerformance {
    pub tournament_player_id: i64,
    pub age_group: String,
    pub event_type: String,
    pub usab_id: i64,
    pub player_name: String,
    pub standing_level: String,
}

impl From<Performance> for TournamentPerformance {
    fn from(performance: Performance) -> Self {
        Self {
            tournament_player_id: performance.tournament_player_id,
            age_group: performance.age_group,
            event_type: performance.event_type,
            usab_id: performance.usab_id,
            player_name: performance.player_name,
            standing_level: performance.standing_level,
        }
    }
}

/// One line of a bracket ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub usab_id: i64,
    pub player_name: String,
    pub total_score: i64,
    pub rank: u32,
}
