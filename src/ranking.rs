//! Bracket rankings - each player's best four results, summed and ranked.
//!
//! A result counts toward a bracket when it was played in the bracket's event
//! type at an age group strictly below the bracket's age group. Rankings are
//! cached per (score version, event type, age group).

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::{keys, CacheExt, DerivedCache};
use crate::domain::{age_ceiling, AgeGroup, EventType, Performance, RankEntry, ScoreTable};
use crate::error::RatingError;
use crate::performance::score;
use crate::store::RatingStore;

/// Results counted per player.
pub const COUNTED_RESULTS: usize = 4;

/// The aggregation scope of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bracket {
    pub event_type: EventType,
    pub age_group: AgeGroup,
}

impl Bracket {
    pub fn new(event_type: EventType, age_group: AgeGroup) -> Self {
        Self {
            event_type,
            age_group,
        }
    }

    /// Every (event type, age group) pair.
    pub fn all() -> impl Iterator<Item = Bracket> {
        EventType::ALL.into_iter().flat_map(|event_type| {
            AgeGroup::ALL
                .into_iter()
                .map(move |age_group| Bracket::new(event_type, age_group))
        })
    }

    /// True if a stored result counts toward this bracket. Results whose age
    /// group has no readable ceiling never count.
    pub fn admits(&self, performance: &Performance) -> bool {
        if !self.event_type.matches(&performance.event_type) {
            return false;
        }
        match age_ceiling(&performance.age_group) {
            Some(ceiling) => ceiling < self.age_group.ceiling(),
            None => {
                warn!(
                    tournament_id = performance.tournament_id,
                    age_group = %performance.age_group,
                    "skipping result with unreadable age group"
                );
                false
            }
        }
    }
}

struct PlayerPoints {
    usab_id: i64,
    player_name: String,
    points: Vec<i64>,
}

impl PlayerPoints {
    fn total(mut self) -> (i64, String, i64) {
        self.points.sort_unstable_by_key(|p| Reverse(*p));
        let total: i64 = self.points.iter().take(COUNTED_RESULTS).sum();
        (self.usab_id, self.player_name, total)
    }
}

/// Rank players of `bracket` from raw results scored against `table`.
///
/// Players keep the order of their first result, so equal totals rank in
/// storage order.
pub fn rank(
    bracket: Bracket,
    table: &ScoreTable,
    performances: Vec<Performance>,
) -> Result<Vec<RankEntry>, RatingError> {
    let mut players: Vec<PlayerPoints> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for performance in performances {
        if !bracket.admits(&performance) {
            continue;
        }
        let scored = score(table, performance)?;
        let slot = *index.entry(scored.usab_id).or_insert_with(|| {
            players.push(PlayerPoints {
                usab_id: scored.usab_id,
                player_name: scored.player_name.clone(),
                points: Vec::new(),
            });
            players.len() - 1
        });
        players[slot].points.push(scored.score);
    }

    let mut totals: Vec<(i64, String, i64)> =
        players.into_iter().map(PlayerPoints::total).collect();
    totals.sort_by_key(|(_, _, total)| Reverse(*total));

    Ok(totals
        .into_iter()
        .enumerate()
        .map(|(position, (usab_id, player_name, total_score))| RankEntry {
            usab_id,
            player_name,
            total_score,
            rank: position as u32 + 1,
        })
        .collect())
}

/// Cached bracket rankings.
pub struct Rankings<'a, S, C> {
    store: &'a S,
    cache: &'a C,
}

impl<'a, S: RatingStore, C: DerivedCache> Rankings<'a, S, C> {
    pub fn new(store: &'a S, cache: &'a C) -> Self {
        Self { store, cache }
    }

    /// Ranking of `bracket` with points from `table`.
    pub fn for_bracket(
        &self,
        bracket: Bracket,
        table: &ScoreTable,
    ) -> Result<Vec<RankEntry>, RatingError> {
        let key = keys::ranks(table.version, bracket.event_type, bracket.age_group);
        self.cache.get_or_compute(&key, || {
            let performances = self.store.list_performances_by_event(bracket.event_type)?;
            debug!(
                event_type = %bracket.event_type,
                age_group = %bracket.age_group,
                rows = performances.len(),
                "computing ranking"
            );
            rank(bracket, table, performances)
        })
    }
}
