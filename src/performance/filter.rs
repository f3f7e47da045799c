//! Per-request filtering and ordering of performance listings.

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::domain::{standing_rank, AgeGroup, EventType, ScoredPerformance, TournamentPerformance};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validated performance filters. Absent fields impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceFilter {
    pub event_type: Option<EventType>,
    pub age_group: Option<AgeGroup>,
    /// Inclusive lower bound on the tournament end date.
    pub min_date: Option<NaiveDate>,
    /// Inclusive upper bound on the tournament end date.
    pub max_date: Option<NaiveDate>,
}

impl PerformanceFilter {
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    /// Categorical match, ignoring case of the stored values.
    pub fn matches_event(&self, event_type: &str, age_group: &str) -> bool {
        self.event_type.map_or(true, |e| e.matches(event_type))
            && self.age_group.map_or(true, |a| a.matches(age_group))
    }

    /// Inclusive date-range match against an ISO `YYYY-MM-DD` end date,
    /// compared as strings.
    pub fn matches_dates(&self, end_date: &str) -> bool {
        let after_min = self
            .min_date
            .map_or(true, |min| min.format(DATE_FORMAT).to_string().as_str() <= end_date);
        let before_max = self
            .max_date
            .map_or(true, |max| max.format(DATE_FORMAT).to_string().as_str() >= end_date);
        after_min && before_max
    }

    pub fn matches_scored(&self, performance: &ScoredPerformance) -> bool {
        self.matches_event(&performance.event_type, &performance.age_group)
            && self.matches_dates(&performance.end_date)
    }
}

/// Keep the matching results of a player, highest score first.
pub fn player_listing(
    performances: Vec<ScoredPerformance>,
    filter: &PerformanceFilter,
) -> Vec<ScoredPerformance> {
    let mut listing: Vec<ScoredPerformance> = performances
        .into_iter()
        .filter(|p| filter.matches_scored(p))
        .collect();
    listing.sort_by_key(|p| Reverse(p.score));
    listing
}

/// Keep the matching results of a tournament, ordered by age group, event
/// type, then standing level precedence. Levels without a numeric prefix
/// sort last.
pub fn tournament_listing(
    performances: Vec<TournamentPerformance>,
    filter: &PerformanceFilter,
) -> Vec<TournamentPerformance> {
    let mut listing: Vec<TournamentPerformance> = performances
        .into_iter()
        .filter(|p| filter.matches_event(&p.event_type, &p.age_group))
        .collect();
    listing.sort_by(|a, b| {
        (
            &a.age_group,
            &a.event_type,
            standing_rank(&a.standing_level).unwrap_or(u32::MAX),
        )
            .cmp(&(
                &b.age_group,
                &b.event_type,
                standing_rank(&b.standing_level).unwrap_or(u32::MAX),
            ))
    });
    listing
}
