//! Boundary validation of string request parameters.
//!
//! Query strings deserialize into the `*Query` structs with every field an
//! optional string; `validate` turns them into strict domain types or
//! rejects them before any cache or storage access.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{AgeGroup, EventType};
use crate::error::RatingError;
use crate::performance::PerformanceFilter;
use crate::ranking::Bracket;

/// Parse a numeric entity id from a path segment.
pub fn parse_id(raw: &str, name: &str) -> Result<i64, RatingError> {
    parse_digits(raw)
        .ok_or_else(|| RatingError::InvalidFilter(format!("{} must be numeric, got '{}'", name, raw)))
}

/// Parse a score version; only plain digits are accepted.
pub fn parse_version(raw: &str) -> Result<i64, RatingError> {
    parse_digits(raw).ok_or_else(|| RatingError::InvalidVersion(raw.to_string()))
}

fn parse_digits(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_date(raw: &str, name: &str) -> Result<NaiveDate, RatingError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        RatingError::InvalidFilter(format!("{} must be YYYY-MM-DD, got '{}'", name, raw))
    })
}

fn parse_event_type(raw: &str) -> Result<EventType, RatingError> {
    raw.parse::<EventType>()
        .map_err(|e| RatingError::InvalidFilter(e.to_string()))
}

fn parse_age_group(raw: &str) -> Result<AgeGroup, RatingError> {
    raw.parse::<AgeGroup>()
        .map_err(|e| RatingError::InvalidFilter(e.to_string()))
}

/// `?version=` of the score listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoresQuery {
    pub version: Option<String>,
}

impl ScoresQuery {
    pub fn validate(&self) -> Result<Option<i64>, RatingError> {
        self.version.as_deref().map(parse_version).transpose()
    }
}

/// Filters of a tournament's result listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentPerformanceQuery {
    pub event_type: Option<String>,
    pub age_group: Option<String>,
}

impl TournamentPerformanceQuery {
    pub fn validate(&self) -> Result<PerformanceFilter, RatingError> {
        Ok(PerformanceFilter {
            event_type: self.event_type.as_deref().map(parse_event_type).transpose()?,
            age_group: self.age_group.as_deref().map(parse_age_group).transpose()?,
            ..PerformanceFilter::default()
        })
    }
}

/// Validated filters of a player's result listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerPerformanceFilter {
    pub filter: PerformanceFilter,
    /// Score version to resolve points against; current when absent.
    pub score_version: Option<i64>,
}

/// Filters of a player's result listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerPerformanceQuery {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub event_type: Option<String>,
    pub age_group: Option<String>,
    pub score_version: Option<String>,
}

impl PlayerPerformanceQuery {
    pub fn validate(&self) -> Result<PlayerPerformanceFilter, RatingError> {
        let filter = PerformanceFilter {
            event_type: self.event_type.as_deref().map(parse_event_type).transpose()?,
            age_group: self.age_group.as_deref().map(parse_age_group).transpose()?,
            min_date: self
                .min_date
                .as_deref()
                .map(|raw| parse_date(raw, "min_date"))
                .transpose()?,
            max_date: self
                .max_date
                .as_deref()
                .map(|raw| parse_date(raw, "max_date"))
                .transpose()?,
        };
        Ok(PlayerPerformanceFilter {
            filter,
            score_version: self.score_version.as_deref().map(parse_version).transpose()?,
        })
    }
}

/// Bracket of a ranking request; both fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RanksQuery {
    pub event_type: Option<String>,
    pub age_group: Option<String>,
}

impl RanksQuery {
    pub fn validate(&self) -> Result<Bracket, RatingError> {
        let event_type = self
            .event_type
            .as_deref()
            .ok_or_else(|| RatingError::InvalidFilter("missing event_type".into()))?;
        let age_group = self
            .age_group
            .as_deref()
            .ok_or_else(|| RatingError::InvalidFilter("missing age_group".into()))?;
        Ok(Bracket::new(
            parse_event_type(event_type)?,
            parse_age_group(age_group)?,
        ))
    }
}
