//! Categorical codes used by USAB tournaments: event types, age groups and
//! standing levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Badminton event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// Boys' singles.
    BS,
    /// Girls' singles.
    GS,
    /// Boys' doubles.
    BD,
    /// Girls' doubles.
    GD,
    /// Mixed doubles.
    XD,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::BS,
        EventType::GS,
        EventType::BD,
        EventType::GD,
        EventType::XD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BS => "BS",
            EventType::GS => "GS",
            EventType::BD => "BD",
            EventType::GD => "GD",
            EventType::XD => "XD",
        }
    }

    /// True when a stored event type string names this event, ignoring case.
    pub fn matches(&self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownCode {}

impl FromStr for EventType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event| event.matches(s.trim()))
            .ok_or_else(|| UnknownCode {
                kind: "event_type",
                value: s.to_string(),
            })
    }
}

/// Junior age bracket, "under N".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    U11,
    U13,
    U15,
    U17,
    U19,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::U11,
        AgeGroup::U13,
        AgeGroup::U15,
        AgeGroup::U17,
        AgeGroup::U19,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::U11 => "U11",
            AgeGroup::U13 => "U13",
            AgeGroup::U15 => "U15",
            AgeGroup::U17 => "U17",
            AgeGroup::U19 => "U19",
        }
    }

    /// The N in "under N".
    pub fn ceiling(&self) -> u32 {
        match self {
            AgeGroup::U11 => 11,
            AgeGroup::U13 => 13,
            AgeGroup::U15 => 15,
            AgeGroup::U17 => 17,
            AgeGroup::U19 => 19,
        }
    }

    pub fn matches(&self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.matches(s.trim()))
            .ok_or_else(|| UnknownCode {
                kind: "age_group",
                value: s.to_string(),
            })
    }
}

/// Parse the ceiling out of a stored age group code such as `"U15"`.
///
/// Stored rows are not restricted to the query enumeration, so any
/// `U<digits>` code is accepted here.
pub fn age_ceiling(raw: &str) -> Option<u32> {
    let digits = raw
        .trim()
        .strip_prefix('U')
        .or_else(|| raw.trim().strip_prefix('u'))?;
    digits.parse().ok()
}

/// Sort precedence of a standing level: the integer before the first `-`
/// (`"4-Elite"` → 4).
pub fn standing_rank(level: &str) -> Option<u32> {
    level.split('-').next()?.trim().parse().ok()
}
