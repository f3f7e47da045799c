//! Cache key construction.
//!
//! A key encodes every parameter its value depends on. Version-specific
//! values carry the version number so two score tables never share a slot.

use crate::domain::{AgeGroup, EventType};

pub const SCORE_TABLES: &str = "score_tables";
pub const CURRENT_SCORE_TABLE: &str = "score_table:current";
pub const PLAYERS: &str = "players";
pub const TOURNAMENTS: &str = "tournaments";

pub fn score_table(version: i64) -> String {
    format!("score_table:v{}", version)
}

/// Prefix shared by every entry derived for one player.
pub fn player_prefix(usab_id: i64) -> String {
    format!("player:{}:", usab_id)
}

pub fn player_performances(usab_id: i64) -> String {
    format!("player:{}:performances", usab_id)
}

pub fn scored_player_performances(usab_id: i64, version: i64) -> String {
    format!("player:{}:performances:v{}", usab_id, version)
}

/// Prefix shared by every entry derived for one tournament.
pub fn tournament_prefix(tournament_id: i64) -> String {
    format!("tournament:{}:", tournament_id)
}

pub fn tournament_players(tournament_id: i64) -> String {
    format!("tournament:{}:players", tournament_id)
}

pub fn tournament_performances(tournament_id: i64) -> String {
    format!("tournament:{}:performances", tournament_id)
}

pub fn ranks(version: i64, event_type: EventType, age_group: AgeGroup) -> String {
    format!("ranks:v{}:{}:{}", version, event_type, age_group)
}
