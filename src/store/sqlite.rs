//! SQLite-backed rating store over the tournament database.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::info;

use super::{RatingStore, StoreError};
use crate::domain::{EventType, Performance, Player, ScoreEntry, Tournament, TournamentPlayer};

/// Tables the store reads. The loader that populates the database owns them;
/// this is kept for bootstrapping fresh databases and for tests.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS score (
    version INTEGER NOT NULL,
    tournament_type VARCHAR(20) NOT NULL,
    age_group VARCHAR(10) NOT NULL,
    standing_level VARCHAR(10) NOT NULL,
    ranking_points INTEGER NOT NULL,
    PRIMARY KEY (version, tournament_type, age_group, standing_level)
);
CREATE TABLE IF NOT EXISTS usab_player (
    usab_id INTEGER PRIMARY KEY,
    player_name VARCHAR(50),
    birth_year INTEGER,
    gender VARCHAR(1)
);
CREATE TABLE IF NOT EXISTS tournament (
    tournament_id INTEGER PRIMARY KEY,
    tournament_name VARCHAR(50),
    tournament_type VARCHAR(20),
    description VARCHAR(255),
    location VARCHAR(20),
    start_date DATE,
    end_date DATE
);
CREATE TABLE IF NOT EXISTS tournament_player (
    tournament_id INTEGER NOT NULL REFERENCES tournament(tournament_id),
    tournament_player_id INTEGER NOT NULL,
    usab_id INTEGER REFERENCES usab_player(usab_id),
    player_name VARCHAR(50),
    PRIMARY KEY (tournament_id, tournament_player_id)
);
CREATE TABLE IF NOT EXISTS tournament_player_performance (
    tournament_id INTEGER NOT NULL,
    tournament_player_id INTEGER NOT NULL,
    age_group VARCHAR(10) NOT NULL,
    event_type VARCHAR(20) NOT NULL,
    standing_level VARCHAR(10) NOT NULL,
    PRIMARY KEY (tournament_id, tournament_player_id, age_group, event_type, standing_level),
    FOREIGN KEY (tournament_id, tournament_player_id)
        REFERENCES tournament_player(tournament_id, tournament_player_id)
);
";

const PERFORMANCE_SELECT: &str = "
SELECT p.tournament_id, p.tournament_player_id, t.tournament_name, t.description,
       t.tournament_type, t.end_date, p.event_type, p.age_group, p.standing_level,
       tp.usab_id, tp.player_name
FROM tournament_player_performance p
JOIN tournament_player tp
  ON tp.tournament_id = p.tournament_id AND tp.tournament_player_id = p.tournament_player_id
JOIN tournament t ON t.tournament_id = p.tournament_id
";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Rating store reading a SQLite database through one guarded connection.
pub struct SqliteRatingStore {
    conn: Mutex<Connection>,
}

impl SqliteRatingStore {
    /// Open an existing database read-only.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening SQLite database at {:?}", path);
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already opened connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn query<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned("query"))?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn performances(
        &self,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Performance>, StoreError> {
        let sql = format!("{} WHERE {}", PERFORMANCE_SELECT, filter);
        self.query(&sql, params, performance_from_row)
    }
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn performance_from_row(row: &Row<'_>) -> rusqlite::Result<Performance> {
    Ok(Performance {
        tournament_id: row.get(0)?,
        tournament_player_id: row.get(1)?,
        tournament_name: text(row, 2)?,
        tournament_description: row.get(3)?,
        tournament_type: text(row, 4)?,
        end_date: text(row, 5)?,
        event_type: row.get(6)?,
        age_group: row.get(7)?,
        standing_level: row.get(8)?,
        usab_id: row.get::<_, Option<i64>>(9)?.unwrap_or_default(),
        player_name: text(row, 10)?,
    })
}

impl RatingStore for SqliteRatingStore {
    fn list_score_entries(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.query(
            "SELECT version, tournament_type, age_group, standing_level, ranking_points FROM score",
            [],
            |row| {
                Ok(ScoreEntry {
                    version: row.get(0)?,
                    tournament_type: row.get(1)?,
                    age_group: row.get(2)?,
                    standing_level: row.get(3)?,
                    ranking_points: row.get(4)?,
                })
            },
        )
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.query(
            "SELECT usab_id, player_name, birth_year, gender FROM usab_player",
            [],
            |row| {
                Ok(Player {
                    usab_id: row.get(0)?,
                    player_name: text(row, 1)?,
                    birth_year: row.get(2)?,
                    gender: row.get(3)?,
                })
            },
        )
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        self.query(
            "SELECT tournament_id, tournament_name, tournament_type, description, location, \
             start_date, end_date FROM tournament",
            [],
            |row| {
                Ok(Tournament {
                    tournament_id: row.get(0)?,
                    tournament_name: text(row, 1)?,
                    tournament_type: text(row, 2)?,
                    description: row.get(3)?,
                    location: row.get(4)?,
                    start_date: text(row, 5)?,
                    end_date: text(row, 6)?,
                })
            },
        )
    }

    fn list_tournament_players(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<TournamentPlayer>, StoreError> {
        self.query(
            "SELECT tournament_player_id, usab_id, player_name FROM tournament_player \
             WHERE tournament_id = ?1",
            params![tournament_id],
            |row| {
                Ok(TournamentPlayer {
                    tournament_player_id: row.get(0)?,
                    usab_id: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
                    player_name: text(row, 2)?,
                })
            },
        )
    }

    fn list_performances_by_player(&self, usab_id: i64) -> Result<Vec<Performance>, StoreError> {
        self.performances("tp.usab_id = ?1", params![usab_id])
    }

    fn list_performances_by_tournament(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<Performance>, StoreError> {
        self.performances(
            "p.tournament_id = ?1 \
             AND EXISTS (SELECT 1 FROM usab_player u WHERE u.usab_id = tp.usab_id)",
            params![tournament_id],
        )
    }

    fn list_performances_by_event(
        &self,
        event_type: EventType,
    ) -> Result<Vec<Performance>, StoreError> {
        self.performances(
            "UPPER(p.event_type) = ?1",
            params![event_type.as_str()],
        )
    }
}
