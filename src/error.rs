use thiserror::Error;

use crate::cache::CacheError;
use crate::store::StoreError;

/// Error type for every rating operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// A requested score version is malformed or absent.
    #[error("invalid score version: {0}")]
    InvalidVersion(String),

    /// The score table is empty, so no current version exists.
    #[error("no score versions available")]
    NoVersionsAvailable,

    /// A filter or query parameter is malformed or outside its enumeration.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A performance references a combination missing from the score table.
    #[error(
        "score version {version} has no entry for ({tournament_type}, {age_group}, {standing_level}) \
         used by tournament {tournament_id}"
    )]
    DataIntegrity {
        version: i64,
        tournament_id: i64,
        tournament_type: String,
        age_group: String,
        standing_level: String,
    },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl RatingError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            RatingError::InvalidVersion(_) => 400,
            RatingError::NoVersionsAvailable => 400,
            RatingError::InvalidFilter(_) => 400,
            RatingError::NotFound(_) => 404,
            RatingError::DataIntegrity { .. } => 500,
            RatingError::Store(_) => 500,
            RatingError::Cache(_) => 500,
        }
    }

    /// True for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
