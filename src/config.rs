//! Configuration for the rating server.
//!
//! CLI arguments with environment variable fallbacks, parsed with clap.
//! A `.env` file in the working directory is loaded before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// USAB rating server - versioned ranking points, player results and
/// bracket rankings over a read-only tournament database.
#[derive(Parser, Debug, Clone)]
#[command(name = "usab-rankings")]
#[command(about = "Read-only USAB badminton rating API")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Path to the SQLite tournament database
    #[arg(long, env = "DATABASE_PATH", default_value = "tournament.db")]
    pub database: PathBuf,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Precompute score tables and every bracket ranking before serving
    #[arg(long, env = "WARM_CACHE", default_value_t = false)]
    pub warm_cache: bool,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.database.is_file() {
            return Err(format!(
                "database {} does not exist (set DATABASE_PATH)",
                self.database.display()
            ));
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LEVELS.join(", "),
                self.log_level
            ));
        }

        Ok(())
    }
}
