//! USAB rating server
//!
//! Serves ranking-point tables, player and tournament results and bracket
//! rankings from a read-only SQLite tournament database.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: 0.0.0.0:5000, ./tournament.db
//! usab-rankings
//!
//! # Custom database, warm every ranking before serving
//! usab-rankings --database /data/tournament.db --warm-cache
//!
//! # Also log to a file
//! LOG_FILE=/var/log/usab-rankings.log usab-rankings
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use usab_rankings::{http, logging, Config, InMemoryCache, RatingService, SqliteRatingStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let config = Config::parse();
    logging::init(&config.log_level, config.log_file.as_deref())?;

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("========================================");
    info!("  usab-rankings v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    info!(database = %config.database.display(), listen = %config.listen, "Starting");

    let store = SqliteRatingStore::open(&config.database)?;
    let service = Arc::new(RatingService::new(store, InMemoryCache::new()));

    if config.warm_cache {
        match service.warm() {
            Ok(brackets) => info!(brackets, "Cache warmed"),
            Err(e) => warn!("Cache warm-up failed: {} (serving cold)", e),
        }
    }

    info!("Endpoints:");
    info!("  GET  /api/v1/scores");
    info!("  GET  /api/v1/players, /api/v1/player/{{usab_id}}[/performance]");
    info!("  GET  /api/v1/tournaments, /api/v1/tournament/{{id}}[/players|/performance]");
    info!("  GET  /api/v1/ranks?event_type=&age_group=");
    info!("  POST /api/v1/cache/flush");
    info!("  GET  /health");

    http::serve(service, config.listen).await?;
    info!("Shutdown complete");
    Ok(())
}
