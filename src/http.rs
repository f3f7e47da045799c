//! HTTP transport - maps `/api/v1` GET routes onto [`RatingService`].
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /api/v1/scores?version=`
//! - `GET /api/v1/players`, `GET /api/v1/player/:usab_id`
//! - `GET /api/v1/player/:usab_id/performance?min_date&max_date&event_type&age_group&score_version`
//! - `GET /api/v1/tournaments`, `GET /api/v1/tournament/:tournament_id`
//! - `GET /api/v1/tournament/:tournament_id/players`
//! - `GET /api/v1/tournament/:tournament_id/performance?event_type&age_group`
//! - `GET /api/v1/ranks?event_type&age_group`
//! - `POST /api/v1/cache/flush` - drop every cached value.
//! - `GET /health` - `{ "ok": true, "cache": { entries, hits, misses } }`.
//!
//! Errors are returned as `{ "error": message }` with the status of
//! [`RatingError::status_code`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{rejection::QueryRejection, Path, Query, State};
use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::cache::DerivedCache;
use crate::domain::{
    Player, RankEntry, ScoreView, ScoredPerformance, Tournament, TournamentPerformance,
    TournamentPlayer,
};
use crate::error::RatingError;
use crate::query::{
    parse_id, PlayerPerformanceQuery, RanksQuery, ScoresQuery, TournamentPerformanceQuery,
};
use crate::service::RatingService;
use crate::store::RatingStore;

type Shared<S, C> = State<Arc<RatingService<S, C>>>;
type ApiResult<T> = Result<Json<T>, RatingError>;
type Params<T> = Result<Query<T>, QueryRejection>;

/// Unwrap a query extractor, reporting a malformed query string as an
/// invalid filter.
fn params<T>(query: Params<T>) -> Result<T, RatingError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| RatingError::InvalidFilter(rejection.body_text()))
}

impl IntoResponse for RatingError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build an axum `Router` serving the rating API from `service`.
pub fn router<S, C>(service: Arc<RatingService<S, C>>) -> Router
where
    S: RatingStore + 'static,
    C: DerivedCache + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler::<S, C>))
        .route("/api/v1/scores", get(scores_handler::<S, C>))
        .route("/api/v1/players", get(players_handler::<S, C>))
        .route("/api/v1/player/:usab_id", get(player_handler::<S, C>))
        .route(
            "/api/v1/player/:usab_id/performance",
            get(player_performance_handler::<S, C>),
        )
        .route("/api/v1/tournaments", get(tournaments_handler::<S, C>))
        .route(
            "/api/v1/tournament/:tournament_id",
            get(tournament_handler::<S, C>),
        )
        .route(
            "/api/v1/tournament/:tournament_id/players",
            get(tournament_players_handler::<S, C>),
        )
        .route(
            "/api/v1/tournament/:tournament_id/performance",
            get(tournament_performance_handler::<S, C>),
        )
        .route("/api/v1/ranks", get(ranks_handler::<S, C>))
        .route("/api/v1/cache/flush", post(flush_handler::<S, C>))
        .layer(cors)
        .with_state(service)
}

/// Serve the API at `addr` until Ctrl+C or SIGTERM.
pub async fn serve<S, C>(
    service: Arc<RatingService<S, C>>,
    addr: SocketAddr,
) -> Result<(), std::io::Error>
where
    S: RatingStore + 'static,
    C: DerivedCache + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
) -> ApiResult<Value> {
    let stats = service.cache_stats()?;
    Ok(Json(json!({ "ok": true, "cache": stats })))
}

async fn scores_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    query: Params<ScoresQuery>,
) -> ApiResult<Vec<ScoreView>> {
    let version = params(query)?.validate()?;
    Ok(Json(service.get_scores(version)?))
}

async fn players_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
) -> ApiResult<Vec<Player>> {
    Ok(Json(service.get_players()?))
}

async fn player_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    Path(usab_id): Path<String>,
) -> ApiResult<Player> {
    let usab_id = parse_id(&usab_id, "usab_id")?;
    Ok(Json(service.get_player(usab_id)?))
}

async fn player_performance_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    Path(usab_id): Path<String>,
    query: Params<PlayerPerformanceQuery>,
) -> ApiResult<Vec<ScoredPerformance>> {
    let usab_id = parse_id(&usab_id, "usab_id")?;
    let request = params(query)?.validate()?;
    Ok(Json(service.get_player_performance(usab_id, &request)?))
}

async fn tournaments_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
) -> ApiResult<Vec<Tournament>> {
    Ok(Json(service.get_tournaments()?))
}

async fn tournament_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    Path(tournament_id): Path<String>,
) -> ApiResult<Tournament> {
    let tournament_id = parse_id(&tournament_id, "tournament_id")?;
    Ok(Json(service.get_tournament(tournament_id)?))
}

async fn tournament_players_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    Path(tournament_id): Path<String>,
) -> ApiResult<Vec<TournamentPlayer>> {
    let tournament_id = parse_id(&tournament_id, "tournament_id")?;
    Ok(Json(service.get_tournament_players(tournament_id)?))
}

async fn tournament_performance_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    Path(tournament_id): Path<String>,
    query: Params<TournamentPerformanceQuery>,
) -> ApiResult<Vec<TournamentPerformance>> {
    let tournament_id = parse_id(&tournament_id, "tournament_id")?;
    let filter = params(query)?.validate()?;
    Ok(Json(service.get_tournament_performance(tournament_id, &filter)?))
}

async fn ranks_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
    query: Params<RanksQuery>,
) -> ApiResult<Vec<RankEntry>> {
    let bracket = params(query)?.validate()?;
    Ok(Json(service.get_ranks(bracket)?))
}

async fn flush_handler<S: RatingStore, C: DerivedCache>(
    State(service): Shared<S, C>,
) -> ApiResult<Value> {
    let flushed = service.flush_cache()?;
    Ok(Json(json!({ "flushed": flushed })))
}
