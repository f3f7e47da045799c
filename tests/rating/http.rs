//! Full axum HTTP roundtrip with a reqwest client.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use serde_json::json;
use usab_rankings::http::router;
use usab_rankings::{InMemoryRatingStore, PerformanceRow, ScoreEntry};

use crate::support::{seeded_store, service, service_with, Service, ANA};

async fn spawn(service: Service) -> SocketAddr {
    let app = router(Arc::new(service));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (StatusCode, Value) {
    let resp = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn scores_roundtrip() {
    let addr = spawn(service()).await;

    let (status, body) = get(addr, "/api/v1/scores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body[0],
        json!({
            "tournament_type": "Local",
            "age_group": "U11",
            "standing_level": "1-Winner",
            "ranking_points": 45
        })
    );

    let (status, body) = get(addr, "/api/v1/scores?version=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["ranking_points"], 40);
    assert!(body[0].get("version").is_none());

    let (status, body) = get(addr, "/api/v1/scores?version=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));

    let (status, _) = get(addr, "/api/v1/scores?version=9").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn player_routes() {
    let addr = spawn(service()).await;

    let (status, body) = get(addr, "/api/v1/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get(addr, "/api/v1/player/200").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player_name"], "Ben Ito");

    let (status, _) = get(addr, "/api/v1/player/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(addr, "/api/v1/player/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(addr, "/api/v1/player/100/performance?event_type=bs").await;
    assert_eq!(status, StatusCode::OK);
    let scores: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![85, 45, 35]);

    let (status, body) = get(
        addr,
        "/api/v1/player/100/performance?min_date=2024-12-31&max_date=2024-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));

    let (status, _) = get(addr, "/api/v1/player/100/performance?min_date=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tournament_routes() {
    let addr = spawn(service()).await;

    let (status, body) = get(addr, "/api/v1/tournaments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["tournament_id"], 3);

    let (status, body) = get(addr, "/api/v1/tournament/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tournament_type"], "Regional");

    let (status, body) = get(addr, "/api/v1/tournament/1/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get(addr, "/api/v1/tournament/1/performance?age_group=U11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["event_type"], "GS");
    assert!(body[0].get("score").is_none());

    let (status, _) = get(addr, "/api/v1/tournament/1/performance?event_type=MS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ranks_and_cache_routes() {
    let addr = spawn(service()).await;

    let (status, body) = get(addr, "/api/v1/ranks?event_type=bs&age_group=u15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["usab_id"], 100);
    assert_eq!(body[0]["total_score"], 165);
    assert_eq!(body[0]["rank"], 1);

    let (status, body) = get(addr, "/api/v1/ranks?event_type=BS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid filter: missing age_group");

    let (status, body) = get(addr, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["cache"]["entries"].as_u64().unwrap() > 0);

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/v1/cache/flush", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["flushed"].as_u64().unwrap() > 0);

    let (_, body) = get(addr, "/health").await;
    assert_eq!(body["cache"]["entries"], 0);
}

#[tokio::test]
async fn single_entry_scores_body() {
    let store = InMemoryRatingStore::new();
    store
        .insert_score(ScoreEntry {
            version: 1,
            tournament_type: "Local".into(),
            age_group: "U15".into(),
            standing_level: "4-Elite".into(),
            ranking_points: 100,
        })
        .unwrap();
    let addr = spawn(service_with(store)).await;

    let expected = json!([{
        "tournament_type": "Local",
        "age_group": "U15",
        "standing_level": "4-Elite",
        "ranking_points": 100
    }]);
    assert_eq!(get(addr, "/api/v1/scores").await, (StatusCode::OK, expected.clone()));
    assert_eq!(get(addr, "/api/v1/scores?version=1").await, (StatusCode::OK, expected));

    let (status, body) = get(addr, "/api/v1/scores?version=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid score version: 2");
}

#[tokio::test]
async fn malformed_query_string_is_an_invalid_filter() {
    let addr = spawn(service()).await;

    let (status, body) = get(addr, "/api/v1/scores?version=1&version=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid filter:"));

    let (status, body) = get(addr, "/api/v1/ranks?event_type=BS&event_type=GS&age_group=U15").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_score_entry_is_a_server_error() {
    let store = seeded_store();
    store
        .insert_performance(PerformanceRow {
            tournament_id: 3,
            tournament_player_id: 31,
            age_group: "U13".into(),
            event_type: "XD".into(),
            standing_level: "9-NoSuchLevel".into(),
        })
        .unwrap();
    let addr = spawn(service_with(store)).await;

    let path = format!("/api/v1/player/{}/performance", ANA);
    let (status, body) = get(addr, &path).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("9-NoSuchLevel"));

    let (status, body) = get(addr, "/api/v1/ranks?event_type=XD&age_group=U15").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("9-NoSuchLevel"));

    // Unaffected routes still answer.
    let (status, _) = get(addr, "/api/v1/ranks?event_type=BS&age_group=U15").await;
    assert_eq!(status, StatusCode::OK);
}
