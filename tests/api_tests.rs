/// API integration tests
/// Tests complete HTTP request/response cycles against the scripted backend
mod common;

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{spawn_app, wait_for, ScriptedBackend, URL_B, URL_C};
use pitlane::{api::create_router, state::AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn open_panel_from_home() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, post("/panel/garage/open")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["snapshot"]["panel"]["active"], "garage");
    assert_eq!(body["snapshot"]["panel"]["closing"], false);
    assert_eq!(body["snapshot"]["panel"]["chrome"]["player_controls_visible"], false);
    assert_eq!(body["snapshot"]["panel"]["chrome"]["backdrop_visible"], true);
}

#[tokio::test]
async fn open_same_panel_is_unchanged() {
    let state = spawn_app(&ScriptedBackend::new());
    send(&state, post("/panel/rules/open")).await;
    let (status, body) = send(&state, post("/panel/Rules/open")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["snapshot"]["panel"]["chrome"]["navbar_dimmed"], true);
}

#[tokio::test]
async fn unknown_panel_is_not_found() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, _) = send(&state, post("/panel/pitstop/open")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn switching_panels_over_http() {
    let state = spawn_app(&ScriptedBackend::new());
    send(&state, post("/panel/garage/open")).await;

    let (_, body) = send(&state, post("/panel/tune/open")).await;
    assert_eq!(body["snapshot"]["panel"]["active"], "garage");
    assert_eq!(body["snapshot"]["panel"]["closing"], true);

    tokio::time::sleep(Duration::from_millis(301)).await;
    let (status, body) = send(&state, get("/panel")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], "tune");
    assert_eq!(body["closing"], false);
}

#[tokio::test(start_paused = true)]
async fn status_reflects_what_the_router_did() {
    let state = spawn_app(&ScriptedBackend::new());
    send(&state, post("/panel/garage/open")).await;

    let (_, body) = send(&state, post("/panel/tune/open")).await;
    assert_eq!(body["status"], "ok");

    let (_, body) = send(&state, post("/panel/tune/open")).await;
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["snapshot"]["panel"]["closing"], true);

    let (_, body) = send(&state, post("/panel/garage/open")).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["snapshot"]["panel"]["closing"], false);

    let (_, body) = send(&state, post("/panel/close")).await;
    assert_eq!(body["status"], "ok");
    let (_, body) = send(&state, post("/panel/close")).await;
    assert_eq!(body["status"], "unchanged");
    assert_eq!(state.get_last_action().0.as_deref(), Some("close panel"));
}

#[tokio::test]
async fn close_from_home_is_unchanged() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, post("/panel/close")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["snapshot"]["panel"]["active"], "none");
}

#[tokio::test]
async fn lists_stations_in_order() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, get("/stations")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn select_station_by_url_and_index() {
    let state = spawn_app(&ScriptedBackend::new());

    let (status, body) = send(&state, post_json("/player/select", json!({ "url": URL_C }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["player"]["index"], 2);
    assert_eq!(body["snapshot"]["player"]["loading"], true);

    let (_, body) = send(&state, post_json("/player/select", json!({ "index": 1 }))).await;
    assert_eq!(body["snapshot"]["player"]["station"]["url"], URL_B);

    let (_, body) = send(&state, post_json("/player/select", json!({ "index": 1 }))).await;
    assert_eq!(body["status"], "unchanged");
}

#[tokio::test]
async fn unknown_station_is_not_found() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, _) = send(
        &state,
        post_json("/player/select", json!({ "url": "https://nowhere.example/x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&state, post_json("/player/select", json!({ "index": 9 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn next_and_previous_wrap() {
    let state = spawn_app(&ScriptedBackend::new());

    let (_, body) = send(&state, post("/player/previous")).await;
    assert_eq!(body["snapshot"]["player"]["station"]["name"], "C");

    let (_, body) = send(&state, post("/player/next")).await;
    assert_eq!(body["snapshot"]["player"]["station"]["name"], "A");
}

#[tokio::test]
async fn toggle_starts_playback() {
    let backend = ScriptedBackend::new();
    let state = spawn_app(&backend);

    let (status, body) = send(&state, post("/player/toggle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["player"]["loading"], true);

    wait_for(&state.player, |s| s.playing).await;
    let (_, body) = send(&state, get("/player")).await;
    assert_eq!(body["playing"], true);
    assert_eq!(body["loading"], false);
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn failed_stream_shows_fixed_error() {
    let backend = ScriptedBackend::new();
    backend.fail(common::URL_A);
    let state = spawn_app(&backend);

    send(&state, post("/player/toggle")).await;
    wait_for(&state.player, |s| s.error.is_some()).await;

    let (_, body) = send(&state, get("/player")).await;
    assert_eq!(body["playing"], false);
    assert_eq!(body["error"], "Can't play stream");
}

#[tokio::test]
async fn volume_is_clamped_over_http() {
    let state = spawn_app(&ScriptedBackend::new());

    let (status, body) = send(&state, post_json("/player/volume", json!({ "volume": 2.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["player"]["volume"].as_f64(), Some(1.0));

    let (_, body) = send(&state, post_json("/player/volume", json!({ "volume": -1.0 }))).await;
    assert_eq!(body["snapshot"]["player"]["volume"].as_f64(), Some(0.0));
    assert_eq!(body["snapshot"]["player"]["muted"], true);
}

#[tokio::test]
async fn mute_toggles_back() {
    let state = spawn_app(&ScriptedBackend::new());

    let (_, body) = send(&state, post("/player/mute")).await;
    assert_eq!(body["message"], "Muted");
    assert_eq!(body["snapshot"]["player"]["volume"].as_f64(), Some(0.0));

    let (_, body) = send(&state, post("/player/mute")).await;
    assert_eq!(body["message"], "Unmuted");
    assert!((body["snapshot"]["player"]["volume"].as_f64().unwrap() - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn boost_sales_readout() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, get("/readouts/boost-sales?sold=12000&total=20000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounded"], 60);
    assert_eq!(body["percent"].as_f64(), Some(60.0));
}

#[tokio::test]
async fn speed_readout_uses_site_defaults() {
    let state = spawn_app(&ScriptedBackend::new());
    let (status, body) = send(&state, get("/readouts/speed?value=100")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["needle_deg"].as_f64(), Some(270.0));
    assert_eq!(body["units"], "MP/H");
    assert_eq!(body["display"], "100");
}

#[tokio::test]
async fn status_tracks_last_action() {
    let state = spawn_app(&ScriptedBackend::new());
    send(&state, post("/panel/leaderboard/open")).await;

    let (status, body) = send(&state, get("/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "open leaderboard");
    assert_eq!(body["panel"]["active"], "leaderboard");
    assert_eq!(body["player"]["station"]["name"], "A");
    assert_eq!(body["host"], "127.0.0.1");
}
