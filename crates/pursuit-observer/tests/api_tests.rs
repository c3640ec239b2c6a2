//! Integration tests for the Observer API endpoints.
//!
//! Requests go straight through the Axum `Router` via `tower::ServiceExt`,
//! so no TCP listener is involved.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use pursuit_core::config::{RunConfig, SimulationConfig};
use pursuit_core::operator::OperatorState;
use pursuit_core::tick::SimulationState;
use pursuit_observer::router::build_router;
use pursuit_observer::state::{AppState, CaptureRecord, MAX_CAPTURES};
use pursuit_types::{PolicyKind, PolicySettings, RoundId, Vec2};
use serde_json::Value;
use tower::ServiceExt;

fn simulation() -> SimulationState {
    let mut config = SimulationConfig::default();
    config.simulation.seed = Some(11);
    SimulationState::from_config(&config).unwrap()
}

fn operator() -> Arc<OperatorState> {
    Arc::new(OperatorState::new(
        &RunConfig::default(),
        PolicySettings::default(),
    ))
}

fn make_state(sim: &SimulationState, operator: Option<Arc<OperatorState>>) -> Arc<AppState> {
    let view = sim.boundary.view();
    Arc::new(match operator {
        Some(op) => AppState::with_operator(sim.board, view, op),
        None => AppState::new(sim.board, view),
    })
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[tokio::test]
async fn index_returns_html() {
    let sim = simulation();
    let state = make_state(&sim, None);
    let response = build_router(state).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Chaser"));
    assert!(html.contains("/ws/frames"));
}

#[tokio::test]
async fn frame_is_404_until_published() {
    let sim = simulation();
    let state = make_state(&sim, None);

    let (status, body) = send(&state, get("/api/frame")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    state.snapshot.write().await.frame = Some(sim.frame());

    let (status, body) = send(&state, get("/api/frame")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tick"], 0);
    assert_eq!(body["chaser"]["color"], "#ff0000");
    assert_eq!(body["runner"]["color"], "#0000ff");
    assert_eq!(body["round_id"], sim.round_id.to_string());
}

#[tokio::test]
async fn boundary_reports_ramp() {
    let sim = simulation();
    let state = make_state(&sim, None);

    let (status, body) = send(&state, get("/api/boundary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ramp_width"].as_f64().unwrap(), sim.boundary.ramp_width());
    assert_eq!(body["bounds"]["right"].as_f64().unwrap(), 500.0);
}

#[tokio::test]
async fn captures_are_listed_and_capped() {
    let sim = simulation();
    let state = make_state(&sim, None);

    {
        let mut snapshot = state.snapshot.write().await;
        for tick in 0..=MAX_CAPTURES as u64 {
            snapshot.record_capture(CaptureRecord {
                tick,
                round_id: RoundId::new(),
                round_ticks: 10,
                distance: 5.0,
                next_round: RoundId::new(),
                captured_at: Utc::now(),
            });
        }
    }

    let (status, body) = send(&state, get("/api/captures")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], MAX_CAPTURES);
    // The oldest record was dropped.
    assert_eq!(body["captures"][0]["tick"], 1);
}

#[tokio::test]
async fn pointer_in_board_coordinates() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, body) = send(&state, post("/api/input/pointer", r#"{"x": 12.5, "y": -40}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(op.pointer(), Vec2::new(12.5, -40.0));
}

#[tokio::test]
async fn pointer_in_pixel_coordinates() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, _) = send(
        &state,
        post(
            "/api/input/pointer",
            r#"{"pixel_x": 400, "pixel_y": 400, "viewport_width": 800, "viewport_height": 800}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(op.pointer().length() < 1e-9);
}

#[tokio::test]
async fn pointer_with_empty_viewport_is_rejected() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));
    op.set_pointer(Vec2::new(1.0, 2.0));

    let (status, body) = send(
        &state,
        post(
            "/api/input/pointer",
            r#"{"pixel_x": 10, "pixel_y": 10, "viewport_width": 0, "viewport_height": 800}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(op.pointer(), Vec2::new(1.0, 2.0));
}

#[tokio::test]
async fn settings_round_trip() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, body) = send(&state, get("/api/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chaser"], "chase");
    assert_eq!(body["runner"], "dodge");

    let (status, body) = send(&state, post("/api/settings", r#"{"runner": "run"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chaser"], "chase");
    assert_eq!(body["runner"], "run");
    assert_eq!(op.settings().runner, PolicyKind::Run);
}

#[tokio::test]
async fn unknown_policy_name_is_stored_as_unrecognized() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, body) = send(&state, post("/api/settings", r#"{"chaser": "teleport"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chaser"], "unrecognized");
    assert_eq!(op.settings().chaser, PolicyKind::Unrecognized);
}

#[tokio::test]
async fn operator_pause_resume_and_status() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));
    state.snapshot.write().await.frame = Some(sim.frame());

    let (status, _) = send(&state, post("/api/operator/pause", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(op.is_paused());

    let (status, body) = send(&state, get("/api/operator/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paused"], true);
    assert_eq!(body["tick"], 0);
    assert_eq!(body["settings"]["chaser"], "chase");
    assert!(body["end_reason"].is_null());

    let (status, _) = send(&state, post("/api/operator/resume", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!op.is_paused());
}

#[tokio::test]
async fn operator_reset_and_stop_set_flags() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, _) = send(&state, post("/api/operator/reset", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(op.take_reset_request());

    let (status, _) = send(&state, post("/api/operator/stop", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(op.is_stop_requested());
}

#[tokio::test]
async fn operator_speed_validates_interval() {
    let sim = simulation();
    let op = operator();
    let state = make_state(&sim, Some(Arc::clone(&op)));

    let (status, body) = send(&state, post("/api/operator/speed", r#"{"tick_interval_ms": 50}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_interval_ms"], 50);
    assert_eq!(op.tick_interval_ms(), 50);

    let (status, _) = send(&state, post("/api/operator/speed", r#"{"tick_interval_ms": 0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(op.tick_interval_ms(), 50);
}

#[tokio::test]
async fn operator_endpoints_need_a_simulation() {
    let sim = simulation();
    let state = make_state(&sim, None);

    let (status, body) = send(&state, post("/api/operator/pause", "")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);

    let (status, _) = send(&state, get("/api/settings")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
