//! Read-only REST endpoints for the renderer and dashboards.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/frame` | Latest frame (agents, trails, boundary) |
//! | `GET` | `/api/boundary` | Boundary geometry |
//! | `GET` | `/api/captures` | Recent captures |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use pursuit_types::{BoundaryView, Frame};

use crate::error::ObserverError;
use crate::state::AppState;

/// Serve a minimal HTML page with the current tick and links to the API.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let (tick, captures, distance) = snapshot
        .frame
        .as_ref()
        .map_or((0, 0, 0.0), |f| (f.tick, f.captures, f.distance));
    let round = snapshot
        .frame
        .as_ref()
        .map_or_else(|| "-".to_owned(), |f| f.round_id.to_string());
    let paused = state
        .operator_state
        .as_ref()
        .is_some_and(|operator| operator.is_paused());

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Pursuit Observer</title>
    <style>
        body {{ background: #fff; color: #222; font-family: monospace; padding: 2rem; max-width: 720px; margin: 0 auto; }}
        .chaser {{ color: #ff0000; }}
        .runner {{ color: #0000ff; }}
        td {{ padding: 0.2rem 1rem 0.2rem 0; }}
    </style>
</head>
<body>
    <h1><span class="chaser">Chaser</span> vs <span class="runner">Runner</span></h1>
    <table>
        <tr><td>Tick</td><td>{tick}</td></tr>
        <tr><td>Round</td><td>{round}</td></tr>
        <tr><td>Captures</td><td>{captures}</td></tr>
        <tr><td>Distance</td><td>{distance:.1}</td></tr>
        <tr><td>Paused</td><td>{paused}</td></tr>
    </table>
    <ul>
        <li><a href="/api/frame">/api/frame</a></li>
        <li><a href="/api/boundary">/api/boundary</a></li>
        <li><a href="/api/captures">/api/captures</a></li>
        <li><a href="/api/settings">/api/settings</a></li>
        <li><a href="/api/operator/status">/api/operator/status</a></li>
        <li>ws: /ws/frames</li>
    </ul>
</body>
</html>"#
    ))
}

/// Latest published frame.
pub async fn get_frame(State(state): State<Arc<AppState>>) -> Result<Json<Frame>, ObserverError> {
    state
        .snapshot
        .read()
        .await
        .frame
        .clone()
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound("no frame published yet".to_owned()))
}

/// Boundary rectangle and ramp parameters.
pub async fn get_boundary(State(state): State<Arc<AppState>>) -> Json<BoundaryView> {
    Json(state.snapshot.read().await.boundary)
}

/// Recent captures, newest last.
pub async fn list_captures(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(serde_json::json!({
        "count": snapshot.captures.len(),
        "captures": snapshot.captures,
    }))
}
