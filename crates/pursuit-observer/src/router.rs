//! Axum router construction for the Observer API.
//!
//! Assembles the REST, input, operator and `WebSocket` routes into one
//! [`Router`] with permissive CORS so a renderer served from another
//! origin can connect.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, input, operator, ws};

/// Build the complete Axum router for the Observer server.
///
/// - `GET /` status page
/// - `GET /ws/frames` frame stream (accepts pointer messages)
/// - `GET /api/frame`, `GET /api/boundary`, `GET /api/captures`
/// - `POST /api/input/pointer`
/// - `GET|POST /api/settings`
/// - `/api/operator/{pause,resume,reset,speed,status,stop}`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/frames", get(ws::ws_frames))
        .route("/api/frame", get(handlers::get_frame))
        .route("/api/boundary", get(handlers::get_boundary))
        .route("/api/captures", get(handlers::list_captures))
        .route("/api/input/pointer", post(input::set_pointer))
        .route(
            "/api/settings",
            get(input::get_settings).post(input::set_settings),
        )
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/reset", post(operator::reset))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/status", get(operator::status))
        .route("/api/operator/stop", post(operator::stop))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
