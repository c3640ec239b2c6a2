//! Operator REST API handlers for runtime simulation control.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause the run loop |
//! | `POST` | `/api/operator/resume` | Resume the run loop |
//! | `POST` | `/api/operator/reset` | Respawn both agents before the next tick |
//! | `POST` | `/api/operator/speed` | Set tick interval (ms) |
//! | `GET` | `/api/operator/status` | Current simulation status |
//! | `POST` | `/api/operator/stop` | Trigger clean shutdown |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use pursuit_core::operator::{OperatorState, SimulationStatus};
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

/// Request body for `POST /api/operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New tick interval in milliseconds (minimum 1).
    pub tick_interval_ms: u64,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

fn respond(message: &str) -> Json<OperatorResponse> {
    Json(OperatorResponse {
        ok: true,
        message: message.to_owned(),
    })
}

/// Pause the run loop. State is kept in memory.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.pause();
    info!("Operator paused simulation");
    Ok(respond("Simulation paused"))
}

/// Resume the run loop after a pause.
pub async fn resume(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.resume();
    info!("Operator resumed simulation");
    Ok(respond("Simulation resumed"))
}

/// Start a new round with freshly spawned agents.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.request_reset();
    info!("Operator requested new round");
    Ok(respond("Reset requested, new round starts on the next tick"))
}

/// Change the tick interval at runtime.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state.operator()?;

    operator.set_tick_interval_ms(body.tick_interval_ms).map_or_else(
        || {
            Err(ObserverError::InvalidInput(format!(
                "tick_interval_ms must be at least {}",
                OperatorState::MIN_TICK_INTERVAL_MS
            )))
        },
        |prev| {
            info!(previous = prev, new = body.tick_interval_ms, "Tick interval changed");
            Ok(Json(serde_json::json!({
                "ok": true,
                "previous_interval_ms": prev,
                "new_interval_ms": body.tick_interval_ms,
            })))
        },
    )
}

/// Current tick, captures, limits and control flags.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SimulationStatus>, ObserverError> {
    let operator = state.operator()?;
    let (tick, captures) = state
        .snapshot
        .read()
        .await
        .frame
        .as_ref()
        .map_or((0, 0), |f| (f.tick, f.captures));

    Ok(Json(SimulationStatus {
        tick,
        captures,
        paused: operator.is_paused(),
        stop_requested: operator.is_stop_requested(),
        tick_interval_ms: operator.tick_interval_ms(),
        elapsed_seconds: operator.elapsed_seconds(),
        max_ticks: operator.max_ticks(),
        max_captures: operator.max_captures(),
        max_real_time_seconds: operator.max_real_time_seconds(),
        settings: operator.settings(),
        end_reason: operator.end_reason().await,
        started_at: operator.started_at().to_rfc3339(),
    }))
}

/// Stop the run loop after the current tick.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    state.operator()?.request_stop();
    info!("Operator requested stop");
    Ok(respond("Stop requested"))
}
