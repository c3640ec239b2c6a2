//! Input endpoints: pointer position and policy settings.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/input/pointer` | Move the pointer (board or pixel coordinates) |
//! | `GET` | `/api/settings` | Current policy per agent |
//! | `POST` | `/api/settings` | Change one or both policies |
//!
//! Policy names are free-form. Anything other than `chase`, `mouse`,
//! `dodge`, `run` or `automatic` is stored as unrecognized and leaves that
//! agent's steering untouched.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use pursuit_types::{PolicyKind, PolicySettings, Role, Vec2};
use pursuit_world::Board;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ObserverError;
use crate::state::AppState;

/// Body of `POST /api/input/pointer`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointerRequest {
    /// Raw host pixel position inside a canvas of the given size.
    Pixel {
        /// Horizontal pixel offset from the canvas' left edge.
        pixel_x: f64,
        /// Vertical pixel offset from the canvas' top edge.
        pixel_y: f64,
        /// Canvas width in pixels.
        viewport_width: f64,
        /// Canvas height in pixels.
        viewport_height: f64,
    },
    /// Position already in board coordinates.
    Board {
        /// Horizontal board coordinate.
        x: f64,
        /// Vertical board coordinate.
        y: f64,
    },
}

/// Map a pointer request onto the board.
///
/// # Errors
///
/// Returns [`ObserverError::InvalidInput`] for non-finite values or a
/// non-positive viewport.
pub fn resolve_pointer(request: &PointerRequest, board: &Board) -> Result<Vec2, ObserverError> {
    match *request {
        PointerRequest::Board { x, y } => {
            let position = Vec2::new(x, y);
            if !position.is_finite() {
                return Err(ObserverError::InvalidInput(
                    "pointer coordinates must be finite".to_owned(),
                ));
            }
            Ok(position)
        }
        PointerRequest::Pixel {
            pixel_x,
            pixel_y,
            viewport_width,
            viewport_height,
        } => {
            let pixel = Vec2::new(pixel_x, pixel_y);
            let viewport = Vec2::new(viewport_width, viewport_height);
            if !pixel.is_finite() || !viewport.is_finite() {
                return Err(ObserverError::InvalidInput(
                    "pointer coordinates must be finite".to_owned(),
                ));
            }
            if viewport.x <= 0.0 || viewport.y <= 0.0 {
                return Err(ObserverError::InvalidInput(
                    "viewport size must be positive".to_owned(),
                ));
            }
            Ok(board.viewport_to_board(pixel, viewport))
        }
    }
}

/// Response of `POST /api/input/pointer`.
#[derive(Debug, Serialize)]
struct PointerResponse {
    /// Whether the pointer was updated.
    ok: bool,
    /// The pointer in board coordinates.
    pointer: Vec2,
}

/// Move the pointer that the `mouse` policy follows.
pub async fn set_pointer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PointerRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state.operator()?;
    let board = state.snapshot.read().await.board;
    let pointer = resolve_pointer(&body, &board)?;
    operator.set_pointer(pointer);
    debug!(x = pointer.x, y = pointer.y, "Pointer moved");

    Ok(Json(PointerResponse { ok: true, pointer }))
}

/// Body of `POST /api/settings`. Omitted roles keep their policy.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    /// New chaser policy name.
    pub chaser: Option<String>,
    /// New runner policy name.
    pub runner: Option<String>,
}

/// Current policy settings.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PolicySettings>, ObserverError> {
    Ok(Json(state.operator()?.settings()))
}

/// Change the policy of one or both agents. Takes effect on the next tick.
pub async fn set_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SettingsRequest>,
) -> Result<Json<PolicySettings>, ObserverError> {
    let operator = state.operator()?;

    for (role, name) in [(Role::Chaser, &body.chaser), (Role::Runner, &body.runner)] {
        let Some(name) = name else {
            continue;
        };
        let kind = PolicyKind::parse(name);
        if kind == PolicyKind::Unrecognized {
            warn!(%role, requested = %name, "Unrecognized policy, agent will coast");
        }
        operator.set_policy(role, kind);
    }

    let settings = operator.settings();
    info!(chaser = %settings.chaser, runner = %settings.runner, "Policy settings changed");
    Ok(Json(settings))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn board_pointer_passes_through() {
        let request: PointerRequest = serde_json::from_str(r#"{"x": 10.0, "y": -20.0}"#).unwrap();
        let pointer = resolve_pointer(&request, &Board::default()).unwrap();
        assert_eq!(pointer, Vec2::new(10.0, -20.0));
    }

    #[test]
    fn pixel_pointer_is_mapped_onto_board() {
        let request: PointerRequest = serde_json::from_str(
            r#"{"pixel_x": 600, "pixel_y": 0, "viewport_width": 800, "viewport_height": 800}"#,
        )
        .unwrap();
        let pointer = resolve_pointer(&request, &Board::default()).unwrap();
        assert!((pointer.x - 250.0).abs() < 1e-9);
        assert!((pointer.y + 500.0).abs() < 1e-9);
    }

    #[test]
    fn empty_viewport_is_rejected() {
        let request = PointerRequest::Pixel {
            pixel_x: 1.0,
            pixel_y: 1.0,
            viewport_width: 0.0,
            viewport_height: 600.0,
        };
        assert!(matches!(
            resolve_pointer(&request, &Board::default()),
            Err(ObserverError::InvalidInput(_))
        ));
    }
}
