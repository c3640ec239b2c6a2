//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for frames and the in-memory
//! [`SimulationSnapshot`] that the REST endpoints serve. The engine
//! publishes into both after every tick; handlers only read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pursuit_core::operator::OperatorState;
use pursuit_types::{BoundaryView, Frame, RoundId};
use pursuit_world::Board;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

use crate::error::ObserverError;

/// Capacity of the broadcast channel for frames.
///
/// A subscriber that falls behind by more than this many frames receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 64;

/// Maximum number of capture records kept in the snapshot.
pub const MAX_CAPTURES: usize = 100;

/// One finished round, as listed by `GET /api/captures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Total tick at which the capture happened.
    pub tick: u64,
    /// The round that ended.
    pub round_id: RoundId,
    /// Length of that round in ticks.
    pub round_ticks: u64,
    /// Distance at the moment of capture.
    pub distance: f64,
    /// The round that started next.
    pub next_round: RoundId,
    /// Wall-clock time of the capture.
    pub captured_at: DateTime<Utc>,
}

/// In-memory snapshot of the simulation served by REST endpoints.
#[derive(Debug, Clone)]
pub struct SimulationSnapshot {
    /// The most recent frame, if any tick has been published.
    pub frame: Option<Frame>,
    /// Board geometry, used to map pixel pointer input.
    pub board: Board,
    /// Boundary geometry.
    pub boundary: BoundaryView,
    /// Recent captures, oldest first.
    pub captures: Vec<CaptureRecord>,
}

impl SimulationSnapshot {
    /// Append a capture, keeping at most [`MAX_CAPTURES`].
    pub fn record_capture(&mut self, record: CaptureRecord) {
        self.captures.push(record);
        if self.captures.len() > MAX_CAPTURES {
            let excess = self.captures.len().saturating_sub(MAX_CAPTURES);
            self.captures.drain(..excess);
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for frames.
    pub tx: broadcast::Sender<Frame>,
    /// The current simulation snapshot (updated each tick).
    pub snapshot: Arc<RwLock<SimulationSnapshot>>,
    /// Shared operator control state (present when a simulation is running).
    pub operator_state: Option<Arc<OperatorState>>,
}

impl AppState {
    /// Create application state for `board` with no operator attached.
    pub fn new(board: Board, boundary: BoundaryView) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(SimulationSnapshot {
                frame: None,
                board,
                boundary,
                captures: Vec::new(),
            })),
            operator_state: None,
        }
    }

    /// Create application state with operator control attached.
    pub fn with_operator(board: Board, boundary: BoundaryView, operator: Arc<OperatorState>) -> Self {
        Self {
            operator_state: Some(operator),
            ..Self::new(board, boundary)
        }
    }

    /// The operator state, or [`ObserverError::Unavailable`] when the
    /// server runs without a simulation.
    pub fn operator(&self) -> Result<&Arc<OperatorState>, ObserverError> {
        self.operator_state
            .as_ref()
            .ok_or_else(|| ObserverError::Unavailable("operator state not available".to_owned()))
    }

    /// Subscribe to the frame broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.tx.subscribe()
    }

    /// Publish a frame to all connected clients.
    ///
    /// Returns the number of receivers; 0 when no client is connected.
    pub fn broadcast(&self, frame: &Frame) -> usize {
        // send only fails when there are no receivers.
        self.tx.send(frame.clone()).unwrap_or(0)
    }
}
