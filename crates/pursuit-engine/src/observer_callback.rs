//! Tick callback that publishes to the observer.
//!
//! After each tick the current [`Frame`] is broadcast to `WebSocket`
//! clients and written into the [`SimulationSnapshot`] served over REST.
//! Captures are appended to the snapshot's capture list.
//!
//! [`Frame`]: pursuit_types::Frame
//! [`SimulationSnapshot`]: pursuit_observer::SimulationSnapshot

use std::sync::Arc;

use chrono::Utc;
use pursuit_core::runner::TickCallback;
use pursuit_core::tick::{SimulationState, TickOutcome, TickSummary};
use pursuit_observer::{AppState, CaptureRecord};
use tracing::debug;

/// Bridges the run loop to the observer.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a callback publishing into `state`.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    fn publish(&self, sim: &SimulationState, capture: Option<CaptureRecord>) {
        let frame = sim.frame();
        let receivers = self.state.broadcast(&frame);
        debug!(tick = frame.tick, receivers, "Frame broadcast sent");

        // Never block the run loop on REST readers. A skipped frame is
        // replaced next tick; a capture is written from a spawned task.
        match self.state.snapshot.try_write() {
            Ok(mut snap) => {
                snap.frame = Some(frame);
                if let Some(record) = capture {
                    snap.record_capture(record);
                }
            }
            Err(_) => {
                if let Some(record) = capture {
                    let snapshot = Arc::clone(&self.state.snapshot);
                    tokio::spawn(async move {
                        snapshot.write().await.record_capture(record);
                    });
                }
            }
        }
    }
}

impl TickCallback for ObserverCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &SimulationState) {
        let capture = match summary.outcome {
            TickOutcome::Captured {
                distance,
                round_ticks,
                next_round,
            } => Some(CaptureRecord {
                tick: summary.tick,
                round_id: summary.round_id,
                round_ticks,
                distance,
                next_round,
                captured_at: Utc::now(),
            }),
            TickOutcome::Running { .. } => None,
        };
        self.publish(sim, capture);
    }

    fn on_reset(&mut self, sim: &SimulationState) {
        self.publish(sim, None);
    }
}
