//! Observer API server for the pursuit simulation.
//!
//! - **`WebSocket`** (`/ws/frames`): one [`Frame`] per tick, plus pointer
//!   input from the client
//! - **REST**: latest frame, boundary geometry, recent captures
//! - **Input**: pointer position and per-agent policy settings
//! - **Operator**: pause, resume, reset, speed, status, stop
//! - **HTML** (`GET /`): a one-table status page
//!
//! The engine writes an in-memory [`SimulationSnapshot`] after every tick
//! and broadcasts the frame; handlers only read the snapshot and write to
//! the shared operator state, so a slow client never stalls the run loop.
//!
//! [`Frame`]: pursuit_types::Frame
//! [`SimulationSnapshot`]: state::SimulationSnapshot

pub mod error;
pub mod handlers;
pub mod input;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{ObserverHandle, StartupError, spawn_observer};
pub use state::{AppState, CaptureRecord, SimulationSnapshot};
