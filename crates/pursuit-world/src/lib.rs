//! Board geometry and the boundary force field for the Pursuit simulation.
//!
//! Nothing in this crate holds mutable state. A [`Board`] and a
//! [`BoundaryField`] are built once from configuration and then shared
//! read-only by every tick.
//!
//! # Modules
//!
//! - [`board`] -- Board extent, capture distance, pointer coordinate
//!   transform and model normalization.
//! - [`boundary`] -- Soft ramp field that pushes agents away from the edges.
//! - [`error`] -- Construction errors.

pub mod board;
pub mod boundary;
pub mod error;

// Re-export primary types at crate root.
pub use board::{Board, DEFAULT_BOARD_SIZE, DEFAULT_CAPTURE_FRACTION};
pub use boundary::{BoundaryField, DEFAULT_RAMP_FRACTION, DEFAULT_RAMP_STRENGTH};
pub use error::WorldError;
