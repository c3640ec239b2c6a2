//! Shared type definitions for the Pursuit simulation.
//!
//! This crate is the single source of truth for the values that cross
//! crate and process boundaries. Render-facing types flow to `TypeScript`
//! via `ts-rs` for the canvas renderer.
//!
//! # Modules
//!
//! - [`vector`] -- [`Vec2`] for positions, velocities and accelerations
//! - [`ids`] -- Type-safe UUID wrappers ([`RoundId`])
//! - [`enums`] -- Roles, steering policy names, update ordering
//! - [`structs`] -- Agent snapshots, boundary geometry, render frames

pub mod enums;
pub mod ids;
pub mod structs;
pub mod vector;

// Re-export all public types at crate root for convenience.
pub use enums::{PolicyKind, Role, UpdateOrder};
pub use ids::RoundId;
pub use structs::{AgentFrame, AgentSnapshot, BoundaryView, BoundsRect, Frame, PolicySettings};
pub use vector::Vec2;
