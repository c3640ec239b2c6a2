//! Plain data structs shared between the simulation core and the render
//! and input collaborators.
//!
//! Everything here is an immutable value: the live, mutable agent lives in
//! `pursuit-agents` and is never handed to a collaborator directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PolicyKind, Role};
use crate::ids::RoundId;
use crate::vector::Vec2;

// ---------------------------------------------------------------------------
// Agent snapshots
// ---------------------------------------------------------------------------

/// Frozen copy of an agent's motion state at one tick.
///
/// Snapshots are deep copies: mutating the live agent afterwards never
/// changes a recorded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// Position at capture time.
    pub position: Vec2,
    /// Velocity at capture time.
    pub velocity: Vec2,
    /// Heading in radians.
    pub heading: f64,
    /// Maximum acceleration per tick.
    pub strength: f64,
    /// Opaque display identifier (a `#rrggbb` colour by default).
    pub color: String,
}

// ---------------------------------------------------------------------------
// Boundary geometry
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle in board coordinates (`top < bottom`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundsRect {
    /// Smallest `y`.
    pub top: f64,
    /// Largest `x`.
    pub right: f64,
    /// Largest `y`.
    pub bottom: f64,
    /// Smallest `x`.
    pub left: f64,
}

impl BoundsRect {
    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }
}

/// Boundary field geometry the renderer needs to shade the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundaryView {
    /// The safe-zone rectangle.
    pub bounds: BoundsRect,
    /// Width of the ramp band inside each edge.
    pub ramp_width: f64,
    /// Steepness of the hyperbolic ramp.
    pub ramp_strength: f64,
    /// Largest push the ramp can apply per tick.
    pub max_push: f64,
}

// ---------------------------------------------------------------------------
// Frames (render collaborator feed)
// ---------------------------------------------------------------------------

/// One agent as the renderer sees it for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentFrame {
    /// Chaser or runner.
    pub role: Role,
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Current heading in radians (arrow rotation).
    pub heading: f64,
    /// Display colour.
    pub color: String,
    /// Trail snapshots, oldest first.
    pub history: Vec<AgentSnapshot>,
}

/// Everything the render collaborator draws for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Frame {
    /// Monotonic tick number across all rounds.
    pub tick: u64,
    /// Current round.
    pub round_id: RoundId,
    /// Ticks elapsed in the current round.
    pub round_tick: u64,
    /// Captures since the simulation started.
    pub captures: u64,
    /// Distance between the agents after this tick.
    pub distance: f64,
    /// The chaser.
    pub chaser: AgentFrame,
    /// The runner.
    pub runner: AgentFrame,
    /// Boundary geometry.
    pub boundary: BoundaryView,
}

// ---------------------------------------------------------------------------
// Settings (input collaborator)
// ---------------------------------------------------------------------------

/// Policy selection for both agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Policy steering the chaser.
    pub chaser: PolicyKind,
    /// Policy steering the runner.
    pub runner: PolicyKind,
}

impl PolicySettings {
    /// Policy selected for `role`.
    pub const fn for_role(&self, role: Role) -> PolicyKind {
        match role {
            Role::Chaser => self.chaser,
            Role::Runner => self.runner,
        }
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            chaser: PolicyKind::Chase,
            runner: PolicyKind::Dodge,
        }
    }
}
