//! The live, mutable agent and its kinematics.
//!
//! An [`Agent`] is mutated once per tick in a fixed order:
//!
//! 1. a steering decision sets the heading ([`Agent::set_heading_towards`]
//!    or [`Agent::set_heading`]);
//! 2. [`Agent::accelerate`] applies quadratic drag, then thrust along the
//!    heading;
//! 3. [`Agent::apply_boundary`] adds the boundary field's push;
//! 4. [`Agent::update`] integrates position with a unit time step.
//!
//! Thrust uses a normalized rate in `[-1, 1]` scaled by the agent's
//! strength. The absolute-magnitude form survives as
//! [`Agent::accelerate_absolute`] for callers that think in raw
//! acceleration; it clamps to the strength and logs a diagnostic.

use pursuit_types::{AgentFrame, AgentSnapshot, Role, Vec2};
use pursuit_world::{Board, BoundaryField};
use tracing::warn;

use crate::config::KinematicsConfig;
use crate::error::AgentError;
use crate::history::HistoryRing;

/// Divisor applied to velocity components in the model export.
pub const MODEL_VELOCITY_DIVISOR: f64 = 5.0;

/// Number of features one agent contributes to the model input.
pub const AGENT_FEATURES: usize = 4;

/// One of the two agents on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Chaser or runner.
    role: Role,
    /// Current position in board units.
    position: Vec2,
    /// Current velocity in board units per tick.
    velocity: Vec2,
    /// Maximum thrust per tick.
    strength: f64,
    /// Heading in radians.
    heading: f64,
    /// Quadratic drag coefficient.
    drag: f64,
    /// Last normalized thrust rate applied.
    throttle: f64,
    /// Opaque display identifier.
    color: String,
    /// Trail of past snapshots.
    history: HistoryRing,
}

impl Agent {
    /// Create an agent at rest heading along `+x` with full throttle.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidStrength`] / [`AgentError::InvalidDrag`]
    /// for bad kinematics, or [`AgentError::NonFiniteState`] if the starting
    /// position or velocity contains NaN or infinity.
    pub fn new(
        role: Role,
        position: Vec2,
        velocity: Vec2,
        kinematics: &KinematicsConfig,
        color: impl Into<String>,
    ) -> Result<Self, AgentError> {
        kinematics.validate()?;
        if !position.is_finite() {
            return Err(AgentError::NonFiniteState {
                role,
                field: "position",
            });
        }
        if !velocity.is_finite() {
            return Err(AgentError::NonFiniteState {
                role,
                field: "velocity",
            });
        }

        Ok(Self {
            role,
            position,
            velocity,
            strength: kinematics.strength,
            heading: 0.0,
            drag: kinematics.drag,
            throttle: 1.0,
            color: color.into(),
            history: HistoryRing::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Chaser or runner.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Current position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current speed (`|velocity|`).
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Heading in radians.
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Maximum thrust per tick.
    pub const fn strength(&self) -> f64 {
        self.strength
    }

    /// Quadratic drag coefficient.
    pub const fn drag(&self) -> f64 {
        self.drag
    }

    /// Normalized thrust applied on the most recent tick.
    pub const fn throttle(&self) -> f64 {
        self.throttle
    }

    /// Display colour.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Trail of past snapshots.
    pub const fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.position.distance(other.position)
    }

    // -----------------------------------------------------------------------
    // Steering
    // -----------------------------------------------------------------------

    /// Point the heading at `target`.
    ///
    /// A target equal to the current position yields `atan2(0, 0) = 0`.
    pub fn set_heading_towards(&mut self, target: Vec2) {
        self.heading = (target - self.position).angle();
    }

    /// Override the heading directly.
    pub const fn set_heading(&mut self, radians: f64) {
        self.heading = radians;
    }

    // -----------------------------------------------------------------------
    // Kinematics
    // -----------------------------------------------------------------------

    /// Apply one tick of drag followed by thrust at normalized `rate`.
    ///
    /// `|rate|` is clamped to 1 keeping its sign, so thrust never exceeds
    /// the agent's strength. A non-finite rate is treated as zero thrust.
    pub fn accelerate(&mut self, rate: f64) {
        self.apply_drag();

        let rate = if !rate.is_finite() {
            0.0
        } else if rate.abs() > 1.0 {
            rate.signum()
        } else {
            rate
        };

        self.throttle = rate;
        self.velocity += Vec2::from_angle(self.heading) * (self.strength * rate);
    }

    /// Apply one tick of drag followed by thrust of absolute `magnitude`.
    ///
    /// Magnitudes above the agent's strength are clamped and reported with
    /// a warning. Prefer [`Agent::accelerate`].
    pub fn accelerate_absolute(&mut self, magnitude: f64) {
        self.apply_drag();

        let magnitude = if !magnitude.is_finite() {
            0.0
        } else if magnitude.abs() > self.strength {
            warn!(
                role = %self.role,
                requested = magnitude,
                strength = self.strength,
                "Requested acceleration exceeds strength, clamping"
            );
            self.strength.copysign(magnitude)
        } else {
            magnitude
        };

        self.throttle = magnitude / self.strength;
        self.velocity += Vec2::from_angle(self.heading) * magnitude;
    }

    /// Subtract `drag * |v| * v`.
    ///
    /// The factor is floored at zero so drag can stop the agent but never
    /// reverse it, even for speeds far beyond the drag/thrust equilibrium.
    fn apply_drag(&mut self) {
        let speed = self.velocity.length();
        let retained = (1.0 - self.drag * speed).max(0.0);
        self.velocity = self.velocity * retained;
    }

    /// Add the boundary field's push at the current position to velocity.
    pub fn apply_boundary(&mut self, field: &BoundaryField) {
        self.velocity += field.acceleration(self.position);
    }

    /// Integrate position: `position += velocity`.
    pub fn update(&mut self) {
        self.position += self.velocity;
    }

    // -----------------------------------------------------------------------
    // Snapshots and export
    // -----------------------------------------------------------------------

    /// Deep copy of the current motion state.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            velocity: self.velocity,
            heading: self.heading,
            strength: self.strength,
            color: self.color.clone(),
        }
    }

    /// Push a snapshot of the current state into the history trail.
    pub fn record_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    /// Model features: position scaled to `[-1, 1]` by the half board and
    /// velocity divided by [`MODEL_VELOCITY_DIVISOR`].
    pub fn export(&self, board: &Board) -> [f64; AGENT_FEATURES] {
        let p = board.normalize(self.position);
        [
            p.x,
            p.y,
            self.velocity.x / MODEL_VELOCITY_DIVISOR,
            self.velocity.y / MODEL_VELOCITY_DIVISOR,
        ]
    }

    /// Render-facing view including the history trail.
    pub fn frame(&self) -> AgentFrame {
        AgentFrame {
            role: self.role,
            position: self.position,
            velocity: self.velocity,
            heading: self.heading,
            color: self.color.clone(),
            history: self.history.to_vec(),
        }
    }
}
