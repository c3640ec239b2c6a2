//! Configuration constants and defaults for agent kinematics and spawning.
//!
//! [`KinematicsConfig`] bundles the per-agent motion parameters and
//! [`SpawnConfig`] describes where and how fast fresh agents appear after a
//! reset. The engine builds both from `pursuit-config.yaml`; tests override
//! individual fields.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Motion parameters shared by both agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Maximum thrust added to velocity per tick (default: 0.1).
    #[serde(default = "default_strength")]
    pub strength: f64,

    /// Quadratic drag coefficient (default: 0.005).
    ///
    /// Each tick `drag * |v| * v` is removed from the velocity before
    /// thrust is added, so the terminal speed under full thrust is
    /// `sqrt(strength / drag)` (about 4.47 with the defaults).
    #[serde(default = "default_drag")]
    pub drag: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            drag: default_drag(),
        }
    }
}

impl KinematicsConfig {
    /// Check that the parameters describe a usable agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidStrength`] or [`AgentError::InvalidDrag`].
    pub fn validate(&self) -> Result<(), AgentError> {
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(AgentError::InvalidStrength(self.strength));
        }
        if !self.drag.is_finite() || self.drag < 0.0 {
            return Err(AgentError::InvalidDrag(self.drag));
        }
        Ok(())
    }
}

/// Where fresh agents are placed on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Spawn region half-width as a fraction of the board size
    /// (default: 1/3, i.e. `[-size/3, size/3]` per axis).
    #[serde(default = "default_region_fraction")]
    pub region_fraction: f64,

    /// Largest absolute starting velocity component (default: 2.0).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Display colour of the chaser (default: `#ff0000`).
    #[serde(default = "default_chaser_color")]
    pub chaser_color: String,

    /// Display colour of the runner (default: `#0000ff`).
    #[serde(default = "default_runner_color")]
    pub runner_color: String,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            region_fraction: default_region_fraction(),
            max_speed: default_max_speed(),
            chaser_color: default_chaser_color(),
            runner_color: default_runner_color(),
        }
    }
}

impl SpawnConfig {
    /// Check that the spawn region and speed range are usable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidSpawn`] describing the first problem.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !self.region_fraction.is_finite()
            || self.region_fraction <= 0.0
            || self.region_fraction > 0.5
        {
            return Err(AgentError::InvalidSpawn {
                reason: format!(
                    "region_fraction must be in (0, 0.5], got {}",
                    self.region_fraction
                ),
            });
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(AgentError::InvalidSpawn {
                reason: format!("max_speed must be >= 0, got {}", self.max_speed),
            });
        }
        Ok(())
    }
}

const fn default_strength() -> f64 {
    0.1
}

const fn default_drag() -> f64 {
    0.005
}

const fn default_region_fraction() -> f64 {
    1.0 / 3.0
}

const fn default_max_speed() -> f64 {
    2.0
}

fn default_chaser_color() -> String {
    String::from("#ff0000")
}

fn default_runner_color() -> String {
    String::from("#0000ff")
}
