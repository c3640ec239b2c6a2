//! Enumeration types for the Pursuit simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Which side of the chase an agent is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// The pursuer. A capture ends the round in its favour.
    Chaser,
    /// The evader.
    Runner,
}

impl Role {
    /// Both roles in update order.
    pub const ALL: [Self; 2] = [Self::Chaser, Self::Runner];

    /// The opposing role.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Chaser => Self::Runner,
            Self::Runner => Self::Chaser,
        }
    }

    /// Lowercase name used in logs and settings payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chaser => "chaser",
            Self::Runner => "runner",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Steering policy selection
// ---------------------------------------------------------------------------

/// Steering policy selected for one agent.
///
/// Settings arrive as free-form strings from the input collaborator. Any
/// value that is not one of the known names deserializes to
/// [`PolicyKind::Unrecognized`], which steers nothing: the agent keeps the
/// heading and throttle it had on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Head straight at the opponent's current position.
    Chase,
    /// Head at the pointer supplied by the input collaborator.
    Mouse,
    /// Flee roughly perpendicular to the bearing of the opponent.
    Dodge,
    /// Flee radially, directly away from the opponent.
    Run,
    /// Defer to the external model collaborator.
    Automatic,
    /// Unknown setting; leaves the agent's steering untouched.
    #[serde(other)]
    Unrecognized,
}

impl PolicyKind {
    /// Parse a settings string. Unknown names map to
    /// [`PolicyKind::Unrecognized`] rather than failing.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "chase" => Self::Chase,
            "mouse" => Self::Mouse,
            "dodge" => Self::Dodge,
            "run" => Self::Run,
            "automatic" => Self::Automatic,
            _ => Self::Unrecognized,
        }
    }

    /// Canonical settings name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chase => "chase",
            Self::Mouse => "mouse",
            Self::Dodge => "dodge",
            Self::Run => "run",
            Self::Automatic => "automatic",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl core::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Update ordering
// ---------------------------------------------------------------------------

/// How the two agents' policies observe each other within one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// The chaser steers and accelerates first; the runner's policy then
    /// sees the chaser's already-updated heading and velocity (positions
    /// are integrated for both at the end of the tick).
    #[default]
    Sequential,
    /// Both policies read a copy of the pre-tick state.
    Simultaneous,
}
