//! Error types for the pursuit-agents crate.
//!
//! Kinematic updates never fail once an agent exists; these errors are
//! raised only when agents are built from bad parameters.

/// Errors that can occur when constructing or spawning agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Strength must be a positive finite number.
    #[error("invalid strength: {0} (must be > 0)")]
    InvalidStrength(f64),

    /// Drag must be a non-negative finite number.
    #[error("invalid drag coefficient: {0} (must be >= 0)")]
    InvalidDrag(f64),

    /// A starting position or velocity component is not finite.
    #[error("non-finite initial state for {role}: {field}")]
    NonFiniteState {
        /// Which agent was being built.
        role: pursuit_types::Role,
        /// `position` or `velocity`.
        field: &'static str,
    },

    /// The spawn parameters describe an empty or invalid region.
    #[error("invalid spawn configuration: {reason}")]
    InvalidSpawn {
        /// Explanation of what is wrong.
        reason: String,
    },
}
