//! Agent kinematics, history trails and spawning for the Pursuit simulation.
//!
//! This crate contains everything that operates on a single agent without
//! knowing about the tick loop. It sits between `pursuit-types` (plain data)
//! and `pursuit-core` (orchestration).
//!
//! # Modules
//!
//! - [`agent`] -- The live [`Agent`]: heading, drag, thrust, integration,
//!   snapshots and model export.
//! - [`config`] -- Tunable parameters ([`KinematicsConfig`], [`SpawnConfig`]).
//! - [`error`] -- Construction errors ([`AgentError`]).
//! - [`history`] -- The fixed-depth [`HistoryRing`] trail.
//! - [`spawn`] -- Randomized placement of fresh agents.

pub mod agent;
pub mod config;
pub mod error;
pub mod history;
pub mod spawn;

pub use agent::{AGENT_FEATURES, Agent, MODEL_VELOCITY_DIVISOR};
pub use config::{KinematicsConfig, SpawnConfig};
pub use error::AgentError;
pub use history::{HISTORY_CAPACITY, HistoryRing};
pub use spawn::{SpawnedPair, spawn_agent, spawn_pair};
