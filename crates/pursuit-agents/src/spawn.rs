//! Randomized agent spawning.
//!
//! On every reset both agents are replaced by fresh ones placed uniformly
//! inside the spawn region (`[-f * size, f * size]` per axis) with a random
//! starting velocity in `[-max_speed, max_speed]` per axis. The RNG is
//! passed in so callers choose between a seeded, reproducible stream and
//! OS entropy.

use pursuit_types::{Role, Vec2};
use pursuit_world::Board;
use rand::Rng;

use crate::agent::Agent;
use crate::config::{KinematicsConfig, SpawnConfig};
use crate::error::AgentError;

/// A freshly spawned chaser/runner pair.
#[derive(Debug, Clone)]
pub struct SpawnedPair {
    /// The new chaser.
    pub chaser: Agent,
    /// The new runner.
    pub runner: Agent,
}

/// Spawn a single agent for `role`.
///
/// # Errors
///
/// Returns [`AgentError`] if the spawn or kinematics configuration is
/// invalid.
pub fn spawn_agent(
    role: Role,
    board: &Board,
    kinematics: &KinematicsConfig,
    spawn: &SpawnConfig,
    rng: &mut impl Rng,
) -> Result<Agent, AgentError> {
    spawn.validate()?;

    let extent = board.size() * spawn.region_fraction;
    let position = Vec2::new(
        symmetric_sample(rng, extent),
        symmetric_sample(rng, extent),
    );
    let velocity = Vec2::new(
        symmetric_sample(rng, spawn.max_speed),
        symmetric_sample(rng, spawn.max_speed),
    );

    let color = match role {
        Role::Chaser => spawn.chaser_color.as_str(),
        Role::Runner => spawn.runner_color.as_str(),
    };

    Agent::new(role, position, velocity, kinematics, color)
}

/// Spawn both agents. The chaser is drawn from `rng` first.
///
/// # Errors
///
/// Returns [`AgentError`] if the spawn or kinematics configuration is
/// invalid.
pub fn spawn_pair(
    board: &Board,
    kinematics: &KinematicsConfig,
    spawn: &SpawnConfig,
    rng: &mut impl Rng,
) -> Result<SpawnedPair, AgentError> {
    let chaser = spawn_agent(Role::Chaser, board, kinematics, spawn, rng)?;
    let runner = spawn_agent(Role::Runner, board, kinematics, spawn, rng)?;
    Ok(SpawnedPair { chaser, runner })
}

/// Uniform sample from `[-extent, extent)`; zero when the range is empty.
fn symmetric_sample(rng: &mut impl Rng, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    rng.random_range(-extent..extent)
}
