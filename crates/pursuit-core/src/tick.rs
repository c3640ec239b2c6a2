//! Simulation step: one tick of the pursuit game.
//!
//! Each tick runs these stages for the chaser, then the runner:
//!
//! 1. **Steer** -- resolve the agent's [`PolicyKind`] and apply its decision
//!    (or re-apply the previous throttle on a no-op).
//! 2. **Thrust** -- drag then thrust along the heading.
//! 3. **Boundary** -- add the ramp field's push to velocity.
//!
//! Both positions are then integrated and the distance checked. A distance
//! below the board's capture radius ends the round: both agents are
//! respawned and a new [`RoundId`] begins. Otherwise, on every
//! `history.interval`-th round tick, both agents record a snapshot.
//!
//! With [`UpdateOrder::Sequential`] the runner's policy sees the chaser's
//! heading and velocity from this tick; with [`UpdateOrder::Simultaneous`]
//! both policies see the pre-tick state.
//!
//! [`PolicyKind`]: pursuit_types::PolicyKind

use pursuit_agents::{Agent, AgentError, KinematicsConfig, SpawnConfig, spawn_pair};
use pursuit_types::{Frame, PolicySettings, RoundId, UpdateOrder, Vec2};
use pursuit_world::{Board, BoundaryField};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, TickClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::policy::{Aim, PolicyContext, Predictor, Steering, SteeringPolicy, policy_for};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Respawning the agents after a round ended failed.
    #[error("respawn failed: {source}")]
    Spawn {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// Caller-owned inputs for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position in board coordinates (for `mouse`).
    pub pointer: Vec2,
    /// Policy per agent.
    pub settings: PolicySettings,
}

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The chase continues.
    Running {
        /// Distance between the agents after integration.
        distance: f64,
    },
    /// The chaser caught the runner; the agents have already been
    /// respawned.
    Captured {
        /// Distance at the moment of capture.
        distance: f64,
        /// Length of the finished round in ticks.
        round_ticks: u64,
        /// The round that starts on the next tick.
        next_round: RoundId,
    },
}

/// Summary of a completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickSummary {
    /// Total ticks completed, including this one.
    pub tick: u64,
    /// The round this tick belonged to.
    pub round_id: RoundId,
    /// Running or captured.
    pub outcome: TickOutcome,
    /// Whether both agents recorded a history snapshot this tick.
    pub history_recorded: bool,
}

impl TickSummary {
    /// Distance between the agents at the end of the tick.
    pub const fn distance(&self) -> f64 {
        match self.outcome {
            TickOutcome::Running { distance } | TickOutcome::Captured { distance, .. } => distance,
        }
    }

    /// Whether this tick ended a round.
    pub const fn is_capture(&self) -> bool {
        matches!(self.outcome, TickOutcome::Captured { .. })
    }
}

/// Complete mutable state of a running simulation.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Total and per-round tick counters.
    pub clock: TickClock,
    /// Identifier of the current round.
    pub round_id: RoundId,
    /// Captures since the simulation started.
    pub captures: u64,
    /// Board geometry and capture radius.
    pub board: Board,
    /// Soft boundary field.
    pub boundary: BoundaryField,
    /// Kinematics handed to respawned agents.
    pub kinematics: KinematicsConfig,
    /// Spawn region for respawned agents.
    pub spawn: SpawnConfig,
    /// Whether the runner sees the chaser's update from the same tick.
    pub update_order: UpdateOrder,
    /// The pursuer.
    pub chaser: Agent,
    /// The evader.
    pub runner: Agent,
    /// Spawn randomness.
    pub rng: SmallRng,
}

impl SimulationState {
    /// Build a fresh simulation from configuration. The RNG is seeded from
    /// `simulation.seed` when present, otherwise from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration does not validate.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = config.board()?;
        let boundary = config.boundary_field()?;
        let clock = TickClock::new(config.history.interval).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        let mut rng = config
            .simulation
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);

        let kinematics = config.agents.kinematics;
        let spawn = config.agents.spawn.clone();
        let pair = spawn_pair(&board, &kinematics, &spawn, &mut rng)?;

        let round_id = RoundId::new();
        info!(
            round = %round_id,
            board_size = board.size(),
            capture_distance = board.capture_distance(),
            seed = ?config.simulation.seed,
            "Simulation state initialized"
        );

        Ok(Self {
            clock,
            round_id,
            captures: 0,
            board,
            boundary,
            kinematics,
            spawn,
            update_order: config.policies.update_order,
            chaser: pair.chaser,
            runner: pair.runner,
            rng,
        })
    }

    /// Respawn both agents and start a new round. The total tick and the
    /// capture count are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Spawn`] if the spawn configuration is invalid.
    pub fn reset(&mut self) -> Result<RoundId, TickError> {
        let pair = spawn_pair(&self.board, &self.kinematics, &self.spawn, &mut self.rng)?;
        self.chaser = pair.chaser;
        self.runner = pair.runner;
        self.clock.restart_round();
        self.round_id = RoundId::new();
        debug!(round = %self.round_id, "New round started");
        Ok(self.round_id)
    }

    /// Current distance between the agents.
    pub fn distance(&self) -> f64 {
        self.chaser.distance_to(&self.runner)
    }

    /// Render-facing view of the current state.
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.clock.tick(),
            round_id: self.round_id,
            round_tick: self.clock.round_tick(),
            captures: self.captures,
            distance: self.distance(),
            chaser: self.chaser.frame(),
            runner: self.runner.frame(),
            boundary: self.boundary.view(),
        }
    }
}

/// Execute one tick of the simulation.
///
/// `predictor` backs the `automatic` policy; without one that policy is a
/// no-op.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow, or
/// [`TickError::Spawn`] if respawning after a capture fails.
pub fn run_tick(
    state: &mut SimulationState,
    input: &TickInput,
    predictor: Option<&dyn Predictor>,
) -> Result<TickSummary, TickError> {
    let ctx = PolicyContext {
        pointer: input.pointer,
        board: &state.board,
        predictor,
    };
    let chaser_policy = policy_for(input.settings.chaser);
    let runner_policy = policy_for(input.settings.runner);

    match state.update_order {
        UpdateOrder::Sequential => {
            let decision = decide(chaser_policy, &state.chaser, &state.runner, &ctx);
            steer(&mut state.chaser, decision, &state.boundary);
            let decision = decide(runner_policy, &state.runner, &state.chaser, &ctx);
            steer(&mut state.runner, decision, &state.boundary);
        }
        UpdateOrder::Simultaneous => {
            let chaser_decision = decide(chaser_policy, &state.chaser, &state.runner, &ctx);
            let runner_decision = decide(runner_policy, &state.runner, &state.chaser, &ctx);
            steer(&mut state.chaser, chaser_decision, &state.boundary);
            steer(&mut state.runner, runner_decision, &state.boundary);
        }
    }

    state.chaser.update();
    state.runner.update();

    let distance = state.distance();
    let round_id = state.round_id;

    if state.board.is_capture(distance) {
        let round_ticks = state.clock.finish_round()?;
        state.captures = state.captures.saturating_add(1);
        info!(
            tick = state.clock.tick(),
            round = %round_id,
            round_ticks,
            distance,
            captures = state.captures,
            "Gotcha"
        );
        let next_round = state.reset()?;
        return Ok(TickSummary {
            tick: state.clock.tick(),
            round_id,
            outcome: TickOutcome::Captured {
                distance,
                round_ticks,
                next_round,
            },
            history_recorded: false,
        });
    }

    let history_recorded = state.clock.is_history_tick();
    if history_recorded {
        state.chaser.record_history();
        state.runner.record_history();
    }

    let tick = state.clock.advance()?;
    debug!(tick, round = %round_id, distance, history_recorded, "Tick completed");

    Ok(TickSummary {
        tick,
        round_id,
        outcome: TickOutcome::Running { distance },
        history_recorded,
    })
}

fn decide(
    policy: Option<&dyn SteeringPolicy>,
    me: &Agent,
    other: &Agent,
    ctx: &PolicyContext<'_>,
) -> Option<Steering> {
    policy.and_then(|p| p.decide(me, other, ctx))
}

/// Apply a decision, thrust, and the boundary push to one agent.
fn steer(agent: &mut Agent, decision: Option<Steering>, boundary: &BoundaryField) {
    let rate = match decision {
        Some(steering) => {
            match steering.aim {
                Aim::Toward(target) => agent.set_heading_towards(target),
                Aim::Heading(radians) => agent.set_heading(radians),
            }
            steering.rate
        }
        None => agent.throttle(),
    };
    agent.accelerate(rate);
    agent.apply_boundary(boundary);
}
