//! Tick clock, steering policies, simulation step, and run loop for the
//! Pursuit simulation.
//!
//! # Modules
//!
//! - [`clock`] -- Total and per-round tick counters.
//! - [`config`] -- Loading `pursuit-config.yaml` into strongly-typed structs.
//! - [`policy`] -- [`SteeringPolicy`] implementations and the [`Predictor`]
//!   seam for the model-driven policy.
//! - [`tick`] -- The simulation step ([`run_tick`]) and [`SimulationState`].
//! - [`operator`] -- Shared control state for the observer API.
//! - [`runner`] -- The paced async run loop.
//!
//! [`SteeringPolicy`]: policy::SteeringPolicy
//! [`Predictor`]: policy::Predictor
//! [`run_tick`]: tick::run_tick
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod operator;
pub mod policy;
pub mod runner;
pub mod tick;
