//! The async run loop.
//!
//! [`run_simulation`] is the frame scheduler. It wraps the single-tick
//! [`run_tick`] function and adds the control plane around it:
//!
//! - **Pacing**: sleeps `tick_interval_ms` between ticks (about 60 Hz by
//!   default), adjustable at runtime
//! - **Pause/resume** and **operator stop**
//! - **Operator reset**: respawn both agents before the next tick
//! - **Bounded runs**: stop after `max_ticks`, `max_captures` or
//!   `max_real_time_seconds`
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::policy::Predictor;
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Failure that aborts the run loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// [`run_tick`](crate::tick::run_tick) returned an error.
    #[error("tick error: {source}")]
    Tick {
        /// Source error.
        #[from]
        source: TickError,
    },
}

/// What a finished run reports.
#[derive(Debug)]
pub struct SimulationResult {
    /// Why the loop exited.
    pub end_reason: SimulationEndReason,
    /// Summary of the final tick; `None` if the loop never ticked.
    pub final_summary: Option<TickSummary>,
    /// Number of ticks executed by this run.
    pub total_ticks: u64,
    /// Captures at the end of the run.
    pub captures: u64,
}

/// Hook for publishing state out of the run loop.
///
/// The engine uses this to publish frames to the observer.
pub trait TickCallback: Send {
    /// After every successful tick, including capture ticks.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);

    /// Called after an operator reset. Defaults to doing nothing.
    fn on_reset(&mut self, _state: &SimulationState) {}
}

/// Callback that ignores everything. Used for headless runs and tests.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Tick `state` until a budget runs out or the operator stops the run.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    predictor: Option<&dyn Predictor>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        max_captures = operator.max_captures(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Simulation starting"
    );

    let end_reason = loop {
        if operator.is_paused() {
            info!(tick = state.clock.tick(), "Paused");
            operator.wait_if_paused().await;
            info!("Resumed");
        }

        if operator.is_stop_requested() {
            info!(tick = state.clock.tick(), "Stopping on operator request");
            break SimulationEndReason::OperatorStop;
        }

        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            break SimulationEndReason::MaxRealTimeReached;
        }

        if operator.take_reset_request() {
            let round = state.reset()?;
            info!(round = %round, "Operator reset, new round started");
            callback.on_reset(state);
        }

        let input = operator.tick_input();
        let summary = tick::run_tick(state, &input, predictor)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, state);
        last_summary = Some(summary);

        if operator.capture_limit_reached(state.captures) {
            info!(
                captures = state.captures,
                max_captures = operator.max_captures(),
                "Capture limit reached"
            );
            break SimulationEndReason::MaxCapturesReached;
        }

        // summary.tick is the tick that just completed, so max_ticks = 5
        // stops after the fifth tick.
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            break SimulationEndReason::MaxTicksReached;
        }

        // An unpaced run still yields so a stop request can land.
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    operator.set_end_reason(end_reason).await;
    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
        captures: state.captures,
    })
}

/// Emit the closing log lines for a finished run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        captures = result.captures,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            round = %summary.round_id,
            distance = summary.distance(),
            "Final tick summary"
        );
    } else {
        warn!("Run ended before the first tick");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pursuit_types::{PolicyKind, PolicySettings, Vec2};

    use super::*;
    use crate::config::{RunConfig, SimulationConfig};

    /// Seeded state plus an operator that does not sleep between ticks.
    fn setup(run: RunConfig) -> (SimulationState, Arc<OperatorState>) {
        let mut config = SimulationConfig::default();
        config.simulation.seed = Some(17);
        let state = SimulationState::from_config(&config).unwrap();
        let unpaced = RunConfig {
            tick_interval_ms: 0,
            ..run
        };
        let operator = Arc::new(OperatorState::new(&unpaced, PolicySettings::default()));
        (state, operator)
    }

    struct Counting {
        ticks: u64,
        resets: u64,
    }

    impl TickCallback for Counting {
        fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {
            self.ticks += 1;
        }

        fn on_reset(&mut self, _state: &SimulationState) {
            self.resets += 1;
        }
    }

    #[tokio::test]
    async fn stops_at_max_ticks() {
        let (mut state, operator) = setup(RunConfig {
            max_ticks: 5,
            ..RunConfig::default()
        });
        let mut callback = Counting {
            ticks: 0,
            resets: 0,
        };
        let result = run_simulation(&mut state, None, &operator, &mut callback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(callback.ticks, 5);
        assert_eq!(result.final_summary.unwrap().tick, 5);
        assert_eq!(
            operator.end_reason().await,
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[tokio::test]
    async fn stops_on_operator_request() {
        let (mut state, operator) = setup(RunConfig::default());
        operator.request_stop();
        let result = run_simulation(&mut state, None, &operator, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn unpaced_run_sees_stop_from_another_task() {
        let (mut state, operator) = setup(RunConfig {
            max_ticks: 200_000,
            ..RunConfig::default()
        });
        let stopper = {
            let operator = Arc::clone(&operator);
            tokio::spawn(async move { operator.request_stop() })
        };
        let result = run_simulation(&mut state, None, &operator, &mut NoOpCallback)
            .await
            .unwrap();
        stopper.await.unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert!(result.total_ticks < 200_000);
    }

    #[tokio::test]
    async fn stops_at_max_captures() {
        let (mut state, operator) = setup(RunConfig {
            max_captures: 1,
            max_ticks: 100_000,
            ..RunConfig::default()
        });
        // A chaser dropped onto the runner captures on the first tick.
        let kin = state.kinematics;
        state.chaser = pursuit_agents::Agent::new(
            pursuit_types::Role::Chaser,
            state.runner.position() + Vec2::new(1.0, 0.0),
            Vec2::ZERO,
            &kin,
            "#ff0000",
        )
        .unwrap();

        let result = run_simulation(&mut state, None, &operator, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::MaxCapturesReached);
        assert_eq!(result.captures, 1);
        assert_eq!(result.total_ticks, 1);
        assert!(result.final_summary.unwrap().is_capture());
    }

    #[tokio::test]
    async fn operator_reset_starts_new_round() {
        let (mut state, operator) = setup(RunConfig {
            max_ticks: 3,
            ..RunConfig::default()
        });
        let first_round = state.round_id;
        operator.request_reset();
        let mut callback = Counting {
            ticks: 0,
            resets: 0,
        };
        run_simulation(&mut state, None, &operator, &mut callback)
            .await
            .unwrap();
        assert_eq!(callback.resets, 1);
        assert_ne!(state.round_id, first_round);
    }

    #[tokio::test]
    async fn reads_settings_each_tick() {
        let (mut state, operator) = setup(RunConfig {
            max_ticks: 1,
            ..RunConfig::default()
        });
        operator.set_policy(pursuit_types::Role::Chaser, PolicyKind::Mouse);
        operator.set_pointer(state.chaser.position() + Vec2::new(0.0, 10.0));
        run_simulation(&mut state, None, &operator, &mut NoOpCallback)
            .await
            .unwrap();
        assert!((state.chaser.heading() - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[tokio::test]
    async fn paused_run_resumes() {
        let (mut state, operator) = setup(RunConfig {
            max_ticks: 2,
            ..RunConfig::default()
        });
        operator.pause();
        let resumer = {
            let operator = Arc::clone(&operator);
            tokio::spawn(async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
                operator.resume();
            })
        };
        let result = run_simulation(&mut state, None, &operator, &mut NoOpCallback)
            .await
            .unwrap();
        resumer.await.unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 2);
    }
}
