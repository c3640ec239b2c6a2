//! Operator control state shared between the run loop and the observer API.
//!
//! Control flags (pause, stop, reset, tick speed) are atomics so the run
//! loop reads them without locking. The pointer position and the policy
//! settings are last-value-wins [`watch`] channels: the input handlers
//! overwrite them at any rate and the run loop reads each once at the start
//! of a tick.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use pursuit_types::{PolicyKind, PolicySettings, Role, Vec2};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify, watch};

use crate::config::RunConfig;
use crate::tick::TickInput;

/// Why [`run_simulation`](crate::runner::run_simulation) returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// `max_ticks` ticks have run.
    MaxTicksReached,
    /// `max_captures` rounds have ended in a capture.
    MaxCapturesReached,
    /// `max_real_time_seconds` of wall-clock time have passed.
    MaxRealTimeReached,
    /// Stopped through the operator API or `Ctrl-C`.
    OperatorStop,
}

/// Control plane shared by the run loop and the HTTP handlers.
///
/// Wrapped in [`Arc`](std::sync::Arc) and shared between the run loop and
/// the observer's handlers.
#[derive(Debug)]
pub struct OperatorState {
    /// Set while the run loop should idle.
    paused: AtomicBool,

    /// Notification used to wake the run loop when resumed.
    resume_notify: Notify,

    /// Set once; the loop exits before its next tick.
    stop_requested: AtomicBool,

    /// Whether a new round has been requested.
    reset_requested: AtomicBool,

    /// Sleep between ticks, changed at runtime by the speed endpoint.
    tick_interval_ms: AtomicU64,

    /// When this state was created.
    started_at: DateTime<Utc>,

    /// Tick budget, 0 for none.
    max_ticks: u64,

    /// Capture budget, 0 for none.
    max_captures: u64,

    /// Wall-clock budget in seconds, 0 for none.
    max_real_time_seconds: u64,

    /// Latest pointer position in board coordinates.
    pointer: watch::Sender<Vec2>,

    /// Latest policy selection.
    settings: watch::Sender<PolicySettings>,

    /// Filled in once by the run loop on exit.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Smallest accepted tick interval.
    pub const MIN_TICK_INTERVAL_MS: u64 = 1;

    /// Create operator state from the run configuration and the initial
    /// policy selection.
    pub fn new(run: &RunConfig, settings: PolicySettings) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            reset_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(run.tick_interval_ms),
            started_at: Utc::now(),
            max_ticks: run.max_ticks,
            max_captures: run.max_captures,
            max_real_time_seconds: run.max_real_time_seconds,
            pointer: watch::Sender::new(Vec2::ZERO),
            settings: watch::Sender::new(settings),
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether a pause is in effect.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The run loop sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the run loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Block the run loop while paused. Returns at once when not paused,
    /// and also on a stop request.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop / Reset
    // -----------------------------------------------------------------------

    /// Ask the loop to exit. Wakes a paused loop so it can see the flag.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Whether [`Self::request_stop`] has been called.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Ask the run loop to respawn both agents before the next tick.
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    /// Consume a pending reset request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    /// Store the exit reason for the status endpoint.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Exit reason, `None` while the loop is still running.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Milliseconds slept between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// is below [`Self::MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < Self::MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Publish a new pointer position (board coordinates).
    pub fn set_pointer(&self, position: Vec2) {
        self.pointer.send_replace(position);
    }

    /// Latest pointer position.
    pub fn pointer(&self) -> Vec2 {
        *self.pointer.borrow()
    }

    /// Change the policy of one agent.
    pub fn set_policy(&self, role: Role, kind: PolicyKind) {
        self.settings.send_modify(|settings| match role {
            Role::Chaser => settings.chaser = kind,
            Role::Runner => settings.runner = kind,
        });
    }

    /// Latest policy selection.
    pub fn settings(&self) -> PolicySettings {
        *self.settings.borrow()
    }

    /// Snapshot the pointer and settings for the next tick.
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            pointer: self.pointer(),
            settings: self.settings(),
        }
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Whether `current_tick` has used up a non-zero tick budget.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Whether `captures` has used up a non-zero capture budget.
    pub const fn capture_limit_reached(&self, captures: u64) -> bool {
        self.max_captures > 0 && captures >= self.max_captures
    }

    /// Whether a non-zero wall-clock budget has run out.
    pub fn time_limit_reached(&self) -> bool {
        if self.max_real_time_seconds == 0 {
            return false;
        }
        self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Creation time of this state.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since [`Self::started_at`].
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // Clock skew can make this negative.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Tick budget (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Capture budget (0 = unlimited).
    pub const fn max_captures(&self) -> u64 {
        self.max_captures
    }

    /// Wall-clock budget in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }
}

/// Body of `GET /api/operator/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Total ticks run, taken from the latest frame.
    pub tick: u64,
    /// Captures so far.
    pub captures: u64,
    /// Pause flag.
    pub paused: bool,
    /// Stop flag.
    pub stop_requested: bool,
    /// Sleep between ticks.
    pub tick_interval_ms: u64,
    /// Seconds since start.
    pub elapsed_seconds: u64,
    /// Tick budget (0 = unlimited).
    pub max_ticks: u64,
    /// Configured maximum captures (0 = unlimited).
    pub max_captures: u64,
    /// Configured maximum real-time seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
    /// Current policy selection.
    pub settings: PolicySettings,
    /// Set once the loop has exited.
    pub end_reason: Option<SimulationEndReason>,
    /// Start time, RFC 3339.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config(max_ticks: u64, max_captures: u64) -> RunConfig {
        RunConfig {
            max_ticks,
            max_captures,
            ..RunConfig::default()
        }
    }

    fn operator() -> OperatorState {
        OperatorState::new(&run_config(0, 0), PolicySettings::default())
    }

    #[test]
    fn fresh_state_runs_at_configured_pace() {
        let state = operator();
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
        assert_eq!(state.tick_interval_ms(), 16);
    }

    #[test]
    fn pause_and_resume() {
        let state = operator();
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn stop_request() {
        let state = operator();
        state.request_stop();
        assert!(state.is_stop_requested());
    }

    #[test]
    fn reset_request_is_consumed_once() {
        let state = operator();
        assert!(!state.take_reset_request());
        state.request_reset();
        assert!(state.take_reset_request());
        assert!(!state.take_reset_request());
    }

    #[test]
    fn set_tick_interval() {
        let state = operator();
        assert_eq!(state.set_tick_interval_ms(100), Some(16));
        assert_eq!(state.tick_interval_ms(), 100);
        assert_eq!(state.set_tick_interval_ms(0), None);
        assert_eq!(state.tick_interval_ms(), 100);
    }

    #[test]
    fn limits_zero_mean_unlimited() {
        let state = operator();
        assert!(!state.tick_limit_reached(999_999));
        assert!(!state.capture_limit_reached(999_999));
        assert!(!state.time_limit_reached());
    }

    #[test]
    fn limits_reached() {
        let state = OperatorState::new(&run_config(100, 2), PolicySettings::default());
        assert!(!state.tick_limit_reached(99));
        assert!(state.tick_limit_reached(100));
        assert!(!state.capture_limit_reached(1));
        assert!(state.capture_limit_reached(2));
    }

    #[test]
    fn pointer_and_settings_are_last_value_wins() {
        let state = operator();
        state.set_pointer(Vec2::new(1.0, 2.0));
        state.set_pointer(Vec2::new(3.0, 4.0));
        state.set_policy(Role::Runner, PolicyKind::Run);

        let input = state.tick_input();
        assert_eq!(input.pointer, Vec2::new(3.0, 4.0));
        assert_eq!(input.settings.chaser, PolicyKind::Chase);
        assert_eq!(input.settings.runner, PolicyKind::Run);
    }

    #[tokio::test]
    async fn end_reason_round_trip() {
        let state = operator();
        assert!(state.end_reason().await.is_none());
        state.set_end_reason(SimulationEndReason::OperatorStop).await;
        assert_eq!(
            state.end_reason().await,
            Some(SimulationEndReason::OperatorStop)
        );
    }

    #[tokio::test]
    async fn stop_wakes_paused_waiter() {
        let state = std::sync::Arc::new(operator());
        state.pause();
        let waiter = {
            let state = std::sync::Arc::clone(&state);
            tokio::spawn(async move { state.wait_if_paused().await })
        };
        state.request_stop();
        assert!(waiter.await.is_ok());
    }
}
