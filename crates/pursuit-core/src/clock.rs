//! Tick clock for the Pursuit simulation.
//!
//! Two counters are tracked. The total tick is monotonic across the whole
//! run and never resets; the round tick counts ticks since the last capture
//! and drives history sampling. Both use checked arithmetic.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// History interval of zero.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Total and per-round tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Ticks completed since the simulation started.
    tick: u64,
    /// Ticks completed since the current round started.
    round_tick: u64,
    /// Sample history every this many round ticks.
    history_interval: u64,
}

impl TickClock {
    /// Create a clock at tick 0 sampling history every `history_interval`
    /// round ticks.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `history_interval` is 0.
    pub fn new(history_interval: u64) -> Result<Self, ClockError> {
        if history_interval == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "history interval must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick: 0,
            round_tick: 0,
            history_interval,
        })
    }

    /// Ticks completed since the simulation started.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks completed in the current round.
    pub const fn round_tick(&self) -> u64 {
        self.round_tick
    }

    /// Configured history sampling interval.
    pub const fn history_interval(&self) -> u64 {
        self.history_interval
    }

    /// Whether the tick about to complete should record history
    /// (`round_tick % interval == 0`, so the first tick of a round does).
    pub const fn is_history_tick(&self) -> bool {
        self.round_tick % self.history_interval == 0
    }

    /// Count one completed tick in the current round.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if either counter would overflow.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let round_tick = self
            .round_tick
            .checked_add(1)
            .ok_or(ClockError::TickOverflow)?;
        self.tick = tick;
        self.round_tick = round_tick;
        Ok(tick)
    }

    /// Count one completed tick that ended the round. The total advances;
    /// the round tick restarts at 0. Returns the length of the finished
    /// round including this tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if either counter would overflow.
    pub fn finish_round(&mut self) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let round_ticks = self
            .round_tick
            .checked_add(1)
            .ok_or(ClockError::TickOverflow)?;
        self.tick = tick;
        self.round_tick = 0;
        Ok(round_ticks)
    }

    /// Restart the current round without counting a tick.
    pub const fn restart_round(&mut self) {
        self.round_tick = 0;
    }

    /// Create a clock from explicit counters (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `history_interval` is 0.
    pub fn from_parts(tick: u64, round_tick: u64, history_interval: u64) -> Result<Self, ClockError> {
        let mut clock = Self::new(history_interval)?;
        clock.tick = tick;
        clock.round_tick = round_tick;
        Ok(clock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_samples_first_tick() {
        let clock = TickClock::new(15).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.round_tick(), 0);
        assert!(clock.is_history_tick());
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(matches!(
            TickClock::new(0),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn samples_every_interval() {
        let mut clock = TickClock::new(15).unwrap();
        let mut sampled = Vec::new();
        for _ in 0..46 {
            if clock.is_history_tick() {
                sampled.push(clock.round_tick());
            }
            clock.advance().unwrap();
        }
        assert_eq!(sampled, vec![0, 15, 30, 45]);
        assert_eq!(clock.tick(), 46);
    }

    #[test]
    fn finish_round_resets_round_tick_only() {
        let mut clock = TickClock::new(15).unwrap();
        for _ in 0..7 {
            clock.advance().unwrap();
        }
        let round_ticks = clock.finish_round().unwrap();
        assert_eq!(round_ticks, 8);
        assert_eq!(clock.tick(), 8);
        assert_eq!(clock.round_tick(), 0);
        assert!(clock.is_history_tick());
    }

    #[test]
    fn restart_round_keeps_total() {
        let mut clock = TickClock::from_parts(100, 40, 15).unwrap();
        clock.restart_round();
        assert_eq!(clock.tick(), 100);
        assert_eq!(clock.round_tick(), 0);
    }

    #[test]
    fn overflow_is_detected() {
        let mut clock = TickClock::from_parts(u64::MAX, 0, 15).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert!(matches!(clock.finish_round(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }
}
