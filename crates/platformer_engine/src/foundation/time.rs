//! Time management utilities

use crate::config::ConfigError;
use std::time::{Duration, Instant};

/// Countdown driven by simulation time
///
/// Used for fire cooldowns and invulnerability windows. The cooldown only
/// advances through [`Cooldown::update`], so it follows the fixed simulation
/// step rather than wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f32,
    elapsed: f32,
}

impl Cooldown {
    /// Create a cooldown of `duration` seconds, initially running
    pub fn new(duration: f32) -> Self {
        Self { duration, elapsed: 0.0 }
    }

    /// Create a cooldown from milliseconds, initially finished
    pub fn finished_millis(millis: u64) -> Self {
        let mut cooldown = Self::new(Duration::from_millis(millis).as_secs_f32());
        cooldown.finish();
        cooldown
    }

    /// Advance by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        if !self.is_finished() {
            self.elapsed = (self.elapsed + delta_time).min(self.duration);
        }
    }

    /// Restart the countdown from zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Jump to the end of the countdown
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    /// Whether the full duration has elapsed
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Seconds left before the cooldown finishes
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Fixed-timestep accumulator for the main loop
///
/// Wall-clock time is accumulated with [`FixedTimestep::advance`] and drained
/// in whole simulation steps with [`FixedTimestep::consume_step`].
pub struct FixedTimestep {
    step: Duration,
    last_frame: Instant,
    accumulated: Duration,
    step_count: u64,
}

impl FixedTimestep {
    /// Create an accumulator producing steps of `step_seconds`
    ///
    /// The step must be a finite, positive, non-vanishing duration.
    pub fn new(step_seconds: f32) -> Result<Self, ConfigError> {
        let step = Duration::try_from_secs_f32(step_seconds)
            .ok()
            .filter(|step| !step.is_zero())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "timestep".to_string(),
                value: step_seconds,
            })?;
        Ok(Self {
            step,
            last_frame: Instant::now(),
            accumulated: Duration::ZERO,
            step_count: 0,
        })
    }

    /// Add wall-clock time elapsed since the previous call
    pub fn advance(&mut self) {
        let now = Instant::now();
        self.accumulated += now.duration_since(self.last_frame);
        self.last_frame = now;
    }

    /// Add an explicit amount of time (headless runs and tests)
    pub fn advance_by(&mut self, elapsed: Duration) {
        self.accumulated += elapsed;
    }

    /// Take one step out of the accumulator if enough time is banked
    pub fn consume_step(&mut self) -> bool {
        if self.accumulated >= self.step {
            self.accumulated -= self.step;
            self.step_count += 1;
            true
        } else {
            false
        }
    }

    /// Step length
    pub fn step_duration(&self) -> Duration {
        self.step
    }

    /// Step length in seconds
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Number of steps consumed so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_finishes_after_duration() {
        let mut cooldown = Cooldown::new(0.5);
        assert!(!cooldown.is_finished());

        cooldown.update(0.25);
        assert!(!cooldown.is_finished());

        cooldown.update(0.25);
        assert!(cooldown.is_finished());
        assert_eq!(cooldown.remaining(), 0.0);
    }

    #[test]
    fn test_finished_millis_starts_finished() {
        let mut cooldown = Cooldown::finished_millis(200);
        assert!(cooldown.is_finished());

        cooldown.reset();
        assert!(!cooldown.is_finished());
    }

    #[test]
    fn test_fixed_timestep_drains_whole_steps() {
        let mut timestep = FixedTimestep::new(0.5).expect("valid step");
        timestep.advance_by(Duration::from_millis(1250));

        assert!(timestep.consume_step());
        assert!(timestep.consume_step());
        assert!(!timestep.consume_step());
        assert_eq!(timestep.step_count(), 2);
    }

    #[test]
    fn test_fixed_timestep_rejects_unusable_steps() {
        for step in [0.0, -0.016, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(FixedTimestep::new(step), Err(ConfigError::InvalidValue { .. })),
                "step {step} accepted"
            );
        }
    }
}
