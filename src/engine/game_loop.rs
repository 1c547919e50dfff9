/// Fixed-timestep driver for the physics world
///
/// Frame times go in, a whole number of fixed physics steps comes out. The
/// driver never reads the clock itself, so callers decide where time comes
/// from (a real frame timer, a replay, a test).
use std::time::Duration;

/// Target physics rate (60 steps per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Fixed-timestep accumulator
pub struct FixedStep {
    /// Accumulated time not yet consumed by fixed steps
    accumulator: Duration,

    step: Duration,

    max_steps: u32,

    /// Whether stepping is paused
    paused: bool,

    /// Total steps handed out
    step_count: u64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::with_step(FIXED_TIMESTEP_DURATION, MAX_PHYSICS_STEPS)
    }

    /// Custom step length and per-frame step cap
    pub fn with_step(step: Duration, max_steps: u32) -> Self {
        Self {
            accumulator: Duration::ZERO,
            step,
            max_steps,
            paused: false,
            step_count: 0,
        }
    }

    /// Feed one frame's elapsed time, returns the number of steps to run
    ///
    /// Time beyond `max_steps` worth of steps is dropped rather than carried
    /// into the next frame.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused || self.step.is_zero() {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:?} of backlog after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator = Duration::ZERO;
        }

        self.step_count += steps as u64;
        steps
    }

    /// Length of one step in seconds, the `dt` to pass to the physics world
    pub fn dt(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Interpolation factor between the last two steps, in [0, 1)
    pub fn alpha(&self) -> f32 {
        if self.step.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Physics paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Physics resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep() {
        let stepper = FixedStep::new();
        assert!((stepper.dt() - FIXED_TIMESTEP).abs() < 0.0001);
        assert_eq!(stepper.step_count(), 0);
        assert!(!stepper.is_paused());
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut stepper = FixedStep::with_step(Duration::from_millis(10), 5);
        assert_eq!(stepper.advance(Duration::from_millis(6)), 0);
        assert_eq!(stepper.advance(Duration::from_millis(6)), 1);
        assert_eq!(stepper.advance(Duration::from_millis(25)), 2);
        assert_eq!(stepper.step_count(), 3);
        assert!((stepper.alpha() - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_max_steps_limit_drops_backlog() {
        let mut stepper = FixedStep::with_step(Duration::from_millis(10), 5);
        assert_eq!(stepper.advance(Duration::from_millis(300)), 5);
        assert_eq!(stepper.alpha(), 0.0);
        assert_eq!(stepper.advance(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_paused_no_steps() {
        let mut stepper = FixedStep::with_step(Duration::from_millis(10), 5);
        stepper.pause();
        assert_eq!(stepper.advance(Duration::from_millis(50)), 0);

        stepper.toggle_pause();
        assert!(!stepper.is_paused());
        assert_eq!(stepper.advance(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_zero_step_never_loops() {
        let mut stepper = FixedStep::with_step(Duration::ZERO, 5);
        assert_eq!(stepper.advance(Duration::from_millis(10)), 0);
        assert_eq!(stepper.alpha(), 0.0);
    }
}
