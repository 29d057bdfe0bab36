/// Payload of one simulation step: elapsed wall time and the time-scale
/// multiplier (1.0 when running exactly at the nominal frame rate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Elapsed time for this step in milliseconds.
    pub delta_ms: f32,
    /// Scale factor relative to the nominal frame rate.
    pub delta_mult: f32,
}

impl Step {
    /// Build a step from an elapsed time, scaled against a nominal frame rate.
    pub fn at_fps(delta_ms: f32, nominal_fps: f32) -> Self {
        Self {
            delta_ms,
            delta_mult: delta_ms * nominal_fps / 1000.0,
        }
    }
}

/// Fixed timestep accumulator.
/// Ensures simulation logic runs at a consistent rate regardless of frame time.
pub struct StepClock {
    dt_ms: f32,
    nominal_fps: f32,
    accumulator_ms: f32,
}

impl StepClock {
    pub fn new(nominal_fps: f32) -> Self {
        Self {
            dt_ms: 1000.0 / nominal_fps,
            nominal_fps,
            accumulator_ms: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: f32) -> u32 {
        self.accumulator_ms += frame_ms;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator_ms = self.accumulator_ms.min(self.dt_ms * 10.0);
        let steps = (self.accumulator_ms / self.dt_ms) as u32;
        self.accumulator_ms -= steps as f32 * self.dt_ms;
        steps
    }

    /// The step payload for one fixed tick.
    pub fn step(&self) -> Step {
        Step::at_fps(self.dt_ms, self.nominal_fps)
    }

    /// The fixed delta time in milliseconds.
    pub fn dt_ms(&self) -> f32 {
        self.dt_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = StepClock::new(60.0);
        assert!((clock.dt_ms() - 1000.0 / 60.0).abs() < 1e-4);
        let dt = clock.dt_ms();
        assert_eq!(clock.accumulate(dt), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = StepClock::new(60.0);
        assert_eq!(clock.accumulate(8.0), 0);
        assert_eq!(clock.accumulate(10.0), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut clock = StepClock::new(60.0);
        let steps = clock.accumulate(1000.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn fixed_step_has_unit_multiplier() {
        let clock = StepClock::new(60.0);
        let step = clock.step();
        assert!((step.delta_mult - 1.0).abs() < 1e-5);
        assert!((step.delta_ms - 1000.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn at_fps_scales_multiplier() {
        let step = Step::at_fps(33.0, 60.0);
        assert!((step.delta_mult - 33.0 * 0.06).abs() < 1e-4);
    }
}
