/// Fixed timestep accumulator.
/// Keeps the sequencer advancing in equal steps whatever the display refresh rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per step, in seconds.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on steps per frame (a backgrounded tab can hand us seconds at once).
    max_steps: u32,
}

impl FixedTimestep {
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt: if dt > 0.0 { dt } else { 1.0 / 60.0 },
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial step.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
