//! Frame clock for driving the simulation

use std::time::Instant;

/// Tracks frame time for the host loop.
///
/// Headless drivers call [`FrameClock::step`] to advance by exactly one fixed
/// timestep. Interactive drivers call [`FrameClock::tick`] once per frame to
/// measure wall-clock time and then drain fixed steps from the accumulator.
pub struct FrameClock {
    /// Total simulated time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub timestep: f64,
    /// Upper bound on a single measured frame
    pub max_delta: f64,
    /// Number of simulation steps taken
    pub frames: u64,
    accumulator: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            timestep: 1.0 / 60.0,
            max_delta: 0.25,
            frames: 0,
            accumulator: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    /// Create a new frame clock with a 60Hz timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame clock stepping at `hz` frames per second
    pub fn with_rate(hz: f64) -> Self {
        Self {
            timestep: 1.0 / hz.max(1.0),
            ..Self::default()
        }
    }

    /// Advance by exactly one timestep and return it
    pub fn step(&mut self) -> f64 {
        self.delta_time = self.timestep;
        self.total_time += self.timestep;
        self.frames += 1;
        self.timestep
    }

    /// Measure wall-clock time since the previous tick. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Clamp to avoid spiral of death after a stall
        self.delta_time = elapsed.min(self.max_delta);
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed step
    pub fn should_step(&self) -> bool {
        self.accumulator >= self.timestep
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_step(&mut self) -> f64 {
        self.accumulator -= self.timestep;
        self.step()
    }
}
