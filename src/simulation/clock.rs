use hifitime::Duration;

/// Fixed-step simulation clock, in time since the element epoch.
///
/// Durations are integer nanoseconds, so after `k` ticks `now` is exactly `start + k·step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    start: Duration,
    step: Duration,
    now: Duration,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(start: Duration, step: Duration) -> Self {
        Self {
            start,
            step,
            now: start,
            ticks: 0,
        }
    }

    pub fn from_seconds(start_s: f64, step_s: f64) -> Self {
        Self::new(Duration::from_seconds(start_s), Duration::from_seconds(step_s))
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current time t [s], the argument of the Kepler propagation.
    pub fn now_seconds(&self) -> f64 {
        self.now.to_seconds()
    }

    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn advance(&mut self) {
        self.now = self.now + self.step;
        self.ticks += 1;
    }
}
