use std::time::Duration;

/// Shortest interval a [`Cadence`] accepts; shorter ones are raised to it.
pub const MIN_CADENCE_INTERVAL: Duration = Duration::from_millis(1);

/// Real-time cadence: fires once per elapsed `interval`, independent of frame rate.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    elapsed: Duration,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_CADENCE_INTERVAL),
            elapsed: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated towards the next firing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Accumulate `dt` and return how many intervals completed.
    /// The remainder carries over to the next call.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let fired = (self.elapsed.as_nanos() / self.interval.as_nanos()) as u32;
        self.elapsed -= self.interval * fired;
        fired
    }
}

/// Fixed-timestep accumulator for drivers that step the session at a constant rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
}

impl FixedTimestep {
    /// `max_steps` bounds the catch-up work done after a long stall.
    pub fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step: step.max(MIN_CADENCE_INTERVAL),
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    /// 60 steps per second, at most 5 per frame.
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_nanos(16_666_667), 5)
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Feed a frame delta, returning how many fixed steps to run now.
    pub fn advance(&mut self, frame_dt: Duration) -> u32 {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            tracing::debug!(
                dropped = ?self.accumulator,
                "fixed timestep fell behind; dropping backlog"
            );
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_fires_on_the_boundary() {
        let mut c = Cadence::new(Duration::from_millis(2000));
        assert_eq!(c.advance(Duration::from_millis(500)), 0);
        assert_eq!(c.advance(Duration::from_millis(500)), 0);
        assert_eq!(c.advance(Duration::from_millis(500)), 0);
        assert_eq!(c.advance(Duration::from_millis(500)), 1);
        assert_eq!(c.elapsed(), Duration::ZERO);
    }

    #[test]
    fn cadence_carries_remainder() {
        let mut c = Cadence::new(Duration::from_millis(100));
        assert_eq!(c.advance(Duration::from_millis(250)), 2);
        assert_eq!(c.elapsed(), Duration::from_millis(50));
        assert_eq!(c.advance(Duration::from_millis(50)), 1);
    }

    #[test]
    fn cadence_reset_discards_progress() {
        let mut c = Cadence::new(Duration::from_millis(100));
        c.advance(Duration::from_millis(90));
        c.reset();
        assert_eq!(c.advance(Duration::from_millis(20)), 0);
    }

    #[test]
    fn zero_interval_is_raised_to_the_minimum() {
        let mut c = Cadence::new(Duration::ZERO);
        assert_eq!(c.interval(), MIN_CADENCE_INTERVAL);
        assert_eq!(c.advance(Duration::from_millis(100)), 100);
        assert_eq!(c.elapsed(), Duration::ZERO);

        let mut t = FixedTimestep::new(Duration::ZERO, 4);
        assert_eq!(t.step(), MIN_CADENCE_INTERVAL);
        assert_eq!(t.advance(Duration::from_millis(2)), 2);
    }

    #[test]
    fn fixed_timestep_accumulates() {
        let mut t = FixedTimestep::new(Duration::from_millis(10), 10);
        assert_eq!(t.advance(Duration::from_millis(25)), 2);
        assert_eq!(t.advance(Duration::from_millis(5)), 1);
    }

    #[test]
    fn fixed_timestep_caps_catch_up() {
        let mut t = FixedTimestep::new(Duration::from_millis(10), 3);
        assert_eq!(t.advance(Duration::from_secs(1)), 3);
        // Backlog was dropped, not replayed.
        assert_eq!(t.advance(Duration::ZERO), 0);
    }
}
