use std::time::Duration;

/// Fixed-rate tick source fed with frame times.
///
/// Frame time accumulates until a full tick interval is reached. Consuming a
/// tick keeps the remainder for the next one, but never more than a single
/// interval of backlog, so at most one tick fires per frame and a slow frame
/// does not trigger a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    accumulated: Duration,
    delta: Duration,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
            delta: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Length of the most recent frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Drops all accumulated time.
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
        self.delta = Duration::ZERO;
    }

    pub fn advance(&mut self, frame_time: Duration) {
        self.delta = frame_time;
        self.accumulated += frame_time;
    }

    /// Whether a tick is due.
    pub fn elapsed(&self) -> bool {
        self.accumulated >= self.interval
    }

    pub fn consume_tick(&mut self) {
        self.accumulated = self.accumulated.saturating_sub(self.interval);
        if self.accumulated >= self.interval {
            self.accumulated = Duration::from_nanos(
                (self.accumulated.as_nanos() % self.interval.as_nanos().max(1)) as u64,
            );
        }
    }

    /// Fraction of the next interval that has already accumulated.
    pub fn partial(&self) -> f32 {
        if self.interval.is_zero() {
            return 0.0;
        }
        self.accumulated.as_secs_f32() / self.interval.as_secs_f32()
    }
}

/// Counts presented frames and publishes the rate once per second.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&mut self, frame_time: Duration) {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.elapsed >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.elapsed -= Duration::from_secs(1);
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn fires_once_interval_is_reached() {
        let mut timer = Timer::new(TICK);

        timer.advance(Duration::from_millis(6));
        assert!(!timer.elapsed());

        timer.advance(Duration::from_millis(6));
        assert!(timer.elapsed());

        timer.consume_tick();
        assert!(!timer.elapsed());
        assert_relative_eq!(timer.partial(), 0.2, epsilon = 1e-5);
    }

    #[test]
    fn long_frame_yields_single_tick() {
        let mut timer = Timer::new(TICK);

        timer.advance(Duration::from_millis(35));
        assert!(timer.elapsed());
        timer.consume_tick();

        assert!(!timer.elapsed());
        assert_relative_eq!(timer.partial(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn restart_drops_accumulated_time() {
        let mut timer = Timer::new(TICK);
        timer.advance(Duration::from_millis(9));

        timer.restart();
        timer.advance(Duration::from_millis(2));

        assert!(!timer.elapsed());
        assert_eq!(timer.delta(), Duration::from_millis(2));
    }

    #[test]
    fn fps_published_every_second() {
        let mut counter = FpsCounter::new();

        for _ in 0..59 {
            counter.count(Duration::from_micros(16_667));
        }
        assert_eq!(counter.fps(), 0);

        counter.count(Duration::from_micros(16_667));
        assert_eq!(counter.fps(), 60);
    }
}
