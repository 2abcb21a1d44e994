use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source, expressed as time elapsed since the clock's origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock backed monotonic time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        debug_assert!(now >= self.now.get(), "manual clock must not run backwards");
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Frame-rate cap for the render/input cadence.
///
/// Each call to [`FramePacer::wait_for_next_frame`] returns how long the loop
/// should block so that consecutive frames are at least `1 / speed` seconds
/// apart. The snake's own step gate is independent of this cadence.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    last_frame: Duration,
}

impl FramePacer {
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self { last_frame: now }
    }

    /// Returns the block duration and marks the frame as scheduled.
    pub fn wait_for_next_frame(&mut self, now: Duration, speed: f64) -> Duration {
        let interval = frame_interval(speed);
        let elapsed = now.saturating_sub(self.last_frame);
        let wait = interval.saturating_sub(elapsed);
        self.last_frame = now + wait;
        wait
    }
}

/// Frame interval for a frames-per-second value; non-positive speeds do not
/// cap the frame rate.
#[must_use]
pub fn frame_interval(speed: f64) -> Duration {
    if speed.is_finite() && speed > 0.0 {
        Duration::from_secs_f64(1.0 / speed)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Clock, FramePacer, ManualClock, frame_interval};

    #[test]
    fn manual_clock_advances_only_when_told() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(150));
        clock.advance(Duration::from_millis(50));

        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn frame_interval_follows_speed() {
        assert_eq!(frame_interval(10.0), Duration::from_millis(100));
        assert_eq!(frame_interval(25.0), Duration::from_millis(40));
        assert_eq!(frame_interval(0.0), Duration::ZERO);
    }

    #[test]
    fn pacer_waits_for_the_rest_of_the_frame() {
        let mut pacer = FramePacer::new(Duration::ZERO);

        let wait = pacer.wait_for_next_frame(Duration::from_millis(30), 10.0);
        assert_eq!(wait, Duration::from_millis(70));

        // Next frame is measured from the scheduled end of the previous one.
        let wait = pacer.wait_for_next_frame(Duration::from_millis(120), 10.0);
        assert_eq!(wait, Duration::from_millis(80));
    }

    #[test]
    fn pacer_does_not_wait_after_a_slow_frame() {
        let mut pacer = FramePacer::new(Duration::ZERO);

        let wait = pacer.wait_for_next_frame(Duration::from_millis(250), 10.0);

        assert_eq!(wait, Duration::ZERO);
    }
}
