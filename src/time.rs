#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Wall-clock frame timing for [`Stage::frame`](crate::stage::Stage::frame).
///
/// Deltas longer than `max_delta` (a stalled tab, a debugger pause) are
/// clamped so transitions never jump ahead in a single tick.
pub struct FrameClock {
    start_time: Instant,
    last_update: Instant,
    max_delta: Duration,
    /// Clamped time since the previous tick
    pub delta: Duration,
    /// Unclamped time since creation
    pub elapsed: Duration,
    pub frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    #[must_use]
    pub fn new(max_delta_seconds: f32) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            max_delta: Duration::try_from_secs_f32(max_delta_seconds.max(0.0)).unwrap_or(Duration::MAX),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Samples the clock and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = (now - self.last_update).min(self.max_delta);
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new(0.0);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame_count, 1);
        assert!(clock.elapsed >= Duration::from_millis(2));
    }

    #[test]
    fn test_unbounded_max_delta() {
        let mut clock = FrameClock::new(f32::INFINITY);
        assert_eq!(clock.max_delta, Duration::MAX);
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.tick() > 0.0);

        let clock = FrameClock::new(f32::NAN);
        assert_eq!(clock.max_delta, Duration::ZERO);
    }
}
