//! Frame time tracking

use std::time::{Duration, Instant};

/// Time state for the current frame.
///
/// The engine either measures wall-clock deltas with [`Time::update`] or
/// drives a fixed step with [`Time::advance`].
#[derive(Debug, Clone)]
pub struct Time {
    /// Duration of the last frame
    delta: Duration,
    /// Total time since the first frame
    elapsed: Duration,
    /// Number of frames advanced
    frame: u64,
    /// Wall-clock instant of the last `update`
    last_instant: Option<Instant>,
}

impl Time {
    /// Create a new time tracker at zero
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame: 0,
            last_instant: None,
        }
    }

    /// Measure the wall-clock delta since the previous call
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = self
            .last_instant
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_instant = Some(now);
        self.advance(delta);
    }

    /// Advance by a fixed delta
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }

    /// Last frame duration
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Last frame duration in seconds
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total elapsed time in seconds
    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames advanced so far
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(250));
        time.advance(Duration::from_millis(500));

        assert_eq!(time.delta(), Duration::from_millis(500));
        assert_eq!(time.elapsed(), Duration::from_millis(750));
        assert_eq!(time.frame(), 2);
        assert!((time.delta_seconds() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_first_update_has_zero_delta() {
        let mut time = Time::new();
        time.update();
        assert_eq!(time.delta(), Duration::ZERO);
        assert_eq!(time.frame(), 1);
    }
}
