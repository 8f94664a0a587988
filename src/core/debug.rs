//! Debug and statistics module

use std::collections::VecDeque;
use std::time::Duration;

/// Frame statistics tracker
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Average frame time in milliseconds
    avg_frame_time_ms: f32,
    /// Total frames recorded
    total_frames: u64,
}

impl FrameStats {
    /// Create a new frame stats tracker
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            avg_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        let total: Duration = self.frame_times.iter().sum();
        self.avg_frame_time_ms =
            total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;
    }

    /// Get average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    /// Get total frames recorded
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "Frames: {} | Step: {:.2}ms",
            self.total_frames, self.avg_frame_time_ms
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug information: frame stats plus named values behaviours publish
/// every frame (pool counts and the like).
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Frame statistics
    pub frame_stats: FrameStats,
    /// Latest value per label, in first-published order
    watches: Vec<(String, String)>,
}

impl DebugInfo {
    /// Create new debug info
    pub fn new() -> Self {
        Self {
            frame_stats: FrameStats::new(),
            watches: Vec::new(),
        }
    }

    /// Publish the current value for `label`, replacing the previous one
    pub fn watch(&mut self, label: impl Into<String>, value: impl ToString) {
        let label = label.into();
        let value = value.to_string();
        match self.watches.iter_mut().find(|(l, _)| *l == label) {
            Some((_, v)) => *v = value,
            None => self.watches.push((label, value)),
        }
    }

    /// Latest value published for `label`
    pub fn watched(&self, label: &str) -> Option<&str> {
        self.watches
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Forget every watched value
    pub fn clear_watches(&mut self) {
        self.watches.clear();
    }

    /// Get all debug lines
    pub fn get_all_lines(&self) -> Vec<String> {
        let mut lines = vec![self.frame_stats.format_stats()];
        lines.extend(self.watches.iter().map(|(l, v)| format!("{l}: {v}")));
        lines
    }

    /// Record a frame
    pub fn record_frame(&mut self, delta: Duration) {
        self.frame_stats.record_frame(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_replaces_value() {
        let mut debug = DebugInfo::new();
        debug.watch("pool", 3);
        debug.watch("other", "x");
        debug.watch("pool", 4);

        assert_eq!(debug.watched("pool"), Some("4"));
        assert_eq!(
            debug.get_all_lines()[1..],
            ["pool: 4".to_string(), "other: x".to_string()]
        );
    }

    #[test]
    fn test_frame_stats_average() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10));
        stats.record_frame(Duration::from_millis(20));

        assert_eq!(stats.total_frames(), 2);
        assert!((stats.avg_frame_time_ms() - 15.0).abs() < 1e-3);
    }
}
