//! Smoothed frame-rate estimation for loop telemetry.

use web_time::{Duration, Instant};

/// Smoothed frames-per-second estimate over a running frame loop.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Last frame timestamp
    last_frame: Option<Instant>,
    /// Duration of the last completed frame
    last_duration: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    /// Estimator with no frames recorded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_frame: None,
            last_duration: Duration::ZERO,
            smoothed_fps: 0.0,
            smoothing: 0.1, // 10% new value, 90% old value
        }
    }

    /// Call once per frame, at the same point in the loop.
    pub fn end_frame(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            self.last_duration = now.saturating_duration_since(last);
            let frame_time = self.last_duration.as_secs_f32();
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                // The first measured frame seeds the average
                self.smoothed_fps = if self.smoothed_fps == 0.0 {
                    instant_fps
                } else {
                    self.smoothed_fps * (1.0 - self.smoothing)
                        + instant_fps * self.smoothing
                };
            }
        }
        self.last_frame = Some(now);
    }

    /// Current FPS (smoothed); zero until two frames have been recorded.
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Wall time between the last two frames.
    #[must_use]
    pub const fn last_duration(&self) -> Duration {
        self.last_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_frames_converge() {
        let mut stats = FrameStats::new();
        let start = Instant::now();
        for i in 0..50 {
            stats.end_frame(start + Duration::from_millis(20 * i));
        }
        assert!((stats.fps() - 50.0).abs() < 0.5, "fps {}", stats.fps());
        assert_eq!(stats.last_duration(), Duration::from_millis(20));
    }

    #[test]
    fn single_frame_has_no_rate() {
        let mut stats = FrameStats::new();
        stats.end_frame(Instant::now());
        assert_eq!(stats.fps(), 0.0);
    }
}
