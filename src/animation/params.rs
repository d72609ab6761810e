//! Run parameters shared by every animation.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// How an animation run is paced, bounded and executed.
///
/// All fields default, so partial TOML tables work:
///
/// ```toml
/// [run]
/// fps = 30.0
/// max_steps = 300
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    /// Amount passed to each step hook.
    pub amt: usize,
    /// Target frame rate in frames per second.
    pub fps: Option<f64>,
    /// Explicit frame period in milliseconds. Takes precedence over `fps`.
    pub sleep_ms: Option<f64>,
    /// Number of ticks to run; 0 is unbounded unless `until_complete`.
    pub max_steps: u64,
    /// Run until the animation reports itself complete.
    pub until_complete: bool,
    /// With `until_complete`, repeat the animation this many times.
    pub max_cycles: u32,
    /// Run on a dedicated worker thread.
    pub threaded: bool,
    /// With `threaded`, block the caller until the worker exits.
    pub join: bool,
    /// Raise the surface's pending-update signal instead of committing.
    pub manual_commit: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            amt: 1,
            fps: None,
            sleep_ms: None,
            max_steps: 0,
            until_complete: false,
            max_cycles: 0,
            threaded: false,
            join: false,
            manual_commit: false,
        }
    }
}

impl RunParams {
    /// Set the target frame rate.
    #[must_use]
    pub const fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set an explicit frame period.
    #[must_use]
    pub fn with_sleep(mut self, period: Duration) -> Self {
        self.sleep_ms = Some(period.as_secs_f64() * 1000.0);
        self
    }

    /// Set the step budget.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the step amount.
    #[must_use]
    pub const fn with_amt(mut self, amt: usize) -> Self {
        self.amt = amt;
        self
    }

    /// Run until the animation reports completion, `max_cycles` times.
    #[must_use]
    pub const fn until_complete(mut self, max_cycles: u32) -> Self {
        self.until_complete = true;
        self.max_cycles = max_cycles;
        self
    }

    /// Run on a worker thread.
    #[must_use]
    pub const fn threaded(mut self) -> Self {
        self.threaded = true;
        self
    }

    /// Run on a worker thread and wait for it.
    #[must_use]
    pub const fn joined(mut self) -> Self {
        self.threaded = true;
        self.join = true;
        self
    }

    /// Defer commits to a compositor.
    #[must_use]
    pub const fn manual_commit(mut self) -> Self {
        self.manual_commit = true;
        self
    }

    /// Frame period requested by these parameters: `sleep_ms` if set,
    /// otherwise derived from `fps`. `None` runs unpaced. A value that is
    /// not positive and finite, or whose period is zero or too long for a
    /// [`Duration`], counts as unset.
    #[must_use]
    pub fn base_period(&self) -> Option<Duration> {
        self.sleep_ms
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .and_then(|ms| period_from_secs(ms / 1000.0))
            .or_else(|| self.fps.and_then(period_from_rate))
    }

    /// Whether the frame loop should run another tick after `steps` ticks
    /// with the animation's completion flag at `complete`.
    #[must_use]
    pub const fn keeps_running(&self, steps: u64, complete: bool) -> bool {
        if self.max_steps > 0 {
            steps < self.max_steps
        } else {
            !self.until_complete || !complete
        }
    }
}

/// Frame period of `fps` frames per second. `None` if the rate is not
/// positive and finite, or if the period rounds to zero or overflows.
#[must_use]
pub(crate) fn period_from_rate(fps: f64) -> Option<Duration> {
    if fps.is_finite() && fps > 0.0 {
        period_from_secs(fps.recip())
    } else {
        None
    }
}

fn period_from_secs(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|period| !period.is_zero())
}
