use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Compositor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompositorOptions {
    /// How long tracks without an explicit step budget run, in seconds.
    pub runtime_secs: f64,
    /// Upper bound on the compositor's wait between liveness checks, in
    /// milliseconds.
    pub poll_interval_ms: u64,
    /// Cap on how often the compositor merges and commits. Unset merges
    /// every child frame.
    pub fps: Option<f64>,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            runtime_secs: 10.0,
            poll_interval_ms: 2,
            fps: None,
        }
    }
}

impl CompositorOptions {
    /// Runtime as a duration. Negative or non-finite values count as zero.
    #[must_use]
    pub fn runtime(&self) -> Duration {
        Duration::try_from_secs_f64(self.runtime_secs).unwrap_or_default()
    }

    /// Poll interval as a duration.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
