use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings of the bundled demo: worms crawling around nested rectangles of
/// a matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoOptions {
    /// Matrix columns.
    pub width: usize,
    /// Matrix rows.
    pub height: usize,
    /// Frame rate of each worm, outermost first. One worm per entry.
    pub rates: Vec<f64>,
    /// Where to write the compositor's activation time series as JSON.
    pub timing_out: Option<PathBuf>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            width: 16,
            height: 10,
            rates: vec![5.0, 6.0, 7.0, 8.0, 9.0],
            timing_out: None,
        }
    }
}
