//! Shared utilities.

pub mod frame_stats;
