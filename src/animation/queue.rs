//! Sequencing animation: plays a list of animations one after another.

use super::scheduler::run_frames;
use super::{Animation, AnimationCore, RunParams};
use crate::error::{ConfigError, Result};
use crate::surface::SurfaceHandle;

/// An animation whose every step runs the next entry of an ordered list to
/// completion, inline on the queue's own thread.
///
/// Entries keep the run parameters they were appended with, except that
/// they never run threaded and never carry a completion callback. A queue
/// run with `fps` set lends that rate to entries that have none.
///
/// When the list is exhausted the queue either wraps around or, under
/// `until_complete`, reports completion once its cycle budget is spent.
/// Raising the queue's stop signal raises every entry's first.
pub struct AnimationQueue {
    core: AnimationCore,
    entries: Vec<(Box<dyn Animation>, RunParams)>,
    index: Option<usize>,
    default_fps: Option<f64>,
    until_complete: bool,
    manual_commit: bool,
    cycles_left: u32,
}

impl AnimationQueue {
    /// An empty queue drawing on `surface`.
    #[must_use]
    pub fn new(surface: SurfaceHandle) -> Self {
        Self {
            core: AnimationCore::any(surface).with_name("queue"),
            entries: Vec::new(),
            index: None,
            default_fps: None,
            until_complete: false,
            manual_commit: false,
            cycles_left: 0,
        }
    }

    /// Append `animation`, to be run with `params`.
    pub fn append(&mut self, animation: impl Animation, params: RunParams) {
        self.append_boxed(Box::new(animation), params);
    }

    /// Append an already boxed animation.
    pub fn append_boxed(&mut self, animation: Box<dyn Animation>, params: RunParams) {
        self.core
            .stop_signal()
            .link(animation.core().stop_signal().clone());
        self.entries.push((animation, params));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry run by the last step.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.index
    }

    fn entry_params(&self, stored: RunParams) -> RunParams {
        let mut params = stored;
        params.threaded = false;
        params.join = false;
        params.manual_commit |= self.manual_commit;
        if params.fps.is_none() && params.sleep_ms.is_none() {
            params.fps = self.default_fps;
        }
        params
    }
}

impl Animation for AnimationQueue {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn prepare_run(&mut self, params: &mut RunParams) {
        self.default_fps = params.fps;
        self.until_complete = params.until_complete;
        self.manual_commit = params.manual_commit;
        self.cycles_left = params.max_cycles;

        // Entries pace themselves; the queue's own loop runs flat out.
        params.amt = 1;
        params.fps = None;
        params.sleep_ms = None;
        params.max_cycles = 0;
    }

    fn pre_run(&mut self) -> Result<()> {
        if self.entries.is_empty() {
            log::error!("{}: {}", self.core.name(), ConfigError::EmptyQueue);
            return Err(ConfigError::EmptyQueue.into());
        }
        for (animation, _) in &self.entries {
            animation.core().stop_signal().clear();
        }
        self.index = None;
        Ok(())
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        let mut next = self.index.map_or(0, |i| i + 1);
        if next >= self.entries.len() {
            if self.until_complete && self.cycles_left <= 1 {
                self.core.set_complete(true);
                return Ok(());
            }
            self.cycles_left = self.cycles_left.saturating_sub(1);
            next = 0;
        }
        self.index = Some(next);

        let params = self.entry_params(self.entries[next].1);
        let (animation, _) = &mut self.entries[next];
        log::debug!("queue: running entry {next} ({})", animation.name());
        let _ = run_frames(animation, params, None)?;

        self.core.advance_step(amt);
        Ok(())
    }
}

impl std::fmt::Debug for AnimationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationQueue")
            .field("core", &self.core)
            .field("entries", &self.entries.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
