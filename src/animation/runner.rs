//! Execution context: runs an animation inline or on a worker thread and
//! lets the owner stop and wait for it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::scheduler::{run_frames, OnComplete, RunReport};
use super::{Animation, RunParams};
use crate::error::{PixelpaceError, Result};
use crate::signal::StopSignal;

type Worker = JoinHandle<Result<RunReport>>;

/// Owns an animation and the thread it runs on.
///
/// The animation lives behind a mutex that the frame loop holds for the
/// whole run, so [`with_animation`](Self::with_animation) blocks while a run
/// is in progress. Dropping the runner raises the stop signal and joins the
/// worker.
pub struct Runner<A: Animation> {
    animation: Arc<Mutex<A>>,
    stop: StopSignal,
    name: String,
    worker: Option<Worker>,
}

impl<A: Animation> Runner<A> {
    /// Take ownership of `animation`.
    pub fn new(animation: A) -> Self {
        let stop = animation.core().stop_signal().clone();
        let name = animation.name().to_owned();
        Self {
            animation: Arc::new(Mutex::new(animation)),
            stop,
            name,
            worker: None,
        }
    }

    /// Start a run.
    ///
    /// Inline runs block and return their report. Threaded runs return
    /// `None` unless `params.join` is set, in which case the worker is
    /// joined and its report returned. A run still in progress is stopped
    /// and joined first; the stop signal is lowered before the new run.
    ///
    /// # Errors
    ///
    /// Returns the frame loop's error, [`PixelpaceError::ThreadSpawn`] if
    /// the worker cannot be started, or [`PixelpaceError::WorkerPanicked`].
    pub fn run(&mut self, params: RunParams) -> Result<Option<RunReport>> {
        self.start(params, None)
    }

    /// Like [`run`](Self::run), invoking `on_complete` once when the frame
    /// loop exits.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with(
        &mut self,
        params: RunParams,
        on_complete: impl FnOnce(&mut A) + Send + 'static,
    ) -> Result<Option<RunReport>> {
        self.start(params, Some(Box::new(on_complete)))
    }

    fn start(
        &mut self,
        params: RunParams,
        on_complete: Option<OnComplete<A>>,
    ) -> Result<Option<RunReport>> {
        if !self.is_stopped() {
            log::warn!("{}: restarting while a run is in progress", self.name);
            self.stop.raise();
        }
        if let Err(e) = self.wait() {
            log::error!("{}: previous run failed: {e}", self.name);
        }
        self.stop.clear();

        if !params.threaded {
            let mut anim = lock(&self.animation);
            return run_frames(&mut *anim, params, on_complete).map(Some);
        }

        let animation = Arc::clone(&self.animation);
        let name = self.name.clone();
        let worker = thread::Builder::new()
            .name(format!("pixelpace-{}", self.name))
            .spawn(move || {
                log::info!("{name}: worker started");
                let mut anim = lock(&animation);
                let result = run_frames(&mut *anim, params, on_complete);
                log::info!("{name}: worker finished");
                result
            })
            .map_err(PixelpaceError::ThreadSpawn)?;
        self.worker = Some(worker);

        if params.join {
            self.wait()
        } else {
            Ok(None)
        }
    }

    /// Raise the stop signal. With `wait`, also block until the worker
    /// exits.
    ///
    /// # Errors
    ///
    /// With `wait`, the same errors as [`wait`](Self::wait).
    pub fn stop(&mut self, wait: bool) -> Result<()> {
        self.stop.raise();
        if wait {
            let _ = self.wait()?;
        }
        Ok(())
    }

    /// Block until the worker exits and return its report. Returns `None`
    /// when no worker was started since the last wait.
    ///
    /// # Errors
    ///
    /// Returns the worker's frame loop error, or
    /// [`PixelpaceError::WorkerPanicked`] if it panicked.
    pub fn wait(&mut self) -> Result<Option<RunReport>> {
        let Some(worker) = self.worker.take() else {
            return Ok(None);
        };
        match worker.join() {
            Ok(result) => result.map(Some),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                log::error!("{}: worker panicked: {message}", self.name);
                Err(PixelpaceError::WorkerPanicked(message))
            }
        }
    }

    /// Whether no worker is running. Always `true` between inline runs.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// The animation's stop signal.
    #[must_use]
    pub const fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Name of the owned animation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the animation. Blocks while a run is in progress.
    pub fn with_animation<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(&mut lock(&self.animation))
    }

    /// Stop and join the run, release the input device, then blank and
    /// commit the surface.
    ///
    /// # Errors
    ///
    /// Returns the worker's error or the surface's commit error.
    pub fn close(mut self) -> Result<()> {
        let stopped = self.stop(true);
        let mut anim = lock(&self.animation);
        anim.core_mut().close_input();
        let mut surface = anim.core().surface().lock();
        surface.clear();
        surface.commit()?;
        surface.wait_for_commit()?;
        stopped
    }
}

fn lock<A>(animation: &Mutex<A>) -> MutexGuard<'_, A> {
    animation.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: Animation> Drop for Runner<A> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop.raise();
            if let Err(e) = self.wait() {
                log::error!("{}: {e}", self.name);
            }
        }
    }
}

impl<A: Animation> std::fmt::Debug for Runner<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("name", &self.name)
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}
