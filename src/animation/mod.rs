//! Animation abstraction, frame loop and execution contexts.

mod params;
mod queue;
mod runner;
pub mod scheduler;

pub(crate) use params::period_from_rate;
pub use params::RunParams;
pub use queue::AnimationQueue;
pub use runner::Runner;
pub use scheduler::{run_frames, OnComplete, RunReport};
use web_time::Duration;

use crate::error::{PixelpaceError, Result};
use crate::input::{InputDevice, KeyState};
use crate::signal::StopSignal;
use crate::surface::{SurfaceHandle, SurfaceKind};

/// State every animation carries: its surface, step counter, completion
/// flag, override delay and stop signal.
///
/// The step counter and completion flag are only touched from the thread
/// running the animation's frame loop.
pub struct AnimationCore {
    surface: SurfaceHandle,
    name: String,
    step: u64,
    complete: bool,
    internal_delay: Option<Duration>,
    stop: StopSignal,
    input: Option<Box<dyn InputDevice>>,
    keys: KeyState,
}

impl AnimationCore {
    /// Core bound to a surface of any shape.
    #[must_use]
    pub fn any(surface: SurfaceHandle) -> Self {
        Self {
            surface,
            name: "animation".into(),
            step: 0,
            complete: false,
            internal_delay: None,
            stop: StopSignal::new(),
            input: None,
            keys: KeyState::default(),
        }
    }

    /// Core bound to a surface that must be of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`] if the surface has another
    /// shape.
    pub fn of_kind(surface: SurfaceHandle, kind: SurfaceKind) -> Result<Self> {
        let found = surface.kind();
        if found != kind {
            log::error!("expected a {kind:?} surface, got {found:?}");
            return Err(PixelpaceError::WrongSurface {
                expected: kind,
                found,
            });
        }
        Ok(Self::any(surface))
    }

    /// Core bound to a strip surface.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`] for non-strip surfaces.
    pub fn strip(surface: SurfaceHandle) -> Result<Self> {
        Self::of_kind(surface, SurfaceKind::Strip)
    }

    /// Core bound to a matrix surface.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`] for non-matrix surfaces.
    pub fn matrix(surface: SurfaceHandle) -> Result<Self> {
        Self::of_kind(surface, SurfaceKind::Matrix)
    }

    /// Core bound to a ring surface.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`] for non-circle surfaces.
    pub fn circle(surface: SurfaceHandle) -> Result<Self> {
        Self::of_kind(surface, SurfaceKind::Circle)
    }

    /// Name used for worker threads and log lines.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Poll `device` once per tick before `pre_step`.
    #[must_use]
    pub fn with_input(mut self, device: impl InputDevice + 'static) -> Self {
        self.input = Some(Box::new(device));
        self
    }

    /// Surface this animation draws on.
    #[must_use]
    pub const fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    /// Animation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps taken in the current run.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step
    }

    /// Advance the step counter by `amt`.
    pub fn advance_step(&mut self, amt: usize) {
        self.step += amt as u64;
    }

    /// Whether the animation reports itself complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Set the completion flag.
    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    /// Delay that overrides the run's frame period, if set.
    #[must_use]
    pub const fn internal_delay(&self) -> Option<Duration> {
        self.internal_delay
    }

    /// Override the frame period for every following tick.
    pub fn set_internal_delay(&mut self, delay: Option<Duration>) {
        self.internal_delay = delay;
    }

    /// Cooperative cancellation flag of this animation.
    #[must_use]
    pub const fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Key state read from the input device at the start of this tick.
    #[must_use]
    pub const fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Whether an input device is attached.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub(crate) fn begin_run(&mut self) {
        self.step = 0;
        self.complete = false;
    }

    pub(crate) fn poll_input(&mut self) {
        if let Some(device) = self.input.as_mut() {
            self.keys = device.keys();
        }
    }

    /// Release the input device, if any.
    pub fn close_input(&mut self) {
        if let Some(mut device) = self.input.take() {
            device.close();
        }
    }
}

impl std::fmt::Debug for AnimationCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCore")
            .field("name", &self.name)
            .field("surface", &self.surface)
            .field("step", &self.step)
            .field("complete", &self.complete)
            .field("internal_delay", &self.internal_delay)
            .finish_non_exhaustive()
    }
}

/// A unit of animated content bound to one surface.
///
/// The frame loop calls, per run: [`prepare_run`](Self::prepare_run),
/// [`pre_run`](Self::pre_run), then per tick [`pre_step`](Self::pre_step),
/// [`step`](Self::step), [`post_step`](Self::post_step), and finally
/// [`post_run`](Self::post_run). Hooks never run concurrently with
/// themselves.
pub trait Animation: Send + 'static {
    /// Shared state.
    fn core(&self) -> &AnimationCore;

    /// Mutable shared state.
    fn core_mut(&mut self) -> &mut AnimationCore;

    /// Adjust the run parameters before the run starts. Sequencing
    /// animations use this to take over parameters they manage themselves.
    fn prepare_run(&mut self, _params: &mut RunParams) {}

    /// Called once before the first tick. Blanks the surface by default.
    ///
    /// # Errors
    ///
    /// An error aborts the run before any tick.
    fn pre_run(&mut self) -> Result<()> {
        self.core().surface().lock().clear();
        Ok(())
    }

    /// Called at the start of every tick.
    ///
    /// # Errors
    ///
    /// An error ends the run.
    fn pre_step(&mut self, _amt: usize) -> Result<()> {
        Ok(())
    }

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// An error ends the run.
    fn step(&mut self, amt: usize) -> Result<()>;

    /// Called after every step, before the frame is paced and committed.
    ///
    /// # Errors
    ///
    /// An error ends the run.
    fn post_step(&mut self, _amt: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last tick, whatever ended the run.
    fn post_run(&mut self) {}

    /// Name used for worker threads and log lines.
    fn name(&self) -> &str {
        self.core().name()
    }
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn core(&self) -> &AnimationCore {
        (**self).core()
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        (**self).core_mut()
    }

    fn prepare_run(&mut self, params: &mut RunParams) {
        (**self).prepare_run(params);
    }

    fn pre_run(&mut self) -> Result<()> {
        (**self).pre_run()
    }

    fn pre_step(&mut self, amt: usize) -> Result<()> {
        (**self).pre_step(amt)
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        (**self).step(amt)
    }

    fn post_step(&mut self, amt: usize) -> Result<()> {
        (**self).post_step(amt)
    }

    fn post_run(&mut self) {
        (**self).post_run();
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;

    #[test]
    fn shape_constructors_validate_kind() {
        let strip = SurfaceHandle::new(PixelBuffer::strip(8));
        let matrix = SurfaceHandle::new(PixelBuffer::matrix(4, 2));

        assert!(AnimationCore::strip(strip.clone()).is_ok());
        assert!(AnimationCore::matrix(matrix.clone()).is_ok());

        let err = AnimationCore::matrix(strip).unwrap_err();
        assert!(matches!(
            err,
            PixelpaceError::WrongSurface {
                expected: SurfaceKind::Matrix,
                found: SurfaceKind::Strip,
            }
        ));
        assert!(AnimationCore::circle(matrix).is_err());
    }

    #[test]
    fn begin_run_resets_counters() {
        let mut core = AnimationCore::any(SurfaceHandle::new(PixelBuffer::strip(1)));
        core.advance_step(3);
        core.set_complete(true);
        core.begin_run();
        assert_eq!(core.step_count(), 0);
        assert!(!core.is_complete());
    }
}
