//! The frame loop shared by every animation.
//!
//! Each tick runs the animation's hooks, then sleeps until the next tick
//! boundary and commits the surface. Boundaries sit on a grid of whole frame
//! periods measured from one process-wide origin, so schedulers started at
//! different moments, at different rates, keep a fixed phase relation
//! instead of drifting apart. A tick that overruns its period is reported
//! and the grid is re-anchored at the overrun, so the lost time is never
//! paid back by shortening later ticks.

use std::sync::OnceLock;

use web_time::{Duration, Instant};

use super::{Animation, RunParams};
use crate::error::{PixelpaceError, Result};
use crate::surface::FrameTiming;
use crate::util::frame_stats::FrameStats;

/// Callback invoked exactly once when a run's frame loop exits.
pub type OnComplete<A> = Box<dyn FnOnce(&mut A) + Send>;

/// Outcome of one run of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Ticks executed.
    pub steps: u64,
    /// Extra cycles started after the animation reported completion.
    pub cycles: u32,
    /// Ticks whose content and overhead exceeded the frame period.
    pub overruns: u64,
    /// Whether the stop signal ended the run.
    pub stopped: bool,
}

static CLOCK_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Origin of the tick grid shared by every scheduler in the process.
pub fn clock_origin() -> Instant {
    *CLOCK_ORIGIN.get_or_init(Instant::now)
}

/// Snap `next` to the nearest whole multiple of `period` after `origin`.
#[must_use]
pub fn align_to_grid(origin: Instant, next: Instant, period: Duration) -> Instant {
    if period.is_zero() {
        return next;
    }
    let frames = next.saturating_duration_since(origin).as_secs_f64()
        / period.as_secs_f64();
    let offset = period.as_nanos().saturating_mul(frames.round() as u128);
    origin + Duration::from_nanos(u64::try_from(offset).unwrap_or(u64::MAX))
}

/// What the pacer decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pace {
    /// Sleep until this instant.
    SleepUntil(Instant),
    /// The grid point is already behind us; go straight on.
    OnTime,
    /// The tick took this long, at least a full period.
    Overrun(Duration),
}

/// Anchor of the tick cadence for one run.
#[derive(Debug, Clone)]
pub(crate) struct FramePacer {
    origin: Instant,
    anchor: Instant,
}

impl FramePacer {
    pub(crate) fn new(start: Instant) -> Self {
        Self {
            origin: clock_origin(),
            anchor: start,
        }
    }

    /// Advance the anchor by one `period` and decide how long to wait.
    pub(crate) fn pace(&mut self, now: Instant, period: Duration) -> Pace {
        let next = self.anchor + period;
        if now < next {
            let target = align_to_grid(self.origin, next, period);
            log::trace!(
                "time correction used {:.3} ms",
                signed_ms(target, next)
            );
            self.anchor = target;
            if target > now {
                Pace::SleepUntil(target)
            } else {
                Pace::OnTime
            }
        } else {
            let took = now.saturating_duration_since(self.anchor);
            self.anchor = now;
            Pace::Overrun(took)
        }
    }
}

fn signed_ms(a: Instant, b: Instant) -> f64 {
    if a >= b {
        a.duration_since(b).as_secs_f64() * 1000.0
    } else {
        -(b.duration_since(a).as_secs_f64() * 1000.0)
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Run `anim`'s frame loop on the calling thread until the run parameters
/// or the stop signal end it.
///
/// The stop signal is not cleared here; execution contexts clear it when a
/// fresh run starts. A zero internal delay means the animation's own delay
/// is unset. Whatever ends the loop, including an error from `pre_run` or
/// any other hook, the completion flag is forced true, `post_run` fires and `on_complete`
/// is invoked once.
///
/// # Errors
///
/// Returns the first error raised by a hook or by committing the surface.
pub fn run_frames<A: Animation + ?Sized>(
    anim: &mut A,
    mut params: RunParams,
    on_complete: Option<OnComplete<A>>,
) -> Result<RunReport> {
    anim.prepare_run(&mut params);

    let mut report = RunReport::default();
    let result = anim.pre_run().and_then(|()| {
        anim.core_mut().begin_run();
        tick_loop(anim, &params, &mut report)
    });

    anim.core_mut().set_complete(true);
    anim.post_run();
    if let Some(callback) = on_complete {
        callback(anim);
    }

    if let Err(e) = &result {
        log::error!("{}: run aborted: {e}", anim.name());
    }
    result.map(|()| report)
}

fn tick_loop<A: Animation + ?Sized>(
    anim: &mut A,
    params: &RunParams,
    report: &mut RunReport,
) -> Result<()> {
    let stop = anim.core().stop_signal().clone();
    let base_period = params.base_period();
    let amt = params.amt;
    let mut pacer = FramePacer::new(Instant::now());
    let mut stats = FrameStats::new();

    while !stop.is_raised()
        && params.keeps_running(report.steps, anim.core().is_complete())
    {
        let start = Instant::now();
        anim.core_mut().poll_input();
        anim.pre_step(amt)?;
        anim.step(amt)?;
        anim.post_step(amt)?;
        let mid = Instant::now();

        let period = anim
            .core()
            .internal_delay()
            .filter(|delay| !delay.is_zero())
            .or(base_period);
        anim.core().surface().lock().record_timing(FrameTiming {
            generation: mid - start,
            budget: period,
        });

        if let Some(period) = period {
            match pacer.pace(mid, period) {
                Pace::SleepUntil(deadline) => {
                    if stop.wait_until(deadline) {
                        report.stopped = true;
                        break;
                    }
                }
                Pace::OnTime => {}
                Pace::Overrun(took) => {
                    report.overruns += 1;
                    log::warn!(
                        "{}: frame time of {:.0}ms set, but took {:.0}ms",
                        anim.name(),
                        as_ms(period),
                        as_ms(took)
                    );
                }
            }
        }

        let update_start = Instant::now();
        commit(anim, params.manual_commit)?;
        let now = Instant::now();

        let core = anim.core_mut();
        if core.is_complete()
            && params.max_cycles > 0
            && report.cycles < params.max_cycles - 1
        {
            report.cycles += 1;
            core.set_complete(false);
        }

        stats.end_frame(now);
        let step_ms = as_ms(mid - start);
        let update_ms = as_ms(now - update_start);
        log::debug!(
            "{}: {:.0}ms/{:.0}fps / frame: {:.0}ms / update: {:.0}ms",
            anim.name(),
            step_ms + update_ms,
            stats.fps(),
            step_ms,
            update_ms
        );

        report.steps += 1;
    }

    if stop.is_raised() {
        report.stopped = true;
    }
    Ok(())
}

fn commit<A: Animation + ?Sized>(anim: &A, manual: bool) -> Result<()> {
    let mut surface = anim.core().surface().lock();
    if !manual {
        return surface.commit();
    }
    match surface.side_channel() {
        Some(side) => {
            side.pending().raise();
            Ok(())
        }
        None => Err(PixelpaceError::Surface(format!(
            "{}: deferred commit needs a surface with a side channel",
            anim.name()
        ))),
    }
}
