//! Master compositor: runs several animations concurrently, each on its own
//! surface and clock, and merges their frames into one destination surface.
//!
//! Children run threaded with deferred commit. Instead of pushing pixels
//! they raise their surface's pending-update signal, which wakes the
//! compositor through a shared [`Notifier`]. Each compositor tick merges
//! every signaling child by pixel height (see [`blend`]) and then releases
//! them to draw their next frame. Children that stayed silent leave their
//! destination pixels as they were.
//!
//! ```ignore
//! let tracks = vec![
//!     TrackSpec::new(worm_a, 20.0).with_pixmap(path_a).with_heights(1.0),
//!     TrackSpec::new(worm_b, 30.0).with_pixmap(path_b),
//! ];
//! let compositor = Compositor::new(matrix, tracks, Duration::from_secs(10))?;
//! Runner::new(compositor).run(RunParams::default())?;
//! ```

pub mod blend;

use rustc_hash::{FxHashMap, FxHashSet};
use web_time::{Duration, Instant};

use crate::animation::{period_from_rate, Animation, AnimationCore, RunParams, Runner};
use crate::error::{ConfigError, Result};
use crate::signal::{Notifier, UpdateSignal};
use crate::surface::{SideChannel, SurfaceHandle, SurfaceId};

/// Per-pixel heights of a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Heights {
    /// Every pixel at height zero.
    #[default]
    Zero,
    /// Every pixel at the same height.
    Uniform(f32),
    /// One height per source pixel.
    PerPixel(Vec<f32>),
}

impl Heights {
    fn resolve(self, track: usize, len: usize) -> std::result::Result<Vec<f32>, ConfigError> {
        match self {
            Self::Zero => Ok(vec![0.0; len]),
            Self::Uniform(h) => Ok(vec![h; len]),
            Self::PerPixel(v) if v.len() == len => Ok(v),
            Self::PerPixel(v) => Err(ConfigError::HeightsLength {
                track,
                expected: len,
                found: v.len(),
            }),
        }
    }
}

impl From<f32> for Heights {
    fn from(h: f32) -> Self {
        Self::Uniform(h)
    }
}

impl From<Vec<f32>> for Heights {
    fn from(v: Vec<f32>) -> Self {
        Self::PerPixel(v)
    }
}

/// One compositor input: an animation on its own surface, where its pixels
/// land on the destination, how high they stand and how fast it runs.
pub struct TrackSpec {
    animation: Box<dyn Animation>,
    pixmap: Option<Vec<usize>>,
    heights: Heights,
    fps: f64,
    max_steps: Option<u64>,
}

impl TrackSpec {
    /// Track running `animation` at `fps`, mapped onto the destination's
    /// first pixels in order, at height zero.
    pub fn new(animation: impl Animation, fps: f64) -> Self {
        Self::boxed(Box::new(animation), fps)
    }

    /// Like [`new`](Self::new) for an already boxed animation.
    #[must_use]
    pub fn boxed(animation: Box<dyn Animation>, fps: f64) -> Self {
        Self {
            animation,
            pixmap: None,
            heights: Heights::Zero,
            fps,
            max_steps: None,
        }
    }

    /// Destination index of each source pixel.
    #[must_use]
    pub fn with_pixmap(mut self, pixmap: Vec<usize>) -> Self {
        self.pixmap = Some(pixmap);
        self
    }

    /// Heights of the source pixels.
    #[must_use]
    pub fn with_heights(mut self, heights: impl Into<Heights>) -> Self {
        self.heights = heights.into();
        self
    }

    /// Fixed step budget. Without one the track runs for the compositor's
    /// runtime at its own rate.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

impl std::fmt::Debug for TrackSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackSpec")
            .field("animation", &self.animation.name())
            .field("fps", &self.fps)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

struct Track {
    runner: Runner<Box<dyn Animation>>,
    surface: SurfaceHandle,
    pending: UpdateSignal,
    pixmap: Vec<usize>,
    fps: f64,
    max_steps: Option<u64>,
}

impl Track {
    fn params(&self, runtime: Duration) -> RunParams {
        let steps = self
            .max_steps
            .unwrap_or_else(|| (runtime.as_secs_f64() * self.fps).round() as u64)
            .max(1);
        RunParams::default()
            .with_fps(self.fps)
            .with_max_steps(steps)
            .threaded()
            .manual_commit()
    }
}

/// Validated layout of one track, computed before anything is touched.
struct Layout {
    len: usize,
    pixmap: Vec<usize>,
    heights: Vec<f32>,
}

fn check_track(
    index: usize,
    spec: &mut TrackSpec,
    dest: &SurfaceHandle,
    dest_len: usize,
    seen: &mut FxHashMap<SurfaceId, usize>,
) -> std::result::Result<Layout, ConfigError> {
    let surface = spec.animation.core().surface().clone();
    if surface.same_as(dest) {
        return Err(ConfigError::SharedWithDestination { track: index });
    }
    if let Some(&first) = seen.get(&surface.id()) {
        return Err(ConfigError::DuplicateSurface {
            first,
            second: index,
        });
    }
    let _ = seen.insert(surface.id(), index);

    if period_from_rate(spec.fps).is_none() {
        return Err(ConfigError::InvalidRate {
            track: index,
            rate: spec.fps,
        });
    }

    let (len, has_side) = {
        let guard = surface.lock();
        (guard.len(), guard.side_channel().is_some())
    };
    if !has_side {
        return Err(ConfigError::MissingSideChannel { track: index });
    }

    let pixmap = spec.pixmap.take().unwrap_or_else(|| (0..len).collect());
    if pixmap.len() != len {
        return Err(ConfigError::PixmapLength {
            track: index,
            expected: len,
            found: pixmap.len(),
        });
    }
    if let Some(&bad) = pixmap.iter().find(|&&i| i >= dest_len) {
        return Err(ConfigError::PixmapOutOfRange {
            track: index,
            index: bad,
            len: dest_len,
        });
    }

    let mut targets = FxHashSet::default();
    if let Some(&twice) = pixmap.iter().find(|&&i| !targets.insert(i)) {
        return Err(ConfigError::PixmapDuplicate {
            track: index,
            index: twice,
        });
    }

    let heights = std::mem::take(&mut spec.heights).resolve(index, len)?;
    Ok(Layout {
        len,
        pixmap,
        heights,
    })
}

/// An animation that composites concurrently running child animations.
///
/// The compositor always runs until complete, which happens when it is
/// stopped or when every child has stopped. A `fps` on its own run only caps
/// how often it composites; faster child frames are merged into fewer
/// commits.
pub struct Compositor {
    core: AnimationCore,
    tracks: Vec<Track>,
    runtime: Duration,
    poll_interval: Duration,
    notifier: Notifier,
    dest_heights: Vec<f32>,
    active: Vec<usize>,
    active_pixels: FxHashSet<usize>,
    activations: Vec<Vec<f64>>,
    started: Instant,
}

impl Compositor {
    /// Default upper bound on how long the compositor sleeps between checks
    /// of its stop signal and its children's liveness.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2);

    /// Validate `tracks` and bind them to `surface`.
    ///
    /// Nothing is started and no child surface is modified unless every
    /// track is valid.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if there are no tracks, two tracks share a
    /// surface, a track shares the destination surface, a track's surface
    /// has no side channel, a pixel or height map has the wrong length, a
    /// pixel map points outside the destination or twice at one pixel, or a
    /// rate gives no usable frame period.
    pub fn new(
        surface: SurfaceHandle,
        tracks: Vec<TrackSpec>,
        runtime: Duration,
    ) -> Result<Self> {
        if tracks.is_empty() {
            log::error!("compositor: {}", ConfigError::NoTracks);
            return Err(ConfigError::NoTracks.into());
        }

        let dest_len = surface.len();
        let mut seen = FxHashMap::default();
        let mut checked = Vec::with_capacity(tracks.len());
        for (index, mut spec) in tracks.into_iter().enumerate() {
            match check_track(index, &mut spec, &surface, dest_len, &mut seen) {
                Ok(layout) => checked.push((spec, layout)),
                Err(e) => {
                    log::error!("compositor: {e}");
                    return Err(e.into());
                }
            }
        }

        let core = AnimationCore::any(surface).with_name("compositor");
        let notifier = Notifier::new();
        let mut installed = Vec::with_capacity(checked.len());
        for (spec, layout) in checked {
            let surface = spec.animation.core().surface().clone();
            let pending = {
                let mut guard = surface.lock();
                let Some(side) = guard.side_channel_mut() else {
                    return Err(ConfigError::MissingSideChannel {
                        track: installed.len(),
                    }
                    .into());
                };
                for (slot, &h) in side.heights_mut().iter_mut().zip(&layout.heights) {
                    *slot = h;
                }
                side.pending().clear();
                side.pending().attach(notifier.clone());
                side.pending().clone()
            };
            log::debug!(
                "compositor: track {} '{}' with {} pixels at {} fps",
                installed.len(),
                spec.animation.name(),
                layout.len,
                spec.fps
            );
            let runner = Runner::new(spec.animation);
            core.stop_signal().link(runner.stop_signal().clone());
            installed.push(Track {
                runner,
                surface,
                pending,
                pixmap: layout.pixmap,
                fps: spec.fps,
                max_steps: spec.max_steps,
            });
        }

        let activations = vec![Vec::new(); installed.len()];
        Ok(Self {
            core,
            tracks: installed,
            runtime,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            notifier,
            dest_heights: vec![blend::FLOOR; dest_len],
            active: Vec::new(),
            active_pixels: FxHashSet::default(),
            activations,
            started: Instant::now(),
        })
    }

    /// Set the upper bound on the compositor's wait between checks.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_micros(100));
        self
    }

    /// Number of tracks.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Per track, milliseconds since the run started at which the track was
    /// composited.
    #[must_use]
    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    /// [`activations`](Self::activations) as a JSON array of arrays.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::Json`](crate::PixelpaceError::Json) if
    /// serialization fails.
    pub fn activations_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.activations)?)
    }

    /// Destination heights after the last tick.
    #[must_use]
    pub fn dest_heights(&self) -> &[f32] {
        &self.dest_heights
    }

    /// Tracks composited in the last tick.
    #[must_use]
    pub fn active_tracks(&self) -> &[usize] {
        &self.active
    }

    /// Destination pixels covered by the last tick's active tracks.
    #[must_use]
    pub const fn active_pixels(&self) -> &FxHashSet<usize> {
        &self.active_pixels
    }

    /// Whether no child worker is running.
    #[must_use]
    pub fn children_stopped(&self) -> bool {
        self.tracks.iter().all(|t| t.runner.is_stopped())
    }

    fn collect_active(&mut self) {
        self.active.clear();
        self.active.extend(
            self.tracks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.pending.is_pending())
                .map(|(i, _)| i),
        );
    }

    fn stop_children(&mut self) {
        for track in &mut self.tracks {
            if let Err(e) = track.runner.stop(true) {
                log::error!("compositor: track '{}': {e}", track.runner.name());
            }
        }
    }
}

impl Animation for Compositor {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn prepare_run(&mut self, params: &mut RunParams) {
        params.amt = 1;
        params.sleep_ms = None;
        params.until_complete = true;
        params.max_cycles = 0;
    }

    fn pre_run(&mut self) -> Result<()> {
        self.core.surface().lock().clear();
        self.dest_heights.fill(blend::FLOOR);
        for series in &mut self.activations {
            series.clear();
        }
        for track in &self.tracks {
            track.pending.clear();
        }
        self.started = Instant::now();

        for index in 0..self.tracks.len() {
            let params = self.tracks[index].params(self.runtime);
            if let Err(e) = self.tracks[index].runner.run(params) {
                log::error!("compositor: could not start track {index}: {e}");
                self.stop_children();
                return Err(e);
            }
        }
        log::info!("compositor: started {} tracks", self.tracks.len());
        Ok(())
    }

    fn pre_step(&mut self, _amt: usize) -> Result<()> {
        loop {
            let seen = self.notifier.generation();
            self.collect_active();
            if !self.active.is_empty() {
                break;
            }
            if self.core.stop_signal().is_raised() {
                self.core.set_complete(true);
                break;
            }
            if self.children_stopped() {
                // A child may have presented its last frame after the scan.
                self.collect_active();
                if self.active.is_empty() {
                    self.core.set_complete(true);
                }
                break;
            }
            let _ = self.notifier.wait_past(seen, self.poll_interval);
        }

        self.active_pixels.clear();
        for &i in &self.active {
            self.active_pixels.extend(self.tracks[i].pixmap.iter().copied());
        }
        Ok(())
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        let elapsed = self.started.elapsed().as_secs_f64() * 1000.0;
        for &i in &self.active {
            self.activations[i].push(elapsed);
        }

        self.dest_heights.fill(blend::FLOOR);
        {
            let mut dest = self.core.surface().lock();
            for &i in &self.active {
                let track = &self.tracks[i];
                let src = track.surface.lock();
                let heights = src.side_channel().map_or(&[][..], SideChannel::heights);
                blend::blend_into(
                    &mut *dest,
                    &mut self.dest_heights,
                    &*src,
                    heights,
                    &track.pixmap,
                );
            }
        }

        self.core.advance_step(amt);
        Ok(())
    }

    fn post_step(&mut self, _amt: usize) -> Result<()> {
        for &i in &self.active {
            self.tracks[i].pending.clear();
        }
        Ok(())
    }

    fn post_run(&mut self) {
        self.stop_children();
        log::info!(
            "compositor: finished after {} ticks",
            self.core.step_count()
        );
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("core", &self.core)
            .field("tracks", &self.tracks.len())
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::animation::testing::Counter;
    use crate::color::Color;
    use crate::error::PixelpaceError;
    use crate::surface::{MemorySink, PixelBuffer};

    fn strip(len: usize) -> SurfaceHandle {
        SurfaceHandle::new(PixelBuffer::strip(len))
    }

    fn painted(len: usize, color: Color) -> Counter {
        let mut c = Counter::new(len);
        c.color = color;
        c
    }

    /// Paint a child surface and raise its pending flag, as a child frame
    /// loop with deferred commit would.
    fn present(comp: &Compositor, track: usize, color: Color) {
        let mut surface = comp.tracks[track].surface.lock();
        let len = surface.len();
        surface.fill(color, 0, len - 1);
        surface.side_channel().unwrap().pending().raise();
    }

    fn tick(comp: &mut Compositor) {
        comp.pre_step(1).unwrap();
        comp.step(1).unwrap();
        comp.post_step(1).unwrap();
    }

    fn dest_pixel(comp: &Compositor, index: usize) -> Color {
        comp.core().surface().lock().get(index)
    }

    #[test]
    fn equal_heights_mix_by_xor_in_either_order() {
        let red = Color(255, 0, 0);
        let green = Color(0, 255, 0);
        for (first, second) in [(red, green), (green, red)] {
            let tracks = vec![
                TrackSpec::new(Counter::new(1), 10.0).with_pixmap(vec![0]),
                TrackSpec::new(Counter::new(1), 10.0).with_pixmap(vec![0]),
            ];
            let mut comp = Compositor::new(strip(1), tracks, Duration::from_secs(1)).unwrap();
            present(&comp, 0, first);
            present(&comp, 1, second);
            tick(&mut comp);

            assert_eq!(comp.active_tracks(), &[0, 1]);
            assert_eq!(dest_pixel(&comp, 0), Color(255, 255, 0));
            assert_eq!(comp.dest_heights(), &[0.0]);
        }
    }

    #[test]
    fn higher_track_wins() {
        let tracks = vec![
            TrackSpec::new(Counter::new(1), 10.0).with_heights(3.0),
            TrackSpec::new(Counter::new(1), 10.0).with_heights(5.0),
        ];
        let mut comp = Compositor::new(strip(1), tracks, Duration::from_secs(1)).unwrap();
        present(&comp, 1, Color::BLUE);
        present(&comp, 0, Color::RED);
        tick(&mut comp);

        assert_eq!(dest_pixel(&comp, 0), Color::BLUE);
        assert_eq!(comp.dest_heights(), &[5.0]);
    }

    #[test]
    fn silent_track_leaves_its_pixels() {
        let tracks = vec![
            TrackSpec::new(Counter::new(2), 10.0).with_pixmap(vec![0, 1]),
            TrackSpec::new(Counter::new(2), 10.0).with_pixmap(vec![2, 3]),
        ];
        let mut comp = Compositor::new(strip(4), tracks, Duration::from_secs(1)).unwrap();
        present(&comp, 0, Color::RED);
        present(&comp, 1, Color::GREEN);
        tick(&mut comp);

        present(&comp, 0, Color::BLUE);
        tick(&mut comp);

        assert_eq!(comp.active_tracks(), &[0]);
        assert_eq!(comp.active_pixels().len(), 2);
        assert_eq!(dest_pixel(&comp, 0), Color::BLUE);
        assert_eq!(dest_pixel(&comp, 2), Color::GREEN);
        assert_eq!(dest_pixel(&comp, 3), Color::GREEN);
        assert!(!comp.tracks[0].pending.is_pending());
    }

    #[test]
    fn per_pixel_heights_are_installed_on_children() {
        let child = Counter::new(3);
        let surface = child.core.surface().clone();
        let tracks = vec![TrackSpec::new(child, 10.0).with_heights(vec![1.0, 2.0, 3.0])];
        let _comp = Compositor::new(strip(3), tracks, Duration::from_secs(1)).unwrap();
        let guard = surface.lock();
        assert_eq!(guard.side_channel().unwrap().heights(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn rejects_shared_surfaces() {
        let shared = strip(2);
        let tracks = vec![
            TrackSpec::new(Counter::on(shared.clone()), 10.0),
            TrackSpec::new(Counter::new(2), 10.0),
            TrackSpec::new(Counter::on(shared), 10.0),
        ];
        let err = Compositor::new(strip(2), tracks, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(
            err,
            PixelpaceError::Config(ConfigError::DuplicateSurface { first: 0, second: 2 })
        ));

        let dest = strip(2);
        let tracks = vec![TrackSpec::new(Counter::on(dest.clone()), 10.0)];
        let err = Compositor::new(dest, tracks, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(
            err,
            PixelpaceError::Config(ConfigError::SharedWithDestination { track: 0 })
        ));
    }

    #[test]
    fn rejects_malformed_maps() {
        let cases = vec![
            (
                TrackSpec::new(Counter::new(3), 10.0).with_heights(vec![1.0, 2.0]),
                ConfigError::HeightsLength {
                    track: 0,
                    expected: 3,
                    found: 2,
                },
            ),
            (
                TrackSpec::new(Counter::new(3), 10.0).with_pixmap(vec![0, 1]),
                ConfigError::PixmapLength {
                    track: 0,
                    expected: 3,
                    found: 2,
                },
            ),
            (
                TrackSpec::new(Counter::new(2), 10.0).with_pixmap(vec![0, 9]),
                ConfigError::PixmapOutOfRange {
                    track: 0,
                    index: 9,
                    len: 4,
                },
            ),
            (
                TrackSpec::new(Counter::new(3), 10.0).with_pixmap(vec![2, 0, 2]),
                ConfigError::PixmapDuplicate { track: 0, index: 2 },
            ),
            (
                TrackSpec::new(Counter::new(2), 0.0),
                ConfigError::InvalidRate {
                    track: 0,
                    rate: 0.0,
                },
            ),
            (
                TrackSpec::new(Counter::new(2), 1e-30),
                ConfigError::InvalidRate {
                    track: 0,
                    rate: 1e-30,
                },
            ),
            (
                TrackSpec::new(Counter::new(2), 1e30),
                ConfigError::InvalidRate {
                    track: 0,
                    rate: 1e30,
                },
            ),
        ];
        for (spec, expected) in cases {
            match Compositor::new(strip(4), vec![spec], Duration::from_secs(1)) {
                Err(PixelpaceError::Config(e)) => assert_eq!(e, expected),
                other => unreachable!("expected {expected:?}, got {other:?}"),
            }
        }

        let err = Compositor::new(strip(4), Vec::new(), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, PixelpaceError::Config(ConfigError::NoTracks)));
    }

    #[test]
    fn rejection_leaves_earlier_tracks_untouched() {
        let first = Counter::new(2);
        let first_surface = first.core.surface().clone();
        let tracks = vec![
            TrackSpec::new(first, 10.0).with_heights(7.0),
            TrackSpec::new(Counter::new(2), 10.0).with_heights(vec![1.0]),
        ];
        assert!(Compositor::new(strip(2), tracks, Duration::from_secs(1)).is_err());
        let guard = first_surface.lock();
        assert_eq!(guard.side_channel().unwrap().heights(), &[0.0, 0.0]);
    }

    #[test]
    fn last_frame_of_finished_children_is_blended() {
        let tracks = vec![
            TrackSpec::new(Counter::new(1), 10.0),
            TrackSpec::new(Counter::new(1), 10.0).with_heights(1.0),
        ];
        let dest = SurfaceHandle::new(PixelBuffer::strip(1));
        let mut comp = Compositor::new(dest, tracks, Duration::from_secs(1)).unwrap();
        assert!(comp.children_stopped());

        present(&comp, 1, Color::GREEN);
        tick(&mut comp);
        assert!(!comp.core().is_complete());
        assert_eq!(comp.active_tracks(), &[1]);
        assert_eq!(dest_pixel(&comp, 0), Color::GREEN);

        comp.pre_step(1).unwrap();
        assert!(comp.active_tracks().is_empty());
        assert!(comp.core().is_complete());
    }

    #[test]
    fn runs_children_to_completion() {
        let sink = MemorySink::new();
        let dest = SurfaceHandle::new(PixelBuffer::strip(4).with_sink(sink.clone()));
        let tracks = vec![
            TrackSpec::new(painted(2, Color::RED), 100.0).with_pixmap(vec![0, 1]),
            TrackSpec::new(painted(2, Color::BLUE), 50.0)
                .with_pixmap(vec![2, 3])
                .with_max_steps(3),
        ];
        let comp = Compositor::new(dest, tracks, Duration::from_millis(100)).unwrap();
        let mut runner = Runner::new(comp);
        let report = runner.run(RunParams::default()).unwrap().unwrap();

        assert!(report.steps > 0);
        assert!(!report.stopped);
        assert_eq!(
            sink.last_frame(),
            vec![Color::RED, Color::RED, Color::BLUE, Color::BLUE]
        );
        runner.with_animation(|c| {
            assert!(c.children_stopped());
            assert!(!c.activations()[0].is_empty());
            assert!(c.activations()[1].len() <= 3);
            assert!(c.activations_json().unwrap().starts_with("[["));
        });
    }

    #[test]
    fn stop_waits_for_every_child() {
        let tracks = vec![
            TrackSpec::new(Counter::new(2), 50.0),
            TrackSpec::new(Counter::new(2), 30.0),
        ];
        let comp = Compositor::new(strip(2), tracks, Duration::from_secs(30))
            .unwrap()
            .with_poll_interval(Duration::from_millis(1));
        let mut runner = Runner::new(comp);
        let _ = runner.run(RunParams::default().threaded()).unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(!runner.is_stopped());

        let t = Instant::now();
        runner.stop(true).unwrap();
        assert!(t.elapsed() < Duration::from_secs(2));
        assert!(runner.is_stopped());
        runner.with_animation(|c| {
            assert!(c.children_stopped());
            assert!(c.core().is_complete());
        });
    }
}
