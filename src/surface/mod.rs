//! Addressable pixel surfaces as seen by the scheduler and compositor.
//!
//! Concrete hardware transport lives behind [`Sink`]; the crate ships one
//! in-memory implementation, [`PixelBuffer`]. Anything else only has to
//! implement [`Surface`].

mod buffer;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use buffer::{MemorySink, NullSink, PixelBuffer, Sink};
use web_time::Duration;

use crate::color::Color;
use crate::error::Result;
use crate::signal::UpdateSignal;

/// Shape category of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// One-dimensional strip.
    Strip,
    /// Row-major 2D matrix.
    Matrix,
    /// Concentric rings.
    Circle,
}

/// Geometry of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Linear strip; index is position.
    Strip,
    /// Row-major matrix.
    Matrix {
        /// Pixels per row.
        width: usize,
        /// Number of rows.
        height: usize,
    },
    /// Concentric rings, each an inclusive `(first, last)` index range.
    Circle {
        /// Ring boundaries, innermost first.
        rings: Vec<(usize, usize)>,
    },
}

impl Shape {
    /// Shape category.
    #[must_use]
    pub const fn kind(&self) -> SurfaceKind {
        match self {
            Self::Strip => SurfaceKind::Strip,
            Self::Matrix { .. } => SurfaceKind::Matrix,
            Self::Circle { .. } => SurfaceKind::Circle,
        }
    }

    /// Matrix dimensions, if this is a matrix.
    #[must_use]
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            Self::Matrix { width, height } => Some((*width, *height)),
            _ => None,
        }
    }

    /// Pixel index of matrix coordinate `(x, y)`. `None` off the matrix or
    /// on a non-matrix surface.
    #[must_use]
    pub const fn xy(&self, x: usize, y: usize) -> Option<usize> {
        match self {
            Self::Matrix { width, height } if x < *width && y < *height => {
                Some(y * *width + x)
            }
            _ => None,
        }
    }

    /// Ring boundaries; empty unless this is a circle.
    #[must_use]
    pub fn rings(&self) -> &[(usize, usize)] {
        match self {
            Self::Circle { rings } => rings,
            _ => &[],
        }
    }

    /// Pixel count of each ring.
    #[must_use]
    pub fn ring_steps(&self) -> Vec<usize> {
        self.rings()
            .iter()
            .map(|&(first, last)| last.saturating_sub(first) + 1)
            .collect()
    }
}

/// Timing diagnostics the scheduler writes to a surface every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTiming {
    /// Time spent in the animation's hooks this tick.
    pub generation: Duration,
    /// Frame period budgeted for this tick, if the loop is paced.
    pub budget: Option<Duration>,
}

/// Per-pixel heights and pending-update flag. Present on surfaces that can
/// feed a [`Compositor`](crate::compositor::Compositor).
#[derive(Debug, Clone, Default)]
pub struct SideChannel {
    heights: Vec<f32>,
    pending: UpdateSignal,
}

impl SideChannel {
    /// Side channel for `len` pixels, all at height zero.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            heights: vec![0.0; len],
            pending: UpdateSignal::new(),
        }
    }

    /// Per-pixel heights.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Mutable per-pixel heights. Animations may raise or lower individual
    /// pixels between frames.
    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    /// Pending-update flag shared with the consuming compositor.
    #[must_use]
    pub const fn pending(&self) -> &UpdateSignal {
        &self.pending
    }
}

/// An addressable pixel buffer with a commit operation.
pub trait Surface: Send {
    /// Number of addressable pixels.
    fn len(&self) -> usize;

    /// Whether the surface has no pixels.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Geometry of the surface.
    fn shape(&self) -> &Shape;

    /// Color at `index`; black when out of range.
    fn get(&self, index: usize) -> Color;

    /// Set the color at `index`; out-of-range writes are ignored.
    fn set(&mut self, index: usize, color: Color);

    /// Fill the inclusive range `first..=last` (clamped to the surface).
    fn fill(&mut self, color: Color, first: usize, last: usize) {
        let end = last.min(self.len().saturating_sub(1));
        for index in first..=end {
            self.set(index, color);
        }
    }

    /// Turn every pixel off.
    fn clear(&mut self) {
        if !self.is_empty() {
            self.fill(Color::BLACK, 0, self.len() - 1);
        }
    }

    /// Publish the buffer to its sink.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::Surface`](crate::PixelpaceError::Surface)
    /// if the sink rejects the frame.
    fn commit(&mut self) -> Result<()>;

    /// Block until an in-flight asynchronous commit finishes.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the commit failed.
    fn wait_for_commit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Record the scheduler's timing for the last tick.
    fn record_timing(&mut self, _timing: FrameTiming) {}

    /// Timing recorded for the last tick, if the surface keeps it.
    fn timing(&self) -> FrameTiming {
        FrameTiming::default()
    }

    /// Compositing side channel, if supported.
    fn side_channel(&self) -> Option<&SideChannel> {
        None
    }

    /// Mutable compositing side channel, if supported.
    fn side_channel_mut(&mut self) -> Option<&mut SideChannel> {
        None
    }
}

/// Opaque identity of a surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

/// Shared handle to a surface.
///
/// Cloning the handle does not copy the surface: all clones refer to the
/// same instance and report the same [`SurfaceId`].
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<dyn Surface>>,
}

impl SurfaceHandle {
    /// Wrap a surface in a shareable handle.
    pub fn new<S: Surface + 'static>(surface: S) -> Self {
        let inner: Arc<Mutex<dyn Surface>> = Arc::new(Mutex::new(surface));
        Self { inner }
    }

    /// Lock the surface for reading or writing.
    ///
    /// A poisoned lock is recovered: a surface is a plain pixel buffer and
    /// stays usable after a panicking writer.
    pub fn lock(&self) -> MutexGuard<'_, dyn Surface + 'static> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identity of the underlying surface.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        SurfaceId(Arc::as_ptr(&self.inner).cast::<()>() as usize)
    }

    /// Whether both handles refer to the same surface instance.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Shape category of the surface.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.lock().shape().kind()
    }

    /// Pixel count of the surface.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the surface has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}
