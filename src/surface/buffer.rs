//! In-memory pixel buffer surface and its sinks.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{FrameTiming, Shape, SideChannel, Surface};
use crate::color::Color;
use crate::error::Result;

/// Destination of committed frames (a driver, a network socket, a test
/// recorder).
pub trait Sink: Send {
    /// Push one frame.
    ///
    /// # Errors
    ///
    /// Implementations return
    /// [`PixelpaceError::Surface`](crate::PixelpaceError::Surface) when the
    /// frame cannot be delivered.
    fn push(&mut self, pixels: &[Color]) -> Result<()>;

    /// Block until the last push has been delivered.
    ///
    /// # Errors
    ///
    /// Returns the delivery error of the last push, if any.
    fn wait(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn push(&mut self, _pixels: &[Color]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    last: Vec<Color>,
    count: u64,
}

/// Sink that keeps the last pushed frame and a push counter. Clones share
/// the same record, so a test can keep one clone and hand the other to a
/// surface.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    record: Arc<Mutex<Recorded>>,
}

impl MemorySink {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self) -> MutexGuard<'_, Recorded> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last frame pushed; empty before the first push.
    #[must_use]
    pub fn last_frame(&self) -> Vec<Color> {
        self.record().last.clone()
    }

    /// Number of frames pushed.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.record().count
    }
}

impl Sink for MemorySink {
    fn push(&mut self, pixels: &[Color]) -> Result<()> {
        let mut record = self.record();
        record.last.clear();
        record.last.extend_from_slice(pixels);
        record.count += 1;
        Ok(())
    }
}

/// Heap-backed surface of any shape. Always carries a compositing
/// [`SideChannel`].
pub struct PixelBuffer {
    shape: Shape,
    pixels: Vec<Color>,
    side: SideChannel,
    sink: Box<dyn Sink>,
    timing: FrameTiming,
}

impl PixelBuffer {
    fn with_shape(shape: Shape, len: usize) -> Self {
        Self {
            shape,
            pixels: vec![Color::BLACK; len],
            side: SideChannel::new(len),
            sink: Box::new(NullSink),
            timing: FrameTiming::default(),
        }
    }

    /// Strip of `len` pixels.
    #[must_use]
    pub fn strip(len: usize) -> Self {
        Self::with_shape(Shape::Strip, len)
    }

    /// Row-major `width` × `height` matrix.
    #[must_use]
    pub fn matrix(width: usize, height: usize) -> Self {
        Self::with_shape(Shape::Matrix { width, height }, width * height)
    }

    /// Concentric rings given as inclusive `(first, last)` ranges. The pixel
    /// count is one past the highest index of any ring.
    #[must_use]
    pub fn circle(rings: Vec<(usize, usize)>) -> Self {
        let len = rings.iter().map(|&(_, last)| last + 1).max().unwrap_or(0);
        Self::with_shape(Shape::Circle { rings }, len)
    }

    /// Replace the sink committed frames go to.
    #[must_use]
    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Current pixel contents.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("shape", &self.shape)
            .field("len", &self.pixels.len())
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl Surface for PixelBuffer {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn get(&self, index: usize) -> Color {
        self.pixels.get(index).copied().unwrap_or_default()
    }

    fn set(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
    }

    fn commit(&mut self) -> Result<()> {
        self.sink.push(&self.pixels)
    }

    fn wait_for_commit(&mut self) -> Result<()> {
        self.sink.wait()
    }

    fn record_timing(&mut self, timing: FrameTiming) {
        self.timing = timing;
    }

    fn timing(&self) -> FrameTiming {
        self.timing
    }

    fn side_channel(&self) -> Option<&SideChannel> {
        Some(&self.side)
    }

    fn side_channel_mut(&mut self) -> Option<&mut SideChannel> {
        Some(&mut self.side)
    }
}
