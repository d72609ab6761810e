use crate::animation::{Animation, AnimationCore};
use crate::color::Color;
use crate::error::Result;
use crate::surface::SurfaceHandle;

/// A segmented worm crawling along a path of strip pixels.
///
/// Segment colors run head first and are followed by one black segment that
/// erases the tail. Each segment also writes its height into the surface's
/// side channel, so worms composited onto one destination cross over or
/// under each other. The tail eraser sits at height -1.
///
/// The worm moves one path position every `cycle_len` steps. Its position
/// is kept across runs, so a second run continues where the first stopped.
#[derive(Debug)]
pub struct Worm {
    core: AnimationCore,
    colors: Vec<Color>,
    heights: Vec<f32>,
    path: Vec<usize>,
    cycle_len: usize,
    direction: isize,
    head: isize,
    active_count: usize,
}

impl Worm {
    /// Worm with `colors` crawling over the whole strip, one pixel per step,
    /// at height zero.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`](crate::PixelpaceError::WrongSurface)
    /// unless `surface` is a strip.
    pub fn new(surface: SurfaceHandle, colors: Vec<Color>) -> Result<Self> {
        let len = surface.len();
        let core = AnimationCore::strip(surface)?.with_name("worm");
        let mut colors = colors;
        colors.push(Color::BLACK);
        let mut heights = vec![0.0; colors.len() - 1];
        heights.push(-1.0);
        Ok(Self {
            core,
            colors,
            heights,
            path: (0..len).collect(),
            cycle_len: 1,
            direction: 1,
            head: -1,
            active_count: 0,
        })
    }

    /// Crawl over these pixel indices instead of the whole strip. An empty
    /// path is ignored.
    #[must_use]
    pub fn with_path(mut self, path: Vec<usize>) -> Self {
        if !path.is_empty() {
            self.path = path;
        }
        self
    }

    /// Move only every `cycle_len` steps.
    #[must_use]
    pub fn with_cycle_len(mut self, cycle_len: usize) -> Self {
        self.cycle_len = cycle_len.max(1);
        self
    }

    /// Crawl backwards along the path.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.direction = -1;
        self.head = 1;
        self
    }

    /// Height of every colored segment.
    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        let n = self.heights.len() - 1;
        self.heights[..n].fill(height);
        self
    }

    /// Height of each colored segment, head first. Missing entries keep
    /// their previous height; extra entries are ignored.
    #[must_use]
    pub fn with_heights(mut self, heights: &[f32]) -> Self {
        let n = self.heights.len() - 1;
        for (slot, &h) in self.heights[..n].iter_mut().zip(heights) {
            *slot = h;
        }
        self
    }

    /// Path position of the head.
    #[must_use]
    pub fn head(&self) -> usize {
        self.head.rem_euclid(self.path.len().max(1) as isize) as usize
    }

    /// Pixel indices the worm crawls over.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}

impl Animation for Worm {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        if self.active_count == 0 && !self.path.is_empty() {
            let len = self.path.len() as isize;
            self.head = (self.head + amt as isize * self.direction).rem_euclid(len);
            let mut pos = self.head;
            let mut surface = self.core.surface().lock();
            for (&color, &height) in self.colors.iter().zip(&self.heights) {
                let pixel = self.path[pos as usize];
                surface.set(pixel, color);
                if let Some(side) = surface.side_channel_mut() {
                    if let Some(h) = side.heights_mut().get_mut(pixel) {
                        *h = height;
                    }
                }
                pos = (pos - self.direction).rem_euclid(len);
            }
        }
        self.active_count = (self.active_count + amt) % self.cycle_len;
        self.core.advance_step(amt);
        Ok(())
    }
}

/// Path around a rectangle on a strip wound helically `turns` times around
/// a cylinder with `rounds` pixels per turn, so pixel `x + y * rounds` sits
/// at column `x`, row `y`.
///
/// The path climbs column `left` from row `bottom`, runs along row `top`,
/// descends column `right` and returns along row `bottom`. Every index is
/// offset by `shift` modulo the strip length. A degenerate rectangle yields
/// its single corner.
#[must_use]
pub fn path_around_rect(
    left: usize,
    right: usize,
    bottom: usize,
    top: usize,
    shift: usize,
    turns: usize,
    rounds: usize,
) -> Vec<usize> {
    let ind = |x: usize, y: usize| x + y * rounds;
    let len = (rounds * turns).max(1);

    let mut path: Vec<usize> = (bottom..top).map(|y| ind(left, y)).collect();
    path.extend((left..right).map(|x| ind(x, top)));
    path.extend((bottom + 1..=top).rev().map(|y| ind(right, y)));
    path.extend((left + 1..=right).rev().map(|x| ind(x, bottom)));
    if path.is_empty() {
        path.push(ind(left, bottom));
    }
    for p in &mut path {
        *p = (*p + shift) % len;
    }
    path
}
