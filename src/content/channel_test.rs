use web_time::Duration;

use crate::animation::{Animation, AnimationCore};
use crate::color::Color;
use crate::error::Result;
use crate::surface::{Surface, SurfaceHandle};

const CYCLE: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
const CHANNEL_DELAY: Duration = Duration::from_millis(500);

/// Wiring pattern: one red, two green and three blue pixels, then three
/// pixels cycling through red, green, blue and white.
#[derive(Debug)]
pub struct StripChannelTest {
    core: AnimationCore,
}

impl StripChannelTest {
    /// Channel test on a strip.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`](crate::PixelpaceError::WrongSurface)
    /// unless `surface` is a strip.
    pub fn new(surface: SurfaceHandle) -> Result<Self> {
        let mut core = AnimationCore::strip(surface)?.with_name("strip-channel-test");
        core.set_internal_delay(Some(CHANNEL_DELAY));
        Ok(Self { core })
    }
}

impl Animation for StripChannelTest {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        let cycle = CYCLE[(self.core.step_count() % 4) as usize];
        {
            let mut s = self.core.surface().lock();
            s.set(0, Color::RED);
            s.fill(Color::GREEN, 1, 2);
            s.fill(Color::BLUE, 3, 5);
            s.fill(cycle, 7, 9);
        }
        self.core.advance_step(amt);
        Ok(())
    }
}

fn column(s: &mut dyn Surface, x: usize, rows: usize, color: Color) {
    for y in 0..rows {
        if let Some(i) = s.shape().xy(x, y) {
            s.set(i, color);
        }
    }
}

fn matrix_height(core: &AnimationCore) -> usize {
    core.surface()
        .lock()
        .shape()
        .dimensions()
        .map_or(0, |(_, h)| h)
}

/// The strip channel pattern drawn as full-height columns.
#[derive(Debug)]
pub struct MatrixChannelTest {
    core: AnimationCore,
    height: usize,
}

impl MatrixChannelTest {
    /// Channel test on a matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`](crate::PixelpaceError::WrongSurface)
    /// unless `surface` is a matrix.
    pub fn new(surface: SurfaceHandle) -> Result<Self> {
        let mut core = AnimationCore::matrix(surface)?.with_name("matrix-channel-test");
        core.set_internal_delay(Some(CHANNEL_DELAY));
        let height = matrix_height(&core);
        Ok(Self { core, height })
    }
}

impl Animation for MatrixChannelTest {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        let cycle = CYCLE[(self.core.step_count() % 4) as usize];
        {
            let mut s = self.core.surface().lock();
            let columns = [
                Color::RED,
                Color::GREEN,
                Color::GREEN,
                Color::BLUE,
                Color::BLUE,
                Color::BLUE,
            ];
            for (x, color) in columns.into_iter().enumerate() {
                column(&mut *s, x, self.height, color);
            }
            for x in 7..10 {
                column(&mut *s, x, self.height, cycle);
            }
        }
        self.core.advance_step(amt);
        Ok(())
    }
}

/// Sweeps a growing staircase of colored columns across the matrix, to
/// check orientation. Reports completion after the widest frame.
#[derive(Debug)]
pub struct MatrixCalibrationTest {
    core: AnimationCore,
    width: usize,
}

impl MatrixCalibrationTest {
    const COLORS: [Color; 6] = [
        Color::RED,
        Color::GREEN,
        Color::GREEN,
        Color::BLUE,
        Color::BLUE,
        Color::BLUE,
    ];

    /// Calibration sweep on a matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PixelpaceError::WrongSurface`](crate::PixelpaceError::WrongSurface)
    /// unless `surface` is a matrix.
    pub fn new(surface: SurfaceHandle) -> Result<Self> {
        let mut core = AnimationCore::matrix(surface)?.with_name("matrix-calibration");
        core.set_internal_delay(Some(CHANNEL_DELAY));
        let width = core
            .surface()
            .lock()
            .shape()
            .dimensions()
            .map_or(0, |(w, _)| w);
        Ok(Self { core, width })
    }
}

impl Animation for MatrixCalibrationTest {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        let width = self.width.max(1);
        let i = (self.core.step_count() % width as u64) as usize;
        {
            let mut s = self.core.surface().lock();
            s.clear();
            for x in 0..=i {
                column(&mut *s, x, i + 1, Self::COLORS[x % Self::COLORS.len()]);
            }
        }
        self.core.set_complete(i == width - 1);
        self.core.advance_step(amt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{run_frames, RunParams};
    use crate::error::PixelpaceError;
    use crate::surface::PixelBuffer;

    #[test]
    fn strip_pattern_and_cycle() {
        let surface = SurfaceHandle::new(PixelBuffer::strip(10));
        let mut anim = StripChannelTest::new(surface.clone()).unwrap();
        anim.step(1).unwrap();
        anim.step(1).unwrap();
        let s = surface.lock();
        assert_eq!(s.get(0), Color::RED);
        assert_eq!(s.get(2), Color::GREEN);
        assert_eq!(s.get(5), Color::BLUE);
        assert_eq!(s.get(6), Color::BLACK);
        assert_eq!(s.get(8), Color::GREEN);
        assert_eq!(anim.core().internal_delay(), Some(CHANNEL_DELAY));
    }

    #[test]
    fn matrix_tests_reject_strips() {
        let strip = SurfaceHandle::new(PixelBuffer::strip(10));
        assert!(matches!(
            MatrixChannelTest::new(strip.clone()),
            Err(PixelpaceError::WrongSurface { .. })
        ));
        assert!(MatrixCalibrationTest::new(strip).is_err());
        let matrix = SurfaceHandle::new(PixelBuffer::matrix(2, 2));
        assert!(StripChannelTest::new(matrix).is_err());
    }

    #[test]
    fn matrix_columns_span_height() {
        let surface = SurfaceHandle::new(PixelBuffer::matrix(12, 3));
        let mut anim = MatrixChannelTest::new(surface.clone()).unwrap();
        anim.step(1).unwrap();
        let s = surface.lock();
        let shape = s.shape().clone();
        for y in 0..3 {
            assert_eq!(s.get(shape.xy(0, y).unwrap()), Color::RED);
            assert_eq!(s.get(shape.xy(4, y).unwrap()), Color::BLUE);
            assert_eq!(s.get(shape.xy(8, y).unwrap()), Color::RED);
            assert_eq!(s.get(shape.xy(11, y).unwrap()), Color::BLACK);
        }
    }

    #[test]
    fn calibration_completes_after_full_sweep() {
        let surface = SurfaceHandle::new(PixelBuffer::matrix(4, 4));
        let mut anim = MatrixCalibrationTest::new(surface.clone()).unwrap();
        anim.core_mut().set_internal_delay(None);
        let report = run_frames(&mut anim, RunParams::default().until_complete(0), None)
            .unwrap();
        assert_eq!(report.steps, 4);

        let s = surface.lock();
        let shape = s.shape().clone();
        assert_eq!(s.get(shape.xy(3, 3).unwrap()), Color::BLUE);
        assert_eq!(s.get(shape.xy(0, 3).unwrap()), Color::RED);
    }
}
