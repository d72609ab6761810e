//! Small reference animations: blanking, wiring checks and a path-following
//! worm used by the demo.

mod channel_test;
mod worm;

pub use channel_test::{MatrixCalibrationTest, MatrixChannelTest, StripChannelTest};
pub use worm::{path_around_rect, Worm};
use web_time::Duration;

use crate::animation::{Animation, AnimationCore};
use crate::error::Result;
use crate::surface::SurfaceHandle;

/// Keeps the surface blank, ticking once per `timeout`.
#[derive(Debug)]
pub struct OffAnimation {
    core: AnimationCore,
}

impl OffAnimation {
    /// Blank `surface`, waking every `timeout`.
    #[must_use]
    pub fn new(surface: SurfaceHandle, timeout: Duration) -> Self {
        let mut core = AnimationCore::any(surface).with_name("off");
        core.set_internal_delay(Some(timeout));
        Self { core }
    }
}

impl Animation for OffAnimation {
    fn core(&self) -> &AnimationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimationCore {
        &mut self.core
    }

    fn step(&mut self, amt: usize) -> Result<()> {
        self.core.surface().lock().clear();
        self.core.advance_step(amt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use web_time::Instant;

    use super::*;
    use crate::animation::{run_frames, RunParams};
    use crate::color::Color;
    use crate::surface::PixelBuffer;

    #[test]
    fn off_blanks_at_its_own_pace() {
        let surface = SurfaceHandle::new(PixelBuffer::strip(3));
        surface.lock().fill(Color::RED, 0, 2);
        let mut off = OffAnimation::new(surface.clone(), Duration::from_millis(20));

        let start = Instant::now();
        let _ = run_frames(
            &mut off,
            RunParams::default().with_fps(1000.0).with_max_steps(3),
            None,
        )
        .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(surface.lock().get(1), Color::BLACK);
    }
}
