//! Command-line demo driver for the pixelpace animation compositor.

use std::path::Path;

use pixelpace::compositor::{Compositor, TrackSpec};
use pixelpace::content::{path_around_rect, Worm};
use pixelpace::options::Options;
use pixelpace::surface::MemorySink;
use pixelpace::{Color, PixelBuffer, Runner, SurfaceHandle};

const PALETTE: [(u8, u8, u8); 5] = [
    (0, 0, 1),
    (1, 0, 0),
    (0, 1, 0),
    (0, 1, 1),
    (1, 1, 1),
];
const DIMMING: [u8; 5] = [255, 222, 200, 150, 125];

fn worm_colors(index: usize) -> Vec<Color> {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    DIMMING
        .iter()
        .map(|&level| Color(r * level, g * level, b * level))
        .collect()
}

fn build_tracks(options: &Options) -> pixelpace::Result<Vec<TrackSpec>> {
    let demo = &options.demo;
    let mut tracks = Vec::new();
    for (i, &fps) in demo.rates.iter().enumerate() {
        let (left, bottom) = (i, i);
        let right = demo.width.saturating_sub(1 + i);
        let top = demo.height.saturating_sub(1 + i);
        if left >= right || bottom >= top {
            log::warn!("worm {i}: no room left on a {}x{} matrix", demo.width, demo.height);
            continue;
        }
        let pixmap = path_around_rect(left, right, bottom, top, 0, demo.height, demo.width);
        let strip = SurfaceHandle::new(PixelBuffer::strip(pixmap.len()));
        let mut worm = Worm::new(strip, worm_colors(i))?.with_height(i as f32);
        if i % 2 == 1 {
            worm = worm.reversed();
        }
        tracks.push(TrackSpec::new(worm, fps).with_pixmap(pixmap));
    }
    Ok(tracks)
}

fn run_demo(options: &Options) -> pixelpace::Result<()> {
    let sink = MemorySink::new();
    let matrix = SurfaceHandle::new(
        PixelBuffer::matrix(options.demo.width, options.demo.height).with_sink(sink.clone()),
    );
    let tracks = build_tracks(options)?;
    let compositor = Compositor::new(matrix, tracks, options.compositor.runtime())?
        .with_poll_interval(options.compositor.poll_interval());

    let mut params = options.run;
    if options.compositor.fps.is_some() {
        params.fps = options.compositor.fps;
    }

    let mut runner = Runner::new(compositor);
    let report = match runner.run(params)? {
        Some(report) => report,
        None => runner.wait()?.unwrap_or_default(),
    };
    log::info!(
        "composited {} frames ({} commits, {} overruns)",
        report.steps,
        sink.count(),
        report.overruns
    );

    runner.with_animation(|c| {
        for (i, series) in c.activations().iter().enumerate() {
            log::info!("track {i}: composited {} times", series.len());
        }
    });
    if let Some(path) = &options.demo.timing_out {
        let json = runner.with_animation(|c| c.activations_json())?;
        std::fs::write(path, json)?;
        log::info!("activation times written to {}", path.display());
    }
    runner.close()
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = run_demo(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
