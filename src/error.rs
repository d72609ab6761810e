//! Crate-level error types.

use std::fmt;

use crate::surface::SurfaceKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PixelpaceError>;

/// Malformed queue or compositor configuration. Always detected before any
/// worker thread is started.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Two compositor tracks are bound to the same surface instance.
    DuplicateSurface {
        /// Index of the first track using the surface.
        first: usize,
        /// Index of the track that reuses it.
        second: usize,
    },
    /// A track is bound to the compositor's own destination surface.
    SharedWithDestination {
        /// Track index.
        track: usize,
    },
    /// A track's pixel index map does not match its surface's pixel count.
    PixmapLength {
        /// Track index.
        track: usize,
        /// Pixel count of the track's surface.
        expected: usize,
        /// Length of the supplied map.
        found: usize,
    },
    /// A track's pixel height map does not match its surface's pixel count.
    HeightsLength {
        /// Track index.
        track: usize,
        /// Pixel count of the track's surface.
        expected: usize,
        /// Length of the supplied map.
        found: usize,
    },
    /// A pixel index map points past the end of the destination surface.
    PixmapOutOfRange {
        /// Track index.
        track: usize,
        /// Offending destination index.
        index: usize,
        /// Destination pixel count.
        len: usize,
    },
    /// A pixel index map sends two source pixels to one destination pixel.
    PixmapDuplicate {
        /// Track index.
        track: usize,
        /// Destination index that appears more than once.
        index: usize,
    },
    /// A track's surface has no height/pending-update side channel.
    MissingSideChannel {
        /// Track index.
        track: usize,
    },
    /// A track's frame rate is not a positive finite number, or its frame
    /// period is zero or too long to represent.
    InvalidRate {
        /// Track index.
        track: usize,
        /// Supplied rate.
        rate: f64,
    },
    /// A queue was run with no entries.
    EmptyQueue,
    /// A compositor was built with no tracks.
    NoTracks,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSurface { first, second } => write!(
                f,
                "tracks {first} and {second} share one surface; \
                 concurrent tracks need distinct surfaces"
            ),
            Self::SharedWithDestination { track } => write!(
                f,
                "track {track}: surface is the compositor's destination"
            ),
            Self::PixmapLength {
                track,
                expected,
                found,
            } => write!(
                f,
                "track {track}: pixmap has {found} entries, surface has \
                 {expected} pixels"
            ),
            Self::HeightsLength {
                track,
                expected,
                found,
            } => write!(
                f,
                "track {track}: pixheights has {found} entries, surface has \
                 {expected} pixels"
            ),
            Self::PixmapOutOfRange { track, index, len } => write!(
                f,
                "track {track}: pixmap index {index} outside destination of \
                 {len} pixels"
            ),
            Self::PixmapDuplicate { track, index } => write!(
                f,
                "track {track}: pixmap sends more than one pixel to {index}"
            ),
            Self::MissingSideChannel { track } => write!(
                f,
                "track {track}: surface does not support the compositing \
                 side channel"
            ),
            Self::InvalidRate { track, rate } => {
                write!(f, "track {track}: invalid frame rate {rate}")
            }
            Self::EmptyQueue => {
                write!(f, "animation queue needs at least one animation")
            }
            Self::NoTracks => write!(f, "compositor needs at least one track"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors produced by the pixelpace crate.
#[derive(Debug)]
pub enum PixelpaceError {
    /// Queue or compositor configuration rejected.
    Config(ConfigError),
    /// An animation was bound to a surface of the wrong shape.
    WrongSurface {
        /// Shape the animation requires.
        expected: SurfaceKind,
        /// Shape of the supplied surface.
        found: SurfaceKind,
    },
    /// A surface failed to push its buffer to its sink.
    Surface(String),
    /// Failed to spawn a worker thread.
    ThreadSpawn(std::io::Error),
    /// A worker thread panicked; carries the panic message.
    WorkerPanicked(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// JSON serialization of diagnostics failed.
    Json(serde_json::Error),
}

impl fmt::Display for PixelpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::WrongSurface { expected, found } => write!(
                f,
                "animation requires a {expected:?} surface, got {found:?}"
            ),
            Self::Surface(msg) => write!(f, "surface error: {msg}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::WorkerPanicked(msg) => {
                write!(f, "worker panicked: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PixelpaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PixelpaceError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for PixelpaceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for PixelpaceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
