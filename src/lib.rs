// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Frame-paced animation scheduling and concurrent compositing for
//! addressable pixel surfaces (strips, matrices, rings).
//!
//! An [`animation::Animation`] is bound to a [`surface::SurfaceHandle`] and
//! advanced by a drift-corrected frame loop. Animations can run inline,
//! on their own worker thread, in sequence, or concurrently with others.
//!
//! # Key entry points
//!
//! - [`animation::Runner`] - execution context: run inline or threaded,
//!   stop, wait, tear down
//! - [`animation::RunParams`] - rate, step budget, completion policy
//! - [`animation::AnimationQueue`] - plays animations one after another
//! - [`compositor::Compositor`] - runs several animations concurrently and
//!   merges their pixels into one surface by height
//! - [`options::Options`] - TOML configuration
//!
//! # Architecture
//!
//! Every animation owns an [`animation::AnimationCore`] holding its surface,
//! step counter, completion flag and a level-triggered
//! [`signal::StopSignal`]. The frame loop in [`animation::scheduler`] calls
//! the animation's hooks once per tick and sleeps until the next tick
//! boundary on a grid shared by all schedulers in the process, so children
//! of a compositor running at different rates stay aligned.
//!
//! Compositor children run on their own workers with deferred commit: they
//! raise a [`signal::UpdateSignal`] instead of pushing pixels, and the
//! compositor wakes on any of them, blends the signaling children into its
//! surface and releases them.

pub mod animation;
pub mod color;
pub mod compositor;
pub mod content;
pub mod error;
pub mod input;
pub mod options;
pub mod signal;
pub mod surface;
pub mod util;

pub use animation::{
    Animation, AnimationCore, AnimationQueue, RunParams, RunReport, Runner,
};
pub use color::Color;
pub use compositor::{Compositor, Heights, TrackSpec};
pub use error::{ConfigError, PixelpaceError, Result};
pub use surface::{PixelBuffer, Shape, SurfaceHandle, SurfaceKind};
