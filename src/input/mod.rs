//! Optional input-device capability.
//!
//! An animation that reacts to keys carries an [`InputDevice`] in its
//! [`AnimationCore`](crate::animation::AnimationCore). The frame loop polls
//! it once per tick, before `pre_step`, and stores the result where the
//! animation's hooks can read it. [`KeyBindings`] turns that key state into
//! actions.

/// Key-to-action mapping with speed divisors and hold/edge triggering.
pub mod bindings;

pub use bindings::KeyBindings;
use rustc_hash::FxHashMap;

/// Pressed state of every key a device reports, keyed by key name.
pub type KeyState = FxHashMap<String, bool>;

/// A device polled for key state once per tick.
pub trait InputDevice: Send {
    /// Current state of every key the device knows about.
    fn keys(&mut self) -> KeyState;

    /// Release the device. Called once when the owning animation is closed.
    fn close(&mut self) {}
}
