use rustc_hash::FxHashMap;

use super::KeyState;

#[derive(Debug, Clone, Copy)]
struct Binding<A> {
    action: A,
    speed: u64,
    hold: bool,
    last: bool,
    latched: bool,
}

/// Maps key names to actions.
///
/// Bindings fire only on ticks divisible by their speed. A hold binding
/// fires on every such tick while its key is down. An edge binding fires
/// once per press; a press that starts and ends between two speed ticks is
/// latched and still fires on the next one.
///
/// ```ignore
/// let mut bindings = KeyBindings::new();
/// bindings.bind("left", Move::Left, 2, true);
/// bindings.bind("fire", Move::Fire, 1, false);
///
/// // In the animation's step:
/// for action in bindings.handle(self.core.keys()) { ... }
/// bindings.advance();
/// ```
#[derive(Debug, Clone)]
pub struct KeyBindings<A> {
    bindings: FxHashMap<String, Binding<A>>,
    speeds: FxHashMap<String, u64>,
    tick: u64,
}

impl<A> Default for KeyBindings<A> {
    fn default() -> Self {
        Self {
            bindings: FxHashMap::default(),
            speeds: FxHashMap::default(),
            tick: 0,
        }
    }
}

impl<A: Copy> KeyBindings<A> {
    /// No bindings, tick zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `action`, firing at most every `speed` ticks. A speed
    /// of zero counts as one.
    pub fn bind(&mut self, key: impl Into<String>, action: A, speed: u64, hold: bool) {
        let _ = self.bindings.insert(
            key.into(),
            Binding {
                action,
                speed: speed.max(1),
                hold,
                last: false,
                latched: false,
            },
        );
    }

    /// Bind every key in `keys` to the same action.
    pub fn bind_all(&mut self, keys: &[&str], action: A, speed: u64, hold: bool) {
        for key in keys {
            self.bind(*key, action, speed, hold);
        }
    }

    /// Set a named speed divisor for use with [`check_speed`](Self::check_speed).
    pub fn set_speed(&mut self, name: impl Into<String>, speed: u64) {
        let _ = self.speeds.insert(name.into(), speed.max(1));
    }

    /// Named speed divisor, if set.
    #[must_use]
    pub fn speed(&self, name: &str) -> Option<u64> {
        self.speeds.get(name).copied()
    }

    /// Whether the named speed fires on the current tick. Unknown names
    /// never fire.
    #[must_use]
    pub fn check_speed(&self, name: &str) -> bool {
        self.speeds
            .get(name)
            .is_some_and(|speed| self.tick % speed == 0)
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Actions triggered by `keys` on the current tick. Keys without a
    /// binding are ignored.
    pub fn handle(&mut self, keys: &KeyState) -> Vec<A> {
        let tick = self.tick;
        let mut fired = Vec::new();
        for (key, &down) in keys {
            let Some(binding) = self.bindings.get_mut(key) else {
                continue;
            };
            let on_speed = tick % binding.speed == 0;
            if binding.hold {
                if on_speed {
                    if down || binding.latched {
                        fired.push(binding.action);
                    } else {
                        binding.latched = false;
                        binding.last = false;
                    }
                }
            } else if on_speed {
                if (down || binding.latched) && !binding.last {
                    fired.push(binding.action);
                }
                binding.latched = down;
                binding.last = down;
            } else {
                binding.latched |= down;
            }
        }
        fired
    }

    /// Move to the next tick. Call once per frame after handling keys.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
