//! Cross-thread signaling primitives.
//!
//! - [`StopSignal`]: level-triggered cooperative cancellation. Once raised it
//!   stays raised until explicitly cleared. Sleeping on it wakes immediately
//!   when it is raised. Signals can be linked so raising a parent raises its
//!   children first.
//! - [`UpdateSignal`]: single-producer/single-consumer "new frame pending"
//!   flag. The producing animation raises it, the compositor clears it.
//! - [`Notifier`]: generation counter plus condition variable, shared by
//!   many producers and one waiter, so a compositor can sleep until any child
//!   has produced output.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use web_time::{Duration, Instant};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct StopInner {
    raised: Mutex<bool>,
    cv: Condvar,
    linked: Mutex<Vec<StopSignal>>,
    propagating: AtomicBool,
}

/// Shared, idempotent, level-triggered stop flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

impl StopSignal {
    /// A fresh, lowered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Linked signals are raised first, then this one;
    /// every sleeper wakes.
    pub fn raise(&self) {
        // Re-entered through a link cycle or a concurrent raise.
        if self.inner.propagating.swap(true, Ordering::AcqRel) {
            self.set_raised();
            return;
        }
        let linked = lock(&self.inner.linked).clone();
        for child in &linked {
            child.raise();
        }
        self.set_raised();
        self.inner.propagating.store(false, Ordering::Release);
    }

    fn set_raised(&self) {
        *lock(&self.inner.raised) = true;
        self.inner.cv.notify_all();
    }

    /// Lower the signal. Linked signals are left alone.
    pub fn clear(&self) {
        *lock(&self.inner.raised) = false;
    }

    /// Whether the signal is currently raised.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        *lock(&self.inner.raised)
    }

    /// Sleep until `deadline` or until the signal is raised, whichever comes
    /// first. Returns `true` if the signal is raised.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut raised = lock(&self.inner.raised);
        while !*raised {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = self
                .inner
                .cv
                .wait_timeout(raised, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            raised = guard;
        }
        *raised
    }

    /// Sleep for at most `timeout`, returning early if the signal is raised.
    /// Returns `true` if the signal is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.wait_until(Instant::now() + timeout)
    }

    /// Make `child` follow this signal: raising `self` raises `child`.
    pub fn link(&self, child: Self) {
        if child.same_as(self) {
            return;
        }
        let mut linked = lock(&self.inner.linked);
        if !linked.iter().any(|s| s.same_as(&child)) {
            linked.push(child);
        }
    }

    /// Signals raised along with this one.
    #[must_use]
    pub fn linked(&self) -> Vec<Self> {
        lock(&self.inner.linked).clone()
    }

    /// Whether both handles refer to the same signal.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Debug, Default)]
struct NotifierInner {
    generation: Mutex<u64>,
    cv: Condvar,
}

/// Wakeup shared between many producers and one waiter.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Notifier {
    /// A notifier with generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Pass it to [`wait_past`](Self::wait_past) after
    /// checking producer state to avoid missing a notification in between.
    #[must_use]
    pub fn generation(&self) -> u64 {
        *lock(&self.inner.generation)
    }

    /// Bump the generation and wake the waiter.
    pub fn notify(&self) {
        let mut generation = lock(&self.inner.generation);
        *generation = generation.wrapping_add(1);
        self.inner.cv.notify_all();
    }

    /// Block until the generation moves past `seen` or `timeout` elapses.
    /// Returns `true` if a notification arrived.
    pub fn wait_past(&self, seen: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut generation = lock(&self.inner.generation);
        while *generation == seen {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .inner
                .cv
                .wait_timeout(generation, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            generation = guard;
        }
        true
    }
}

#[derive(Debug, Default)]
struct UpdateInner {
    pending: AtomicBool,
    notifier: Mutex<Option<Notifier>>,
}

/// Per-surface "new frame pending" flag.
#[derive(Debug, Clone, Default)]
pub struct UpdateSignal {
    inner: Arc<UpdateInner>,
}

impl UpdateSignal {
    /// A fresh, unset signal with no notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new frame as pending and wake the attached notifier, if any.
    pub fn raise(&self) {
        self.inner.pending.store(true, Ordering::Release);
        if let Some(notifier) = lock(&self.inner.notifier).as_ref() {
            notifier.notify();
        }
    }

    /// Mark the pending frame as consumed.
    pub fn clear(&self) {
        self.inner.pending.store(false, Ordering::Release);
    }

    /// Whether a frame is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Route future [`raise`](Self::raise) calls to `notifier`.
    pub fn attach(&self, notifier: Notifier) {
        *lock(&self.inner.notifier) = Some(notifier);
    }
}
