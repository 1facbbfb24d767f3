//! Monotonic time source

use core::cell::Cell;

/// Monotonic millisecond clock
///
/// The counter is 32 bits and wraps after ~49.7 days. Consumers must compare
/// timestamps with `wrapping_sub`, never with `<`/`>` on raw values.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary fixed point
    fn now_millis(&self) -> u32;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// Manually driven clock
///
/// Useful for simulators and tests: time only moves when told to.
/// Interior mutability lets a test keep a shared reference while the
/// code under test owns `&ManualClock` as its clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    /// Create a clock starting at `start_ms`
    pub const fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    /// Advance by `delta_ms`, wrapping on overflow
    pub fn advance(&self, delta_ms: u32) {
        self.now.set(self.now.get().wrapping_add(delta_ms));
    }
}

impl MonotonicClock for ManualClock {
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}
