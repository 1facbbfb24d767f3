//! Wraparound-safe time arithmetic
//!
//! The monotonic clock is a `u32` millisecond counter that wraps. All
//! comparisons go through unsigned subtraction so a deadline straddling
//! the wrap point still expires on time.

/// Milliseconds elapsed from `since` to `now`
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Check if strictly more than `timeout_ms` has passed since `since`
#[inline]
pub const fn has_expired(now: u32, since: u32, timeout_ms: u32) -> bool {
    elapsed_ms(now, since) > timeout_ms
}

/// Fixed-period rate limiter
///
/// Fires when at least `period_ms` has elapsed since it last fired,
/// then re-arms from the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    /// Create a limiter whose first period starts at `start_ms`
    pub const fn new(period_ms: u32, start_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: start_ms,
        }
    }

    /// Check whether the period has elapsed, re-arming if so
    pub fn ready(&mut self, now: u32) -> bool {
        if elapsed_ms(now, self.last_ms) >= self.period_ms {
            self.last_ms = now;
            true
        } else {
            false
        }
    }

    /// Period in milliseconds
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Time the limiter last fired (or was created)
    pub const fn last_ms(&self) -> u32 {
        self.last_ms
    }
}
