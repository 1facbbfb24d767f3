//! Embassy time source

use embassy_time::Instant;
use touchdeck_hal::MonotonicClock;

/// Milliseconds since boot from the embassy time driver
///
/// The 64-bit tick count is truncated, so the value wraps like every
/// other timestamp the core handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_millis(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
