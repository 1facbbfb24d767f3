//! Normalized pointer sample

/// One pointer reading
///
/// Produced once per debounce interval and replayed unchanged until the
/// next hardware read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// X in panel pixels
    pub x: u16,
    /// Y in panel pixels
    pub y: u16,
    /// Finger down
    pub pressed: bool,
    /// Clock time of the hardware read that produced this sample
    pub timestamp: u32,
}

impl TouchSample {
    /// A press at `(x, y)`
    pub const fn press(x: u16, y: u16, timestamp: u32) -> Self {
        Self {
            x,
            y,
            pressed: true,
            timestamp,
        }
    }

    /// A release, keeping the last known position
    pub const fn release(x: u16, y: u16, timestamp: u32) -> Self {
        Self {
            x,
            y,
            pressed: false,
            timestamp,
        }
    }
}
