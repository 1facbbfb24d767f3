//! Touch controller drivers

pub mod ft6x36;

pub use ft6x36::{Ft6x36, TouchMapping};

/// Touch driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// I2C transfer failed
    Bus,
    /// Chip ID register held an unexpected value
    UnknownChip(u8),
}
