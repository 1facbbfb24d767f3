//! Display power management
//!
//! The [`DisplayPowerController`] sits between touch activity and the
//! physical panel. It owns the [`Backlight`] (brightness within the
//! configured floor and ceiling) and one [`Policy`], chosen once from
//! configuration, that decides what happens when the panel sits idle and
//! what a touch does to wake it.

pub mod backlight;
pub mod controller;
pub mod policy;

pub use backlight::Backlight;
pub use controller::DisplayPowerController;
pub use policy::{DimmingPolicy, Policy, PowerPolicy, SleepingPolicy};

/// Something the power controller did to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerAction {
    /// Idle timeout dropped the backlight to the dim level
    Dimmed,
    /// Dimmed backlight restored on its own after further idle time
    Restored,
    /// A touch brought the backlight back up
    Woke,
    /// Idle timeout put the panel to sleep
    DisplayOff,
    /// A touch woke the panel from sleep
    DisplayOn,
}
