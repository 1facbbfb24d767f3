//! Configuration type definitions
//!
//! These types describe one device: its power policy generation, input and
//! loop timing, panel geometry and the screens it hosts. Out-of-range values
//! are never rejected; [`DeckConfig::sanitized`] clamps them and warns.

use heapless::{String, Vec};

use touchdeck_hal::MAX_BRIGHTNESS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum screen name length
pub const MAX_NAME_LEN: usize = 16;

/// Maximum screens per device
pub const MAX_SCREENS: usize = 8;

/// Maximum widgets registered on one screen
pub const MAX_WIDGETS: usize = 32;

/// Longest screen inactivity timeout (one hour)
pub const MAX_INACTIVITY_S: u32 = 3600;

/// Longest display idle timeout (one hour)
pub const MAX_IDLE_TIMEOUT_MS: u32 = 3_600_000;

/// Longest accepted debounce interval
pub const MAX_DEBOUNCE_MS: u32 = 100;

/// Bounds on the GUI toolkit work interval
pub const MIN_GUI_INTERVAL_MS: u32 = 1;
pub const MAX_GUI_INTERVAL_MS: u32 = 100;

/// Bounds on the diagnostic snapshot interval (when enabled)
pub const MIN_DIAGNOSTICS_INTERVAL_MS: u32 = 60_000;
pub const MAX_DIAGNOSTICS_INTERVAL_MS: u32 = 300_000;

/// Display power policy generation
///
/// The two generations are mutually exclusive and chosen once at
/// configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyKind {
    /// Drop the backlight to a dim level when idle
    #[default]
    Dimming,
    /// Put the panel to sleep when idle
    Sleeping,
}

/// How a dimmed backlight returns to full brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestoreMode {
    /// Only a touch (or an external brightness override) restores
    #[default]
    Touch,
    /// Also restore on its own once dimmed for `restore_after_ms`
    AfterIdle,
}

/// Display power configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerConfig {
    /// Policy generation
    pub policy: PolicyKind,
    /// Brightness applied at boot
    pub initial_brightness: u8,
    /// Brightness floor (0 = no floor)
    pub min_brightness: u8,
    /// A press at or below this brightness wakes the backlight
    pub wake_threshold: u8,
    /// Brightness restored by a wake
    pub wake_brightness: u8,
    /// Brightness used when auto-dimmed
    pub dimmed_brightness: u8,
    /// Time without touch before the policy acts (0 = never)
    pub idle_timeout_ms: u32,
    /// Restore behavior after auto-dim
    pub restore: RestoreMode,
    /// Dimmed time before an automatic restore (`RestoreMode::AfterIdle` only)
    pub restore_after_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Dimming,
            initial_brightness: MAX_BRIGHTNESS,
            min_brightness: 0,
            wake_threshold: 0,
            wake_brightness: MAX_BRIGHTNESS,
            dimmed_brightness: 20,
            idle_timeout_ms: 30_000,
            restore: RestoreMode::Touch,
            restore_after_ms: 0,
        }
    }
}

impl PowerConfig {
    /// Clamp every field into its legal range
    pub fn sanitized(mut self) -> Self {
        self.min_brightness = clamp_field("min_brightness", self.min_brightness, 0, MAX_BRIGHTNESS);
        let floor = self.min_brightness;
        self.initial_brightness =
            clamp_field("initial_brightness", self.initial_brightness, floor, MAX_BRIGHTNESS);
        self.wake_brightness =
            clamp_field("wake_brightness", self.wake_brightness, floor, MAX_BRIGHTNESS);
        self.dimmed_brightness =
            clamp_field("dimmed_brightness", self.dimmed_brightness, floor, MAX_BRIGHTNESS);
        self.wake_threshold = clamp_field("wake_threshold", self.wake_threshold, 0, MAX_BRIGHTNESS);
        self.idle_timeout_ms =
            clamp_field("idle_timeout_ms", self.idle_timeout_ms, 0, MAX_IDLE_TIMEOUT_MS);
        self.restore_after_ms =
            clamp_field("restore_after_ms", self.restore_after_ms, 0, MAX_IDLE_TIMEOUT_MS);
        self
    }
}

/// Touch input configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    /// Minimum time between hardware touch reads
    pub debounce_ms: u32,
    /// A press refreshes the inactivity deadline of active screens
    pub touch_resets_inactivity: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5,
            touch_resets_inactivity: true,
        }
    }
}

impl InputConfig {
    /// Clamp every field into its legal range
    pub fn sanitized(mut self) -> Self {
        self.debounce_ms = clamp_field("debounce_ms", self.debounce_ms, 0, MAX_DEBOUNCE_MS);
        self
    }
}

/// Scheduler loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopConfig {
    /// Minimum time between GUI toolkit work passes
    pub gui_interval_ms: u32,
    /// Time between diagnostic snapshots (0 = disabled)
    pub diagnostics_interval_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            gui_interval_ms: 10,
            diagnostics_interval_ms: 60_000,
        }
    }
}

impl LoopConfig {
    /// Clamp every field into its legal range
    pub fn sanitized(mut self) -> Self {
        self.gui_interval_ms = clamp_field(
            "gui_interval_ms",
            self.gui_interval_ms,
            MIN_GUI_INTERVAL_MS,
            MAX_GUI_INTERVAL_MS,
        );
        if self.diagnostics_interval_ms != 0 {
            self.diagnostics_interval_ms = clamp_field(
                "diagnostics_interval_ms",
                self.diagnostics_interval_ms,
                MIN_DIAGNOSTICS_INTERVAL_MS,
                MAX_DIAGNOSTICS_INTERVAL_MS,
            );
        }
        self
    }
}

/// Panel geometry and touch orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Width in pixels after rotation
    pub width: u16,
    /// Height in pixels after rotation
    pub height: u16,
    /// Rows per draw buffer band
    pub buffer_lines: u16,
    /// Swap raw touch X and Y
    pub swap_xy: bool,
    /// Mirror touch X
    pub invert_x: bool,
    /// Mirror touch Y
    pub invert_y: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            buffer_lines: 20,
            swap_xy: true,
            invert_x: false,
            invert_y: true,
        }
    }
}

impl PanelConfig {
    /// Clamp every field into its legal range
    pub fn sanitized(mut self) -> Self {
        self.width = clamp_field("width", self.width, 1, u16::MAX);
        self.height = clamp_field("height", self.height, 1, u16::MAX);
        self.buffer_lines = clamp_field("buffer_lines", self.buffer_lines, 1, self.height);
        self
    }
}

/// Screen configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenConfig {
    /// Screen identifier
    pub name: String<MAX_NAME_LEN>,
    /// Inactivity timeout in seconds (0 = disabled)
    pub inactivity_s: u32,
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeckConfig {
    pub power: PowerConfig,
    pub input: InputConfig,
    pub scheduler: LoopConfig,
    pub panel: PanelConfig,
    pub screens: Vec<ScreenConfig, MAX_SCREENS>,
}

impl DeckConfig {
    /// Create a configuration with default values and no screens
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every section into its legal range
    ///
    /// Screen timeouts are left as written; the screen itself clamps them
    /// when the timeout is applied.
    pub fn sanitized(self) -> Self {
        Self {
            power: self.power.sanitized(),
            input: self.input.sanitized(),
            scheduler: self.scheduler.sanitized(),
            panel: self.panel.sanitized(),
            screens: self.screens,
        }
    }

    /// Find a screen configuration by name
    pub fn find_screen(&self, name: &str) -> Option<&ScreenConfig> {
        self.screens.iter().find(|s| s.name.as_str() == name)
    }
}

/// Clamp a value into `[lo, hi]`, warning when it had to move
fn clamp_field<T: PartialOrd + Copy>(_field: &str, value: T, lo: T, hi: T) -> T {
    if value < lo {
        #[cfg(feature = "defmt")]
        defmt::warn!("config: {=str} below minimum, clamped", _field);
        lo
    } else if value > hi {
        #[cfg(feature = "defmt")]
        defmt::warn!("config: {=str} above maximum, clamped", _field);
        hi
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_defaults_are_sane() {
        let config = PowerConfig::default();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_power_floor_lifts_levels() {
        let config = PowerConfig {
            min_brightness: 20,
            dimmed_brightness: 5,
            initial_brightness: 0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.dimmed_brightness, 20);
        assert_eq!(config.initial_brightness, 20);
        assert_eq!(config.wake_brightness, 100);
    }

    #[test]
    fn test_power_ceiling() {
        let config = PowerConfig {
            min_brightness: 150,
            wake_brightness: 255,
            idle_timeout_ms: u32::MAX,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.min_brightness, 100);
        assert_eq!(config.wake_brightness, 100);
        assert_eq!(config.idle_timeout_ms, MAX_IDLE_TIMEOUT_MS);
    }

    #[test]
    fn test_loop_diagnostics_disabled_stays_zero() {
        let config = LoopConfig {
            gui_interval_ms: 0,
            diagnostics_interval_ms: 0,
        }
        .sanitized();

        assert_eq!(config.gui_interval_ms, MIN_GUI_INTERVAL_MS);
        assert_eq!(config.diagnostics_interval_ms, 0);
    }

    #[test]
    fn test_loop_diagnostics_clamped() {
        let short = LoopConfig {
            diagnostics_interval_ms: 1_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(short.diagnostics_interval_ms, MIN_DIAGNOSTICS_INTERVAL_MS);

        let long = LoopConfig {
            diagnostics_interval_ms: 3_600_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(long.diagnostics_interval_ms, MAX_DIAGNOSTICS_INTERVAL_MS);
    }

    #[test]
    fn test_panel_buffer_lines_bounded_by_height() {
        let config = PanelConfig {
            height: 64,
            buffer_lines: 200,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.buffer_lines, 64);
    }

    #[test]
    fn test_find_screen() {
        let mut config = DeckConfig::new();
        let mut name: String<MAX_NAME_LEN> = String::new();
        let _ = name.push_str("home");
        let _ = config.screens.push(ScreenConfig {
            name,
            inactivity_s: 30,
        });

        assert_eq!(config.find_screen("home").map(|s| s.inactivity_s), Some(30));
        assert!(config.find_screen("settings").is_none());
    }
}
