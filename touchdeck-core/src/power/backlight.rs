//! Brightness bookkeeping
//!
//! Every brightness change goes through here so the level stays inside
//! `[floor, MAX_BRIGHTNESS]`. Out-of-range requests are clamped with a
//! warning, never rejected.

use touchdeck_hal::{DisplayActuator, MAX_BRIGHTNESS};

/// Panel backlight with a brightness floor
pub struct Backlight<A> {
    panel: A,
    level: u8,
    floor: u8,
}

impl<A: DisplayActuator> Backlight<A> {
    /// Take ownership of the panel
    ///
    /// The level starts at the floor until the first [`set`](Self::set);
    /// nothing is written to the panel here.
    pub fn new(panel: A, floor: u8) -> Self {
        let floor = floor.min(MAX_BRIGHTNESS);
        Self {
            panel,
            level: floor,
            floor,
        }
    }

    /// Current brightness (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Lowest brightness this backlight will apply
    pub fn floor(&self) -> u8 {
        self.floor
    }

    /// Apply a brightness, clamped into `[floor, MAX_BRIGHTNESS]`
    ///
    /// Returns the level actually applied.
    pub fn set(&mut self, requested: u8) -> u8 {
        let level = requested.clamp(self.floor, MAX_BRIGHTNESS);
        if level != requested {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "backlight: brightness {=u8} clamped to {=u8}",
                requested,
                level
            );
        }
        self.level = level;
        self.panel.set_brightness(level);
        level
    }

    /// Put the panel to sleep
    pub fn sleep(&mut self) {
        self.panel.sleep();
    }

    /// Wake the panel
    pub fn wake(&mut self) {
        self.panel.wakeup();
    }

    pub fn is_asleep(&self) -> bool {
        self.panel.is_in_sleep()
    }

    pub fn panel(&self) -> &A {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut A {
        &mut self.panel
    }

    /// Release the panel
    pub fn into_panel(self) -> A {
        self.panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPanel;

    #[test]
    fn test_set_within_range() {
        let mut backlight = Backlight::new(MockPanel::default(), 0);
        assert_eq!(backlight.set(55), 55);
        assert_eq!(backlight.level(), 55);
        assert_eq!(backlight.panel().brightness, 55);
    }

    #[test]
    fn test_set_clamps_to_floor_and_ceiling() {
        let mut backlight = Backlight::new(MockPanel::default(), 20);
        assert_eq!(backlight.set(0), 20);
        assert_eq!(backlight.panel().brightness, 20);
        assert_eq!(backlight.set(250), 100);
        assert_eq!(backlight.panel().brightness, 100);
    }

    #[test]
    fn test_floor_capped_at_max() {
        let backlight = Backlight::new(MockPanel::default(), 200);
        assert_eq!(backlight.floor(), 100);
        assert_eq!(backlight.panel().brightness_writes, 0);
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut backlight = Backlight::new(MockPanel::default(), 0);
        backlight.sleep();
        assert!(backlight.is_asleep());
        backlight.wake();
        assert!(!backlight.is_asleep());
        assert_eq!(backlight.panel().sleeps, 1);
        assert_eq!(backlight.panel().wakeups, 1);
    }
}
