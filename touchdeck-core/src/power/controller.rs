//! Display power controller
//!
//! Tracks the last touch and hands the panel to the configured policy once
//! the idle timeout has passed. Nothing here is scheduled: the check is
//! re-evaluated every tick, so a press simply moves the last-touch time and
//! the pending dim or sleep never happens.

use touchdeck_hal::DisplayActuator;

use super::backlight::Backlight;
use super::policy::{Policy, PowerPolicy};
use super::PowerAction;
use crate::config::{PolicyKind, PowerConfig};
use crate::input::TouchSample;
use crate::time::has_expired;

/// Display power controller
pub struct DisplayPowerController<A> {
    backlight: Backlight<A>,
    policy: Policy,
    idle_timeout_ms: u32,
    last_touch_ms: u32,
}

impl<A: DisplayActuator> DisplayPowerController<A> {
    /// Take over an initialized panel
    ///
    /// Applies `initial_brightness` and starts the idle period at `now_ms`.
    /// `config` is expected to be sanitized; brightness values are clamped
    /// to the floor regardless.
    pub fn new(panel: A, config: &PowerConfig, now_ms: u32) -> Self {
        let mut backlight = Backlight::new(panel, config.min_brightness);
        backlight.set(config.initial_brightness);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "power: {} policy, brightness {=u8}, idle timeout {=u32} ms",
            config.policy,
            backlight.level(),
            config.idle_timeout_ms
        );

        Self {
            backlight,
            policy: Policy::from_config(config),
            idle_timeout_ms: config.idle_timeout_ms,
            last_touch_ms: now_ms,
        }
    }

    /// Current brightness (0-100)
    pub fn brightness(&self) -> u8 {
        self.backlight.level()
    }

    /// Set brightness from outside the policy
    ///
    /// Clamped into the configured range. Counts as an override: once the
    /// idle timeout has passed, a panel brought back up this way is not
    /// dimmed again until the next press.
    pub fn set_brightness(&mut self, value: u8) {
        self.backlight.set(value);
        self.policy.on_override();
    }

    /// Put the panel to sleep
    pub fn display_off(&mut self) {
        self.backlight.sleep();
        self.policy.on_override();
    }

    /// Wake the panel
    pub fn display_on(&mut self) {
        self.backlight.wake();
        self.policy.on_override();
    }

    pub fn is_display_on(&self) -> bool {
        !self.backlight.is_asleep()
    }

    /// Feed a touch sample
    ///
    /// A press restarts the idle period and gives the policy a chance to
    /// wake the panel. Releases are ignored.
    pub fn on_touch(&mut self, sample: &TouchSample, now_ms: u32) -> Option<PowerAction> {
        if !sample.pressed {
            return None;
        }
        self.last_touch_ms = now_ms;
        self.policy.on_touch_wake(&mut self.backlight, now_ms)
    }

    /// Per-tick idle check
    ///
    /// Gives the panel its poll first. A zero idle timeout disables the
    /// policy entirely.
    pub fn tick(&mut self, now_ms: u32) -> Option<PowerAction> {
        self.backlight.panel_mut().poll();
        if self.idle_timeout_ms == 0 {
            return None;
        }
        if !has_expired(now_ms, self.last_touch_ms, self.idle_timeout_ms) {
            return None;
        }
        self.policy.on_idle_tick(&mut self.backlight, now_ms)
    }

    pub fn last_touch_ms(&self) -> u32 {
        self.last_touch_ms
    }

    pub fn idle_timeout_ms(&self) -> u32 {
        self.idle_timeout_ms
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn panel(&self) -> &A {
        self.backlight.panel()
    }

    /// Get mutable access to the panel (pixel output)
    pub fn panel_mut(&mut self) -> &mut A {
        self.backlight.panel_mut()
    }

    /// Release the panel
    pub fn into_panel(self) -> A {
        self.backlight.into_panel()
    }
}
