//! Idle and wake policies
//!
//! Two policy generations exist and are never mixed: one dims the
//! backlight when idle, the other puts the panel to sleep. Both act at most
//! once per idle period; a press starts a new period.

use touchdeck_hal::DisplayActuator;

use super::backlight::Backlight;
use super::PowerAction;
use crate::config::{PolicyKind, PowerConfig, RestoreMode};
use crate::time::elapsed_ms;

/// Common contract of the power policies
pub trait PowerPolicy {
    /// Called on each tick while the panel has been idle past the timeout
    fn on_idle_tick<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        now_ms: u32,
    ) -> Option<PowerAction>;

    /// Called for every pressed sample
    fn on_touch_wake<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        now_ms: u32,
    ) -> Option<PowerAction>;

    /// Brightness or panel state was changed from outside the policy
    fn on_override(&mut self) {}
}

/// Where the dimming policy is within the current idle period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum DimState {
    /// Will dim once the idle timeout passes
    Armed,
    /// Dimmed by this policy at `since`
    Dimmed { since: u32 },
    /// Already acted this idle period; waits for the next press
    Spent,
}

/// Auto-dim, then restore on touch (or after further idle time)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimmingPolicy {
    dimmed_brightness: u8,
    wake_threshold: u8,
    wake_brightness: u8,
    restore: RestoreMode,
    restore_after_ms: u32,
    state: DimState,
}

impl DimmingPolicy {
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            dimmed_brightness: config.dimmed_brightness,
            wake_threshold: config.wake_threshold,
            wake_brightness: config.wake_brightness,
            restore: config.restore,
            restore_after_ms: config.restore_after_ms,
            state: DimState::Armed,
        }
    }

    /// Check if the backlight is currently dimmed by this policy
    pub fn is_dimmed(&self) -> bool {
        matches!(self.state, DimState::Dimmed { .. })
    }
}

impl PowerPolicy for DimmingPolicy {
    fn on_idle_tick<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        now_ms: u32,
    ) -> Option<PowerAction> {
        match self.state {
            DimState::Armed => {
                // Already at or below the dim level: nothing to do until the next press
                if backlight.level() <= self.dimmed_brightness {
                    self.state = DimState::Spent;
                    return None;
                }
                backlight.set(self.dimmed_brightness);
                self.state = DimState::Dimmed { since: now_ms };
                #[cfg(feature = "defmt")]
                defmt::debug!("power: idle, dimmed to {=u8}", backlight.level());
                Some(PowerAction::Dimmed)
            }
            DimState::Dimmed { since } => {
                // restore_after_ms == 0 leaves the panel dimmed until touched
                let restore_due = self.restore == RestoreMode::AfterIdle
                    && self.restore_after_ms > 0
                    && elapsed_ms(now_ms, since) >= self.restore_after_ms;
                if !restore_due {
                    return None;
                }
                backlight.set(self.wake_brightness);
                self.state = DimState::Spent;
                #[cfg(feature = "defmt")]
                defmt::debug!("power: restored to {=u8} after idle", backlight.level());
                Some(PowerAction::Restored)
            }
            DimState::Spent => None,
        }
    }

    fn on_touch_wake<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        _now_ms: u32,
    ) -> Option<PowerAction> {
        let was_dimmed = self.is_dimmed();
        self.state = DimState::Armed;

        // The floor may hold a dimmed panel above dimmed_brightness
        let level = backlight.level();
        let off = level <= self.wake_threshold;
        if (off || was_dimmed) && level < self.wake_brightness {
            backlight.set(self.wake_brightness);
            #[cfg(feature = "defmt")]
            defmt::debug!("power: touch wake to {=u8}", backlight.level());
            return Some(PowerAction::Woke);
        }
        None
    }

    fn on_override(&mut self) {
        if self.is_dimmed() {
            self.state = DimState::Spent;
        }
    }
}

/// Put the panel to sleep when idle, wake it on touch
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepingPolicy {
    wake_threshold: u8,
    wake_brightness: u8,
    armed: bool,
}

impl SleepingPolicy {
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            wake_threshold: config.wake_threshold,
            wake_brightness: config.wake_brightness,
            armed: true,
        }
    }
}

impl PowerPolicy for SleepingPolicy {
    fn on_idle_tick<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        _now_ms: u32,
    ) -> Option<PowerAction> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        if backlight.is_asleep() {
            return None;
        }
        backlight.sleep();
        #[cfg(feature = "defmt")]
        defmt::debug!("power: idle, display off");
        Some(PowerAction::DisplayOff)
    }

    fn on_touch_wake<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        _now_ms: u32,
    ) -> Option<PowerAction> {
        self.armed = true;

        let level = backlight.level();
        if level <= self.wake_threshold && level < self.wake_brightness {
            backlight.set(self.wake_brightness);
        }

        if backlight.is_asleep() {
            backlight.wake();
            #[cfg(feature = "defmt")]
            defmt::debug!("power: touch wake, display on");
            Some(PowerAction::DisplayOn)
        } else if backlight.level() != level {
            Some(PowerAction::Woke)
        } else {
            None
        }
    }
}

/// The policy selected at configuration time
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Policy {
    Dimming(DimmingPolicy),
    Sleeping(SleepingPolicy),
}

impl Policy {
    /// Build the configured policy
    pub fn from_config(config: &PowerConfig) -> Self {
        match config.policy {
            PolicyKind::Dimming => Policy::Dimming(DimmingPolicy::new(config)),
            PolicyKind::Sleeping => Policy::Sleeping(SleepingPolicy::new(config)),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Dimming(_) => PolicyKind::Dimming,
            Policy::Sleeping(_) => PolicyKind::Sleeping,
        }
    }
}

impl PowerPolicy for Policy {
    fn on_idle_tick<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        now_ms: u32,
    ) -> Option<PowerAction> {
        match self {
            Policy::Dimming(p) => p.on_idle_tick(backlight, now_ms),
            Policy::Sleeping(p) => p.on_idle_tick(backlight, now_ms),
        }
    }

    fn on_touch_wake<A: DisplayActuator>(
        &mut self,
        backlight: &mut Backlight<A>,
        now_ms: u32,
    ) -> Option<PowerAction> {
        match self {
            Policy::Dimming(p) => p.on_touch_wake(backlight, now_ms),
            Policy::Sleeping(p) => p.on_touch_wake(backlight, now_ms),
        }
    }

    fn on_override(&mut self) {
        match self {
            Policy::Dimming(p) => p.on_override(),
            Policy::Sleeping(p) => p.on_override(),
        }
    }
}
