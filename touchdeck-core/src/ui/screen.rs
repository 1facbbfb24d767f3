//! Screen lifecycle
//!
//! Two states, Active and Inactive:
//!
//! ```text
//!            set_active(true)
//!   Inactive ───────────────▶ Active
//!      ▲                        │
//!      └──── set_active(false) ─┤
//!      └──── tick() timeout ────┘
//! ```
//!
//! Every call to `set_active` re-runs the widget hooks, even when the state
//! does not change. Dropping a screen deactivates it first so every widget
//! gets `destroy()` before the screen goes away.

use heapless::{String, Vec};

use super::widget::Widget;
use crate::config::{ScreenConfig, MAX_INACTIVITY_S, MAX_NAME_LEN, MAX_WIDGETS};
use crate::time::has_expired;

/// A named container of widgets with an inactivity timeout
///
/// Widgets are borrowed, never owned: they must outlive the screen, and the
/// screen never frees them.
pub struct Screen<'w> {
    name: String<MAX_NAME_LEN>,
    inactivity_ms: u32,
    active: bool,
    last_activity_ms: u32,
    widgets: Vec<&'w dyn Widget, MAX_WIDGETS>,
}

impl<'w> Screen<'w> {
    /// Create an inactive screen with no timeout
    ///
    /// Names longer than `MAX_NAME_LEN` bytes are truncated.
    pub fn new(name: &str) -> Self {
        let mut screen = Self {
            name: String::new(),
            inactivity_ms: 0,
            active: false,
            last_activity_ms: 0,
            widgets: Vec::new(),
        };
        screen.set_name(name);
        screen
    }

    /// Create a screen from its configuration entry
    pub fn from_config(config: &ScreenConfig) -> Self {
        let mut screen = Self::new(config.name.as_str());
        screen.set_inactivity(config.inactivity_s);
        screen
    }

    /// Set the screen identifier
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for ch in name.chars() {
            if self.name.push(ch).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("screen: name {=str} truncated", name);
                break;
            }
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Set the inactivity timeout in seconds
    ///
    /// `0` disables the timeout. Values above one hour are clamped to one
    /// hour with a warning.
    pub fn set_inactivity(&mut self, seconds: u32) {
        let seconds = if seconds > MAX_INACTIVITY_S {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "screen {=str}: inactivity {=u32}s exceeds {=u32}s, clamped",
                self.name.as_str(),
                seconds,
                MAX_INACTIVITY_S
            );
            MAX_INACTIVITY_S
        } else {
            seconds
        };
        self.inactivity_ms = seconds * 1000;
    }

    /// Inactivity timeout in milliseconds (0 = disabled)
    pub fn inactivity_ms(&self) -> u32 {
        self.inactivity_ms
    }

    /// Register a widget at the end of the render order
    ///
    /// Returns `false` (and leaves the screen unchanged) for a missing
    /// widget or when the screen is full. The same widget may be added more
    /// than once; it then receives each lifecycle call once per entry.
    pub fn add_widget(&mut self, widget: Option<&'w dyn Widget>) -> bool {
        let Some(widget) = widget else {
            #[cfg(feature = "defmt")]
            defmt::warn!("screen {=str}: rejected null widget", self.name.as_str());
            return false;
        };

        if self.widgets.push(widget).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "screen {=str}: widget limit {=usize} reached",
                self.name.as_str(),
                MAX_WIDGETS
            );
            return false;
        }

        true
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Activate or deactivate the screen
    ///
    /// Always calls `render()` (activating) or `destroy()` (deactivating) on
    /// every widget in registration order, whatever the previous state.
    /// Activation also restarts the inactivity timer at `now_ms`.
    pub fn set_active(&mut self, active: bool, now_ms: u32) {
        if active {
            for widget in self.widgets.iter() {
                widget.render();
            }
            self.last_activity_ms = now_ms;
        } else {
            for widget in self.widgets.iter() {
                widget.destroy();
            }
        }
        self.active = active;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "screen {=str}: {=str}",
            self.name.as_str(),
            if active { "active" } else { "inactive" }
        );
    }

    /// Shorthand for `set_active(true, now_ms)`
    pub fn activate(&mut self, now_ms: u32) {
        self.set_active(true, now_ms);
    }

    /// Shorthand for `set_active(false, ..)`
    pub fn deactivate(&mut self) {
        let last = self.last_activity_ms;
        self.set_active(false, last);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time the inactivity timer was last restarted
    pub fn last_activity_ms(&self) -> u32 {
        self.last_activity_ms
    }

    /// Restart the inactivity timer
    ///
    /// Only applies while active; an inactive screen is never woken here.
    pub fn record_activity(&mut self, now_ms: u32) {
        if self.active {
            self.last_activity_ms = now_ms;
        }
    }

    /// Per-tick inactivity check
    ///
    /// Deactivates the screen once strictly more than the timeout has
    /// elapsed since the last activity. Returns `true` on the tick that
    /// deactivated it.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if self.active
            && self.inactivity_ms > 0
            && has_expired(now_ms, self.last_activity_ms, self.inactivity_ms)
        {
            #[cfg(feature = "defmt")]
            defmt::debug!("screen {=str}: inactivity timeout", self.name.as_str());
            self.set_active(false, now_ms);
            return true;
        }
        false
    }
}

impl Drop for Screen<'_> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl core::fmt::Debug for Screen<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Screen")
            .field("name", &self.name.as_str())
            .field("inactivity_ms", &self.inactivity_ms)
            .field("active", &self.active)
            .field("last_activity_ms", &self.last_activity_ms)
            .field("widgets", &self.widgets.len())
            .finish()
    }
}
