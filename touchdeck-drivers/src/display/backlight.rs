//! PWM backlight

use embedded_hal::pwm::SetDutyCycle;

use touchdeck_hal::MAX_BRIGHTNESS;

use super::PanelError;

/// Backlight LED driven by a PWM channel
///
/// Brightness 0-100 maps linearly onto the channel's duty range.
pub struct PwmBacklight<P> {
    pwm: P,
    level: u8,
}

impl<P: SetDutyCycle> PwmBacklight<P> {
    /// Wrap a PWM channel; the backlight starts dark
    pub fn new(pwm: P) -> Self {
        Self { pwm, level: 0 }
    }

    /// Set brightness in percent
    pub fn set_percent(&mut self, level: u8) -> Result<(), PanelError> {
        let level = level.min(MAX_BRIGHTNESS);
        self.pwm
            .set_duty_cycle_percent(level)
            .map_err(|_| PanelError::Backlight)?;
        self.level = level;
        Ok(())
    }

    /// Last brightness successfully applied
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn release(self) -> P {
        self.pwm
    }
}
