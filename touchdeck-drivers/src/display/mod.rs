//! Display panel drivers
//!
//! [`Panel`] pairs an [`St7796`] controller with a [`PwmBacklight`] and
//! exposes them as one [`DisplayActuator`]. The clock times the
//! controller's sleep transitions. Only bring-up reports errors;
//! once running, a failed brightness or sleep command is logged and the
//! next call simply tries again.

pub mod backlight;
pub mod st7796;

pub use backlight::PwmBacklight;
pub use st7796::{Orientation, St7796};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiDevice;

use touchdeck_hal::{DisplayActuator, MonotonicClock, PixelWriter, Region};

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// SPI transfer failed
    Bus,
    /// D/C pin could not be driven
    Pin,
    /// Backlight PWM rejected the duty cycle
    Backlight,
}

/// ST7796 panel with PWM backlight
pub struct Panel<SPI, DC, DELAY, PWM, CLK> {
    lcd: St7796<SPI, DC, DELAY>,
    backlight: PwmBacklight<PWM>,
    clock: CLK,
}

impl<SPI, DC, DELAY, PWM, CLK> Panel<SPI, DC, DELAY, PWM, CLK>
where
    SPI: SpiDevice,
    DC: OutputPin,
    DELAY: DelayNs,
    PWM: SetDutyCycle,
    CLK: MonotonicClock,
{
    pub fn new(lcd: St7796<SPI, DC, DELAY>, backlight: PwmBacklight<PWM>, clock: CLK) -> Self {
        Self {
            lcd,
            backlight,
            clock,
        }
    }

    pub fn lcd(&self) -> &St7796<SPI, DC, DELAY> {
        &self.lcd
    }

    pub fn backlight(&self) -> &PwmBacklight<PWM> {
        &self.backlight
    }
}

impl<SPI, DC, DELAY, PWM, CLK> PixelWriter for Panel<SPI, DC, DELAY, PWM, CLK>
where
    SPI: SpiDevice,
    DC: OutputPin,
    DELAY: DelayNs,
    PWM: SetDutyCycle,
    CLK: MonotonicClock,
{
    fn write_pixels(&mut self, region: &Region, pixels: &[u16]) {
        let now = self.clock.now_millis();
        if let Err(_e) = self.lcd.write_region(region, pixels, now) {
            #[cfg(feature = "defmt")]
            defmt::warn!("panel: pixel write failed: {}", _e);
        }
    }
}

impl<SPI, DC, DELAY, PWM, CLK> DisplayActuator for Panel<SPI, DC, DELAY, PWM, CLK>
where
    SPI: SpiDevice,
    DC: OutputPin,
    DELAY: DelayNs,
    PWM: SetDutyCycle,
    CLK: MonotonicClock,
{
    type Error = PanelError;

    fn init(&mut self) -> Result<(), PanelError> {
        // Keep the backlight dark until the controller is up
        self.backlight.set_percent(0)?;
        self.lcd.init()
    }

    fn set_brightness(&mut self, level: u8) {
        if let Err(_e) = self.backlight.set_percent(level) {
            #[cfg(feature = "defmt")]
            defmt::warn!("panel: brightness {=u8} failed: {}", level, _e);
        }
    }

    fn sleep(&mut self) {
        if let Err(_e) = self.lcd.sleep_in(self.clock.now_millis()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("panel: sleep failed: {}", _e);
        }
    }

    fn wakeup(&mut self) {
        if let Err(_e) = self.lcd.sleep_out(self.clock.now_millis()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("panel: wakeup failed: {}", _e);
        }
    }

    fn poll(&mut self) {
        if let Err(_e) = self.lcd.poll(self.clock.now_millis()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("panel: display on failed: {}", _e);
        }
    }

    fn is_in_sleep(&self) -> bool {
        self.lcd.is_sleeping()
    }
}
