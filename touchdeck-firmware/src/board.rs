//! Board wiring
//!
//! Generic RP2040 carrier with a 3.5" ST7796 SPI panel and an FT6336U
//! capacitive touch controller:
//!
//! | Signal        | GPIO | Peripheral   |
//! |---------------|------|--------------|
//! | LCD SCK       | 18   | SPI0         |
//! | LCD MOSI      | 19   | SPI0         |
//! | LCD CS        | 17   |              |
//! | LCD D/C       | 20   |              |
//! | Backlight     | 21   | PWM slice 2B |
//! | Touch SDA     | 4    | I2C0         |
//! | Touch SCL     | 5    | I2C0         |

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{
    I2C0, PIN_17, PIN_18, PIN_19, PIN_20, PIN_21, PIN_4, PIN_5, PWM_SLICE2, SPI0,
};
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_rp::spi::{self, Spi};
use embassy_rp::Peri;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;

use touchdeck_core::config::PanelConfig;
use touchdeck_drivers::display::Orientation;
use touchdeck_drivers::{Ft6x36, Panel, PwmBacklight, St7796, TouchMapping};

use crate::clock::EmbassyClock;

/// LCD SPI clock
const LCD_SPI_HZ: u32 = 40_000_000;

/// Touch controller I2C clock
const TOUCH_I2C_HZ: u32 = 400_000;

/// PWM counter wrap; duty is set in percent of this
const BACKLIGHT_PWM_TOP: u16 = 999;

pub type LcdDevice = ExclusiveDevice<Spi<'static, SPI0, spi::Blocking>, Output<'static>, Delay>;

pub type AppPanel = Panel<LcdDevice, Output<'static>, Delay, PwmOutput<'static>, EmbassyClock>;

pub type AppTouch = Ft6x36<I2c<'static, I2C0, i2c::Blocking>>;

/// Peripherals the panel and touch controller are wired to
pub struct BoardResources {
    pub spi: Peri<'static, SPI0>,
    pub lcd_sck: Peri<'static, PIN_18>,
    pub lcd_mosi: Peri<'static, PIN_19>,
    pub lcd_cs: Peri<'static, PIN_17>,
    pub lcd_dc: Peri<'static, PIN_20>,
    pub backlight_slice: Peri<'static, PWM_SLICE2>,
    pub backlight: Peri<'static, PIN_21>,
    pub i2c: Peri<'static, I2C0>,
    pub touch_scl: Peri<'static, PIN_5>,
    pub touch_sda: Peri<'static, PIN_4>,
}

/// Configure the panel and touch buses
///
/// Only sets up pins and peripherals. The controllers themselves are brought
/// up by `Deck::new`, which reports a failure of either as a boot error.
pub fn bring_up(r: BoardResources, panel: &PanelConfig) -> (AppPanel, AppTouch) {
    let mut spi_config = spi::Config::default();
    spi_config.frequency = LCD_SPI_HZ;
    let spi = Spi::new_blocking_txonly(r.spi, r.lcd_sck, r.lcd_mosi, spi_config);
    let cs = Output::new(r.lcd_cs, Level::High);
    let device = ExclusiveDevice::new(spi, cs, Delay).unwrap_or_else(|e| match e {});
    let dc = Output::new(r.lcd_dc, Level::Low);

    let orientation = if panel.swap_xy {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let lcd = St7796::new(device, dc, Delay, orientation);

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = BACKLIGHT_PWM_TOP;
    let (_, backlight_pwm) = Pwm::new_output_b(r.backlight_slice, r.backlight, pwm_config).split();
    let Some(backlight_pwm) = backlight_pwm else {
        // new_output_b always hands out channel B
        defmt::panic!("backlight PWM channel unavailable");
    };
    let backlight = PwmBacklight::new(backlight_pwm);

    info!(
        "Panel bus ready: {=u16}x{=u16}, {} orientation",
        panel.width,
        panel.height,
        orientation
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = TOUCH_I2C_HZ;
    let i2c = I2c::new_blocking(r.i2c, r.touch_scl, r.touch_sda, i2c_config);
    let touch = Ft6x36::new(i2c, TouchMapping::from(panel));

    info!("Touch bus ready");

    (Panel::new(lcd, backlight, EmbassyClock), touch)
}
