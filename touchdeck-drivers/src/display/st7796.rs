//! ST7796 TFT controller (4-wire SPI)
//!
//! 320x480 RGB565 panel controller. Commands go out with D/C low, their
//! parameters and pixel data with D/C high. Chip select is owned by the
//! `SpiDevice`.
//!
//! # Pixel format
//!
//! COLMOD is set to 16 bits per pixel; each pixel is sent big-endian.
//!
//! # Sleep timing
//!
//! SLPIN and SLPOUT need 5 ms before the next command and 120 ms before the
//! opposite transition. Neither wait is spent inside `sleep_out`: DISPON is
//! left pending and sent by [`St7796::poll`] or the next pixel write once
//! the gap has passed. Only back-to-back commands inside a gap block, and
//! only for what remains of it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use touchdeck_core::time::elapsed_ms;
use touchdeck_hal::Region;

use super::PanelError;

/// ST7796 commands
#[allow(dead_code)]
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const CSCON: u8 = 0xF0;
}

/// MADCTL bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
    pub const BGR: u8 = 0x08;
}

/// Native (portrait) resolution
pub const NATIVE_WIDTH: u16 = 320;
pub const NATIVE_HEIGHT: u16 = 480;

/// Bytes per SPI burst when streaming pixels
const CHUNK_BYTES: usize = 64;

/// Gap after SLPIN/SLPOUT before any other command
const SLEEP_COMMAND_GAP_MS: u32 = 5;

/// Gap between a sleep transition and the opposite one
const SLEEP_TOGGLE_GAP_MS: u32 = 120;

/// Panel scan orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Portrait,
    /// 480x320, connector on the left
    #[default]
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Orientation {
    fn madctl(self) -> u8 {
        let bits = match self {
            Orientation::Portrait => madctl::MX,
            Orientation::Landscape => madctl::MV,
            Orientation::PortraitFlipped => madctl::MY,
            Orientation::LandscapeFlipped => madctl::MX | madctl::MY | madctl::MV,
        };
        bits | madctl::BGR
    }

    /// Width and height as seen by the application
    pub fn size(self) -> (u16, u16) {
        match self {
            Orientation::Portrait | Orientation::PortraitFlipped => (NATIVE_WIDTH, NATIVE_HEIGHT),
            Orientation::Landscape | Orientation::LandscapeFlipped => {
                (NATIVE_HEIGHT, NATIVE_WIDTH)
            }
        }
    }
}

/// ST7796 driver
pub struct St7796<SPI, DC, DELAY> {
    spi: SPI,
    dc: DC,
    delay: DELAY,
    orientation: Orientation,
    sleeping: bool,
    /// When the last SLPIN/SLPOUT went out
    last_transition_ms: Option<u32>,
    /// SLPOUT sent, DISPON not yet
    display_on_pending: bool,
}

impl<SPI, DC, DELAY> St7796<SPI, DC, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, delay: DELAY, orientation: Orientation) -> Self {
        Self {
            spi,
            dc,
            delay,
            orientation,
            sleeping: true,
            last_transition_ms: None,
            display_on_pending: false,
        }
    }

    /// Run the power-on sequence and switch the display on
    pub fn init(&mut self) -> Result<(), PanelError> {
        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(120);

        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);

        // Unlock extended command set
        self.command(cmd::CSCON, &[0xC3])?;
        self.command(cmd::CSCON, &[0x96])?;

        self.command(cmd::MADCTL, &[self.orientation.madctl()])?;
        self.command(cmd::COLMOD, &[0x55])?;
        self.command(cmd::INVON, &[])?;

        // Lock extended command set
        self.command(cmd::CSCON, &[0x3C])?;
        self.command(cmd::CSCON, &[0x69])?;

        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);
        self.sleeping = false;

        Ok(())
    }

    /// Enter sleep mode (display off, oscillator stopped)
    pub fn sleep_in(&mut self, now_ms: u32) -> Result<(), PanelError> {
        self.settle(now_ms, SLEEP_TOGGLE_GAP_MS);
        self.display_on_pending = false;
        self.command(cmd::DISPOFF, &[])?;
        self.command(cmd::SLPIN, &[])?;
        self.last_transition_ms = Some(now_ms);
        self.sleeping = true;
        Ok(())
    }

    /// Leave sleep mode
    ///
    /// Returns right after SLPOUT; the display is switched on later by
    /// [`poll`](Self::poll) or the next [`write_region`](Self::write_region).
    pub fn sleep_out(&mut self, now_ms: u32) -> Result<(), PanelError> {
        self.settle(now_ms, SLEEP_TOGGLE_GAP_MS);
        self.command(cmd::SLPOUT, &[])?;
        self.last_transition_ms = Some(now_ms);
        self.display_on_pending = true;
        self.sleeping = false;
        Ok(())
    }

    /// Send a pending DISPON once the post-SLPOUT gap has passed
    pub fn poll(&mut self, now_ms: u32) -> Result<(), PanelError> {
        if !self.display_on_pending || self.in_gap(now_ms, SLEEP_COMMAND_GAP_MS) {
            return Ok(());
        }
        self.display_on()
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Check if a DISPON is still waiting to go out
    pub fn is_display_on_pending(&self) -> bool {
        self.display_on_pending
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Write a block of RGB565 pixels into `region`
    ///
    /// At most `region.area()` pixels are sent.
    pub fn write_region(
        &mut self,
        region: &Region,
        pixels: &[u16],
        now_ms: u32,
    ) -> Result<(), PanelError> {
        if self.display_on_pending {
            self.settle(now_ms, SLEEP_COMMAND_GAP_MS);
            self.display_on()?;
        }
        self.set_window(region)?;
        self.command(cmd::RAMWR, &[])?;

        let count = pixels.len().min(region.area() as usize);
        self.dc.set_high().map_err(|_| PanelError::Pin)?;

        let mut buf = [0u8; CHUNK_BYTES];
        for chunk in pixels[..count].chunks(CHUNK_BYTES / 2) {
            for (i, pixel) in chunk.iter().enumerate() {
                let [hi, lo] = pixel.to_be_bytes();
                buf[i * 2] = hi;
                buf[i * 2 + 1] = lo;
            }
            self.spi
                .write(&buf[..chunk.len() * 2])
                .map_err(|_| PanelError::Bus)?;
        }

        Ok(())
    }

    fn display_on(&mut self) -> Result<(), PanelError> {
        self.command(cmd::DISPON, &[])?;
        self.display_on_pending = false;
        Ok(())
    }

    fn in_gap(&self, now_ms: u32, gap_ms: u32) -> bool {
        self.last_transition_ms
            .is_some_and(|t| elapsed_ms(now_ms, t) < gap_ms)
    }

    /// Block for whatever is left of `gap_ms` since the last transition
    fn settle(&mut self, now_ms: u32, gap_ms: u32) {
        if let Some(t) = self.last_transition_ms {
            let elapsed = elapsed_ms(now_ms, t);
            if elapsed < gap_ms {
                self.delay.delay_ms(gap_ms - elapsed);
            }
        }
    }

    /// Set the column/row address window
    fn set_window(&mut self, region: &Region) -> Result<(), PanelError> {
        let [x1h, x1l] = region.x1.to_be_bytes();
        let [x2h, x2l] = region.x2.to_be_bytes();
        let [y1h, y1l] = region.y1.to_be_bytes();
        let [y2h, y2l] = region.y2.to_be_bytes();
        self.command(cmd::CASET, &[x1h, x1l, x2h, x2l])?;
        self.command(cmd::RASET, &[y1h, y1l, y2h, y2l])
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Bus)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| PanelError::Pin)?;
            self.spi.write(params).map_err(|_| PanelError::Bus)?;
        }
        Ok(())
    }

    /// Release the bus, pin and delay
    pub fn release(self) -> (SPI, DC, DELAY) {
        (self.spi, self.dc, self.delay)
    }
}
