//! FT6x36 capacitive touch controller (I2C)
//!
//! Covers the FT6206, FT6236 and FT6336U. Only the first touch point is
//! used. Raw coordinates are in the panel's native portrait frame and are
//! mapped to the application frame with [`TouchMapping`].
//!
//! # Register Map (subset)
//!
//! | Reg  | Content                                   |
//! |------|-------------------------------------------|
//! | 0x02 | TD_STATUS: number of touch points (3:0)   |
//! | 0x03 | P1_XH: event flag (7:6), X[11:8] (3:0)    |
//! | 0x04 | P1_XL: X[7:0]                             |
//! | 0x05 | P1_YH: touch ID (7:4), Y[11:8] (3:0)      |
//! | 0x06 | P1_YL: Y[7:0]                             |
//! | 0xA3 | CHIP_ID                                   |

use embedded_hal::i2c::I2c;

use touchdeck_core::config::PanelConfig;
use touchdeck_hal::TouchSource;

use super::TouchError;

/// Default 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// FT6x36 registers
pub mod reg {
    pub const DEV_MODE: u8 = 0x00;
    pub const TD_STATUS: u8 = 0x02;
    pub const TH_GROUP: u8 = 0x80;
    pub const PERIOD_ACTIVE: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xA3;
}

/// Known CHIP_ID values
const KNOWN_CHIPS: [u8; 3] = [
    0x06, // FT6206
    0x36, // FT6236
    0x64, // FT6336U
];

/// Default touch detection threshold
const TOUCH_THRESHOLD: u8 = 40;

/// Raw-to-screen coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchMapping {
    /// Application-frame width
    pub width: u16,
    /// Application-frame height
    pub height: u16,
    /// Swap raw X and Y (rotated panel)
    pub swap_xy: bool,
    /// Mirror X after swapping
    pub invert_x: bool,
    /// Mirror Y after swapping
    pub invert_y: bool,
}

impl TouchMapping {
    /// Map a raw point into the application frame
    ///
    /// Out-of-range raw values are clamped to the screen edge.
    pub fn map(&self, raw_x: u16, raw_y: u16) -> (u16, u16) {
        let (x, y) = if self.swap_xy {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };

        let max_x = self.width.saturating_sub(1);
        let max_y = self.height.saturating_sub(1);
        let x = x.min(max_x);
        let y = y.min(max_y);

        let x = if self.invert_x { max_x - x } else { x };
        let y = if self.invert_y { max_y - y } else { y };
        (x, y)
    }
}

impl From<&PanelConfig> for TouchMapping {
    fn from(config: &PanelConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            swap_xy: config.swap_xy,
            invert_x: config.invert_x,
            invert_y: config.invert_y,
        }
    }
}

/// FT6x36 driver
pub struct Ft6x36<I2C> {
    i2c: I2C,
    address: u8,
    mapping: TouchMapping,
}

impl<I2C: I2c> Ft6x36<I2C> {
    pub fn new(i2c: I2C, mapping: TouchMapping) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS, mapping)
    }

    pub fn with_address(i2c: I2C, address: u8, mapping: TouchMapping) -> Self {
        Self {
            i2c,
            address,
            mapping,
        }
    }

    /// Probe the chip and put it in working mode
    pub fn probe(&mut self) -> Result<u8, TouchError> {
        let chip_id = self.read_reg(reg::CHIP_ID)?;
        if !KNOWN_CHIPS.contains(&chip_id) {
            return Err(TouchError::UnknownChip(chip_id));
        }

        self.write_reg(reg::DEV_MODE, 0x00)?;
        self.write_reg(reg::TH_GROUP, TOUCH_THRESHOLD)?;
        // Report rate in active mode, in Hz
        self.write_reg(reg::PERIOD_ACTIVE, 60)?;

        #[cfg(feature = "defmt")]
        defmt::info!("touch: FT6x36 chip {=u8:#x}", chip_id);

        Ok(chip_id)
    }

    /// Read the first touch point in raw (native) coordinates
    pub fn read_raw(&mut self) -> Result<Option<(u16, u16)>, TouchError> {
        let mut buf = [0u8; 5];
        self.i2c
            .write_read(self.address, &[reg::TD_STATUS], &mut buf)
            .map_err(|_| TouchError::Bus)?;

        let points = buf[0] & 0x0F;
        // 0x0F is reported while the controller is still settling
        if points == 0 || points > 2 {
            return Ok(None);
        }

        let x = (u16::from(buf[1] & 0x0F) << 8) | u16::from(buf[2]);
        let y = (u16::from(buf[3] & 0x0F) << 8) | u16::from(buf[4]);
        Ok(Some((x, y)))
    }

    pub fn mapping(&self) -> &TouchMapping {
        &self.mapping
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, TouchError> {
        let mut value = [0u8];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(|_| TouchError::Bus)?;
        Ok(value[0])
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), TouchError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| TouchError::Bus)
    }
}

impl<I2C: I2c> TouchSource for Ft6x36<I2C> {
    type Error = TouchError;

    fn init(&mut self) -> Result<(), TouchError> {
        self.probe().map(|_| ())
    }

    fn get_touch(&mut self) -> Option<(u16, u16)> {
        match self.read_raw() {
            Ok(point) => point.map(|(x, y)| self.mapping.map(x, y)),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("touch: read failed: {}", _e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file I2C target
    struct MockI2c {
        regs: [u8; 256],
        pointer: u8,
        fail: bool,
    }

    impl MockI2c {
        fn new(chip_id: u8) -> Self {
            let mut regs = [0u8; 256];
            regs[reg::CHIP_ID as usize] = chip_id;
            Self {
                regs,
                pointer: 0,
                fail: false,
            }
        }

        fn touch(&mut self, x: u16, y: u16) {
            self.regs[0x02] = 1;
            self.regs[0x03] = 0x80 | (x >> 8) as u8;
            self.regs[0x04] = x as u8;
            self.regs[0x05] = (y >> 8) as u8;
            self.regs[0x06] = y as u8;
        }
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(ErrorKind::Other);
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&first, rest)) = bytes.split_first() {
                            self.pointer = first;
                            for &b in rest {
                                self.regs[self.pointer as usize] = b;
                                self.pointer = self.pointer.wrapping_add(1);
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer as usize];
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn landscape() -> TouchMapping {
        TouchMapping {
            width: 480,
            height: 320,
            swap_xy: true,
            invert_x: false,
            invert_y: true,
        }
    }

    #[test]
    fn test_probe_known_chip() {
        let mut touch = Ft6x36::new(MockI2c::new(0x64), landscape());
        assert_eq!(touch.probe(), Ok(0x64));
        let i2c = touch.release();
        assert_eq!(i2c.regs[reg::TH_GROUP as usize], TOUCH_THRESHOLD);
    }

    #[test]
    fn test_probe_unknown_chip() {
        let mut touch = Ft6x36::new(MockI2c::new(0x99), landscape());
        assert_eq!(touch.init(), Err(TouchError::UnknownChip(0x99)));
    }

    #[test]
    fn test_probe_bus_error() {
        let mut i2c = MockI2c::new(0x36);
        i2c.fail = true;
        let mut touch = Ft6x36::new(i2c, landscape());
        assert_eq!(touch.init(), Err(TouchError::Bus));
    }

    #[test]
    fn test_no_touch() {
        let mut touch = Ft6x36::new(MockI2c::new(0x36), landscape());
        assert_eq!(touch.get_touch(), None);
    }

    #[test]
    fn test_raw_point_decoded() {
        let mut i2c = MockI2c::new(0x36);
        i2c.touch(300, 470);
        let mut touch = Ft6x36::new(i2c, landscape());
        assert_eq!(touch.read_raw(), Ok(Some((300, 470))));
    }

    #[test]
    fn test_point_mapped_to_landscape() {
        let mut i2c = MockI2c::new(0x36);
        // Native portrait (x=10, y=400) -> landscape x=400, y=319-10
        i2c.touch(10, 400);
        let mut touch = Ft6x36::new(i2c, landscape());
        assert_eq!(touch.get_touch(), Some((400, 309)));
    }

    #[test]
    fn test_settling_status_ignored() {
        let mut i2c = MockI2c::new(0x36);
        i2c.touch(10, 10);
        i2c.regs[0x02] = 0x0F;
        let mut touch = Ft6x36::new(i2c, landscape());
        assert_eq!(touch.get_touch(), None);
    }

    #[test]
    fn test_mapping_clamps_and_inverts() {
        let mapping = TouchMapping {
            width: 320,
            height: 480,
            swap_xy: false,
            invert_x: true,
            invert_y: false,
        };
        assert_eq!(mapping.map(0, 0), (319, 0));
        assert_eq!(mapping.map(4000, 4000), (0, 479));
    }

    #[test]
    fn test_mapping_from_panel_config() {
        let mapping = TouchMapping::from(&PanelConfig::default());
        assert_eq!(mapping, landscape());
    }
}
