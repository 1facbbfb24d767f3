//! Mock collaborators shared by the unit tests

use touchdeck_hal::{DisplayActuator, PixelWriter, Region, TouchSource};

/// Panel that records what it was told to do
#[derive(Debug, Default)]
pub struct MockPanel {
    pub inits: u32,
    pub fail_init: bool,
    pub brightness: u8,
    pub brightness_writes: u32,
    pub asleep: bool,
    pub sleeps: u32,
    pub wakeups: u32,
    pub polls: u32,
    pub pixel_writes: u32,
    pub last_region: Option<Region>,
}

impl PixelWriter for MockPanel {
    fn write_pixels(&mut self, region: &Region, _pixels: &[u16]) {
        self.pixel_writes += 1;
        self.last_region = Some(*region);
    }
}

impl DisplayActuator for MockPanel {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.inits += 1;
        if self.fail_init {
            Err(())
        } else {
            Ok(())
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
        self.brightness_writes += 1;
    }

    fn sleep(&mut self) {
        self.asleep = true;
        self.sleeps += 1;
    }

    fn wakeup(&mut self) {
        self.asleep = false;
        self.wakeups += 1;
    }

    fn is_in_sleep(&self) -> bool {
        self.asleep
    }

    fn poll(&mut self) {
        self.polls += 1;
    }
}

/// Touch source returning a settable point
#[derive(Debug, Default)]
pub struct MockTouch {
    pub point: Option<(u16, u16)>,
    pub fail_init: bool,
    pub reads: u32,
}

impl TouchSource for MockTouch {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        if self.fail_init {
            Err(())
        } else {
            Ok(())
        }
    }

    fn get_touch(&mut self) -> Option<(u16, u16)> {
        self.reads += 1;
        self.point
    }
}
