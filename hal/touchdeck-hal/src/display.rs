//! Display panel abstractions
//!
//! Provides traits for the physical panel: pixel output for the GUI toolkit
//! and the brightness/sleep actuator driven by the power controller.

/// Highest brightness level accepted by [`DisplayActuator::set_brightness`]
pub const MAX_BRIGHTNESS: u8 = 100;

/// Inclusive pixel rectangle on the panel
///
/// Both corners are part of the region, so a single pixel at (5, 7)
/// is `Region::new(5, 7, 5, 7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Region {
    /// Create a region from two inclusive corners
    ///
    /// Corners are normalized so that `x1 <= x2` and `y1 <= y2`.
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self { x1, y1, x2, y2 }
    }

    /// Create a region from an origin and a size
    ///
    /// Returns `None` for an empty size or when the far corner overflows.
    pub fn from_origin(x: u16, y: u16, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let x2 = x.checked_add(width - 1)?;
        let y2 = y.checked_add(height - 1)?;
        Some(Self { x1: x, y1: y, x2, y2 })
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32 + 1
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32 + 1
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u32 {
        self.width() * self.height()
    }

    /// Check if a point lies inside the region
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Intersection with another region, if any
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);
        if x1 > x2 || y1 > y2 {
            None
        } else {
            Some(Region { x1, y1, x2, y2 })
        }
    }
}

/// Pixel block output
///
/// This is the flush capability handed to the GUI toolkit: it writes one
/// rectangular block of RGB565 pixels to the panel.
pub trait PixelWriter {
    /// Write a block of pixels
    ///
    /// `pixels` is row-major and should hold exactly `region.area()` values.
    /// Implementations write at most that many and ignore any excess.
    fn write_pixels(&mut self, region: &Region, pixels: &[u16]);
}

/// Physical display actuator
///
/// Covers panel bring-up, backlight brightness and the panel's low-power
/// sleep state. Apart from `init`, none of these operations fail from the
/// caller's point of view; transport errors are the implementation's concern.
pub trait DisplayActuator: PixelWriter {
    /// Error type for panel bring-up
    type Error;

    /// Initialize the panel
    ///
    /// Failure here is fatal to the device.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Set backlight brightness (0-100)
    ///
    /// Values above [`MAX_BRIGHTNESS`] are treated as `MAX_BRIGHTNESS`.
    fn set_brightness(&mut self, level: u8);

    /// Put the panel into its low-power sleep state
    fn sleep(&mut self);

    /// Wake the panel from sleep
    fn wakeup(&mut self);

    /// Check if the panel is currently asleep
    fn is_in_sleep(&self) -> bool;

    /// Finish deferred panel work, such as the tail of a wake sequence
    ///
    /// Called once per control tick.
    fn poll(&mut self) {}
}

impl<T: PixelWriter + ?Sized> PixelWriter for &mut T {
    fn write_pixels(&mut self, region: &Region, pixels: &[u16]) {
        (**self).write_pixels(region, pixels)
    }
}
