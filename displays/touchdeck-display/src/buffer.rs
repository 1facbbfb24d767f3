//! Banded draw buffer
//!
//! Covers one horizontal band of the screen at a time. Drawing outside the
//! band is silently clipped, so the same scene can be drawn once per band.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use touchdeck_hal::{PixelWriter, Region};

/// Draw target holding up to `B` RGB565 pixels
pub struct DrawBuffer<const B: usize> {
    pixels: [u16; B],
    band: Option<Region>,
}

impl<const B: usize> Default for DrawBuffer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: usize> DrawBuffer<B> {
    pub const fn new() -> Self {
        Self {
            pixels: [0; B],
            band: None,
        }
    }

    /// Pixel capacity
    pub const fn capacity(&self) -> usize {
        B
    }

    /// Start drawing a new band, cleared to `background`
    ///
    /// Returns `false` (and leaves no band open) when the band does not fit.
    pub fn begin(&mut self, band: Region, background: Rgb565) -> bool {
        let area = band.area() as usize;
        if area > B {
            #[cfg(feature = "defmt")]
            defmt::warn!("draw buffer: band of {=usize} px exceeds {=usize}", area, B);
            self.band = None;
            return false;
        }
        self.pixels[..area].fill(background.into_storage());
        self.band = Some(band);
        true
    }

    /// Band currently open for drawing
    pub fn band(&self) -> Option<Region> {
        self.band
    }

    /// Send the open band to the panel and close it
    pub fn flush(&mut self, writer: &mut dyn PixelWriter) {
        if let Some(band) = self.band.take() {
            writer.write_pixels(&band, &self.pixels[..band.area() as usize]);
        }
    }
}

impl<const B: usize> Dimensions for DrawBuffer<B> {
    fn bounding_box(&self) -> Rectangle {
        match self.band {
            Some(band) => Rectangle::new(
                Point::new(i32::from(band.x1), i32::from(band.y1)),
                Size::new(band.width(), band.height()),
            ),
            None => Rectangle::zero(),
        }
    }
}

impl<const B: usize> DrawTarget for DrawBuffer<B> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let Some(band) = self.band else {
            return Ok(());
        };
        let width = band.width() as usize;

        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if !band.contains(x, y) {
                continue;
            }
            let index = usize::from(y - band.y1) * width + usize::from(x - band.x1);
            self.pixels[index] = color.into_storage();
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::Vec;

    /// Pixel writer that keeps every block it receives
    #[derive(Default)]
    pub struct Capture {
        pub blocks: Vec<(Region, Vec<u16, 256>), 16>,
    }

    impl PixelWriter for Capture {
        fn write_pixels(&mut self, region: &Region, pixels: &[u16]) {
            let mut copy = Vec::new();
            for &p in pixels.iter().take(256) {
                let _ = copy.push(p);
            }
            let _ = self.blocks.push((*region, copy));
        }
    }

    #[test]
    fn test_band_cleared_to_background() {
        let mut buffer = DrawBuffer::<64>::new();
        assert!(buffer.begin(Region::new(0, 0, 7, 1), Rgb565::BLUE));

        let mut capture = Capture::default();
        buffer.flush(&mut capture);

        let (region, pixels) = &capture.blocks[0];
        assert_eq!(*region, Region::new(0, 0, 7, 1));
        assert_eq!(pixels.len(), 16);
        assert!(pixels.iter().all(|&p| p == Rgb565::BLUE.into_storage()));
        assert!(buffer.band().is_none());
    }

    #[test]
    fn test_pixels_land_relative_to_band() {
        let mut buffer = DrawBuffer::<64>::new();
        buffer.begin(Region::new(10, 20, 13, 21), Rgb565::BLACK);

        Pixel(Point::new(12, 21), Rgb565::RED).draw(&mut buffer).unwrap();
        // Outside the band: clipped
        Pixel(Point::new(12, 22), Rgb565::RED).draw(&mut buffer).unwrap();
        Pixel(Point::new(-1, 20), Rgb565::RED).draw(&mut buffer).unwrap();

        let mut capture = Capture::default();
        buffer.flush(&mut capture);
        let pixels = &capture.blocks[0].1;
        let red = Rgb565::RED.into_storage();
        assert_eq!(pixels.iter().filter(|&&p| p == red).count(), 1);
        assert_eq!(pixels[4 + 2], red);
    }

    #[test]
    fn test_oversized_band_rejected() {
        let mut buffer = DrawBuffer::<16>::new();
        assert!(!buffer.begin(Region::new(0, 0, 479, 0), Rgb565::BLACK));

        let mut capture = Capture::default();
        buffer.flush(&mut capture);
        assert!(capture.blocks.is_empty());
    }

    #[test]
    fn test_bounding_box_tracks_band() {
        let mut buffer = DrawBuffer::<64>::new();
        assert_eq!(buffer.bounding_box(), Rectangle::zero());
        buffer.begin(Region::new(5, 6, 8, 7), Rgb565::BLACK);
        assert_eq!(
            buffer.bounding_box(),
            Rectangle::new(Point::new(5, 6), Size::new(4, 2))
        );
    }
}
