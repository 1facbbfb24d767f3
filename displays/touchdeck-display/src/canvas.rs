//! Canvas: the GUI toolkit driven by the scheduler
//!
//! Redraw is region based. The first pass clears the whole screen; after
//! that only the areas of dirty tiles are redrawn, band by band through the
//! shared [`DrawBuffer`]. Every visible tile overlapping a band is drawn
//! into it, so overlapping tiles stay correct.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::Vec;

use touchdeck_core::config::PanelConfig;
use touchdeck_core::{GuiToolkit, TouchSample};
use touchdeck_hal::{PixelWriter, Region};

use crate::buffer::DrawBuffer;
use crate::tile::Tile;

/// Tile canvas holding up to `N` tiles and a `B`-pixel draw band
pub struct Canvas<'w, const N: usize, const B: usize> {
    tiles: Vec<&'w Tile, N>,
    screen: Region,
    buffer_lines: u16,
    background: Rgb565,
    buffer: DrawBuffer<B>,
    full_redraw: bool,
    was_pressed: bool,
    frames: u32,
    last_frame_ms: Option<u32>,
}

impl<'w, const N: usize, const B: usize> Canvas<'w, N, B> {
    /// Create an empty canvas for the configured panel
    pub fn new(panel: &PanelConfig) -> Self {
        let width = panel.width.max(1);
        let height = panel.height.max(1);
        Self {
            tiles: Vec::new(),
            screen: Region::new(0, 0, width - 1, height - 1),
            buffer_lines: panel.buffer_lines.max(1),
            background: Rgb565::BLACK,
            buffer: DrawBuffer::new(),
            full_redraw: true,
            was_pressed: false,
            frames: 0,
            last_frame_ms: None,
        }
    }

    pub fn with_background(mut self, background: Rgb565) -> Self {
        self.background = background;
        self
    }

    /// Register a tile for drawing and hit-testing
    ///
    /// Later tiles are drawn on top and win hit tests.
    pub fn add_tile(&mut self, tile: &'w Tile) -> bool {
        if self.tiles.push(tile).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("canvas: tile limit {=usize} reached", N);
            return false;
        }
        true
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Redraw the whole screen on the next pass
    pub fn request_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Work passes that flushed at least one band
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn last_frame_ms(&self) -> Option<u32> {
        self.last_frame_ms
    }

    /// Redraw `area` band by band
    ///
    /// Returns `false` if nothing could be flushed.
    fn redraw(
        buffer: &mut DrawBuffer<B>,
        tiles: &[&Tile],
        area: Region,
        buffer_lines: u16,
        background: Rgb565,
        display: &mut dyn PixelWriter,
    ) -> bool {
        let rows = (B as u32 / area.width()).min(u32::from(buffer_lines));
        if rows == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("canvas: region wider than draw buffer");
            return false;
        }
        let rows = rows as u16;

        let mut y = area.y1;
        loop {
            let y_end = y.saturating_add(rows - 1).min(area.y2);
            let band = Region::new(area.x1, y, area.x2, y_end);

            if buffer.begin(band, background) {
                for tile in tiles.iter().filter(|t| t.is_visible()) {
                    if tile.area().intersect(&band).is_some() {
                        // Infallible target
                        let _ = tile.draw(buffer);
                    }
                }
                buffer.flush(display);
            }

            match y_end.checked_add(1) {
                Some(next) if next <= area.y2 => y = next,
                _ => break,
            }
        }
        true
    }
}

impl<const N: usize, const B: usize> GuiToolkit for Canvas<'_, N, B> {
    fn run_pending_work(&mut self, now_ms: u32, display: &mut dyn PixelWriter) {
        let mut flushed = false;

        if self.full_redraw {
            flushed = Self::redraw(
                &mut self.buffer,
                &self.tiles,
                self.screen,
                self.buffer_lines,
                self.background,
                display,
            );
            self.full_redraw = false;
            for tile in self.tiles.iter() {
                tile.mark_clean();
            }
        }

        for tile in self.tiles.iter().filter(|t| t.is_dirty()) {
            if let Some(area) = tile.area().intersect(&self.screen) {
                flushed |= Self::redraw(
                    &mut self.buffer,
                    &self.tiles,
                    area,
                    self.buffer_lines,
                    self.background,
                    display,
                );
            }
            tile.mark_clean();
        }

        if flushed {
            self.frames = self.frames.wrapping_add(1);
            self.last_frame_ms = Some(now_ms);
        }
    }

    fn pointer_input(&mut self, sample: &TouchSample) {
        let press_edge = sample.pressed && !self.was_pressed;
        self.was_pressed = sample.pressed;
        if !press_edge {
            return;
        }

        if let Some(tile) = self.tiles.iter().rev().find(|t| t.hit(sample.x, sample.y)) {
            tile.press();
            #[cfg(feature = "defmt")]
            defmt::debug!("canvas: pressed {=str}", tile.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::tests::Capture;
    use embedded_graphics::pixelcolor::IntoStorage;
    use touchdeck_core::Widget;

    fn small_panel() -> PanelConfig {
        PanelConfig {
            width: 40,
            height: 30,
            buffer_lines: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_pass_clears_screen_in_bands() {
        let mut canvas: Canvas<'_, 4, 400> = Canvas::new(&small_panel());
        let mut capture = Capture::default();

        canvas.run_pending_work(10, &mut capture);

        let regions: Vec<Region, 16> = capture.blocks.iter().map(|(r, _)| *r).collect();
        assert_eq!(
            regions.as_slice(),
            &[
                Region::new(0, 0, 39, 9),
                Region::new(0, 10, 39, 19),
                Region::new(0, 20, 39, 29),
            ]
        );
        assert_eq!(canvas.frames(), 1);
        assert_eq!(canvas.last_frame_ms(), Some(10));

        // Nothing dirty afterwards
        canvas.run_pending_work(20, &mut capture);
        assert_eq!(capture.blocks.len(), 3);
    }

    #[test]
    fn test_rendered_tile_redraws_its_area() {
        let tile = Tile::new(Region::new(2, 2, 11, 5), "A");
        let mut canvas: Canvas<'_, 4, 400> = Canvas::new(&small_panel());
        canvas.add_tile(&tile);
        let mut capture = Capture::default();
        canvas.run_pending_work(0, &mut capture);
        capture.blocks.clear();

        tile.render();
        canvas.run_pending_work(10, &mut capture);

        assert_eq!(capture.blocks.len(), 1);
        let (region, pixels) = &capture.blocks[0];
        assert_eq!(*region, tile.area());
        // Border drawn, background gone
        let black = Rgb565::BLACK.into_storage();
        assert!(pixels.iter().all(|&p| p != black));
        assert!(!tile.is_dirty());
    }

    #[test]
    fn test_destroyed_tile_cleared() {
        let tile = Tile::new(Region::new(0, 0, 9, 9), "A");
        let mut canvas: Canvas<'_, 4, 400> = Canvas::new(&small_panel());
        canvas.add_tile(&tile);
        tile.render();
        let mut capture = Capture::default();
        canvas.run_pending_work(0, &mut capture);
        capture.blocks.clear();

        tile.destroy();
        canvas.run_pending_work(10, &mut capture);

        let black = Rgb565::BLACK.into_storage();
        assert!(capture.blocks[0].1.iter().all(|&p| p == black));
    }

    #[test]
    fn test_press_edge_hits_top_tile_once() {
        let below = Tile::new(Region::new(0, 0, 19, 19), "below");
        let above = Tile::new(Region::new(10, 10, 29, 29), "above");
        let mut canvas: Canvas<'_, 4, 400> = Canvas::new(&small_panel());
        canvas.add_tile(&below);
        canvas.add_tile(&above);
        below.render();
        above.render();

        let press = TouchSample::press(15, 15, 0);
        canvas.pointer_input(&press);
        // Replayed sample is not a new press
        canvas.pointer_input(&press);
        assert_eq!(above.presses(), 1);
        assert_eq!(below.presses(), 0);

        canvas.pointer_input(&TouchSample::release(15, 15, 5));
        canvas.pointer_input(&TouchSample::press(5, 5, 10));
        assert_eq!(below.presses(), 1);
    }

    #[test]
    fn test_hidden_tile_ignores_press() {
        let tile = Tile::new(Region::new(0, 0, 19, 19), "hidden");
        let mut canvas: Canvas<'_, 4, 400> = Canvas::new(&small_panel());
        canvas.add_tile(&tile);

        canvas.pointer_input(&TouchSample::press(5, 5, 0));
        assert_eq!(tile.presses(), 0);
    }

    #[test]
    fn test_tile_limit() {
        let tile = Tile::new(Region::new(0, 0, 1, 1), "t");
        let mut canvas: Canvas<'_, 2, 400> = Canvas::new(&small_panel());
        assert!(canvas.add_tile(&tile));
        assert!(canvas.add_tile(&tile));
        assert!(!canvas.add_tile(&tile));
        assert_eq!(canvas.tile_count(), 2);
    }
}
