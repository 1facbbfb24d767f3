//! Tile widget
//!
//! A labelled rectangle that toggles when pressed, the panel's basic
//! control. The same tile is borrowed by a screen (lifecycle) and by the
//! canvas (drawing, presses) at once, so its state sits behind shared
//! references. Plain load/store atomics keep tiles `Sync` without needing
//! compare-and-swap, which thumbv6m lacks.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use touchdeck_core::Widget;
use touchdeck_hal::Region;

/// Tile colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    pub fill: Rgb565,
    /// Fill while toggled on
    pub active_fill: Rgb565,
    pub border: Rgb565,
    pub text: Rgb565,
}

impl TileStyle {
    /// Dark green tiles, amber when on
    pub const DEFAULT: Self = Self {
        fill: Rgb565::new(4, 8, 4),
        active_fill: Rgb565::new(31, 40, 0),
        border: Rgb565::new(12, 24, 12),
        text: Rgb565::WHITE,
    };
}

impl Default for TileStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Labelled, toggleable button
pub struct Tile {
    area: Region,
    label: &'static str,
    style: TileStyle,
    visible: AtomicBool,
    dirty: AtomicBool,
    on: AtomicBool,
    presses: AtomicU32,
}

impl Tile {
    /// Create a hidden tile covering `area`
    pub const fn new(area: Region, label: &'static str) -> Self {
        Self {
            area,
            label,
            style: TileStyle::DEFAULT,
            visible: AtomicBool::new(false),
            dirty: AtomicBool::new(false),
            on: AtomicBool::new(false),
            presses: AtomicU32::new(0),
        }
    }

    pub const fn with_style(mut self, style: TileStyle) -> Self {
        self.style = style;
        self
    }

    pub fn area(&self) -> Region {
        self.area
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    /// Needs redrawing (or clearing, once hidden)
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_clean(&self) {
        self.dirty.store(false, Ordering::Relaxed);
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Relaxed)
    }

    /// Times the tile has been pressed since boot
    pub fn presses(&self) -> u32 {
        self.presses.load(Ordering::Relaxed)
    }

    /// Check if a screen point hits this tile
    pub fn hit(&self, x: u16, y: u16) -> bool {
        self.visible.load(Ordering::Relaxed) && self.area.contains(x, y)
    }

    /// Handle a press: toggle and mark for redraw
    pub fn press(&self) {
        self.on.store(!self.on.load(Ordering::Relaxed), Ordering::Relaxed);
        let presses = self.presses.load(Ordering::Relaxed);
        self.presses.store(presses.wrapping_add(1), Ordering::Relaxed);
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Draw the tile into `target`
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let top_left = Point::new(i32::from(self.area.x1), i32::from(self.area.y1));
        let size = Size::new(self.area.width(), self.area.height());
        let fill = if self.on.load(Ordering::Relaxed) {
            self.style.active_fill
        } else {
            self.style.fill
        };

        Rectangle::new(top_left, size)
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(fill)
                    .stroke_color(self.style.border)
                    .stroke_width(1)
                    .build(),
            )
            .draw(target)?;

        let center = Rectangle::new(top_left, size).center();
        Text::with_text_style(
            self.label,
            center,
            MonoTextStyle::new(&FONT_6X10, self.style.text),
            TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(target)?;

        Ok(())
    }
}

impl Widget for Tile {
    fn render(&self) {
        self.visible.store(true, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Relaxed);
    }

    fn destroy(&self) {
        self.visible.store(false, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Relaxed);
    }
}
