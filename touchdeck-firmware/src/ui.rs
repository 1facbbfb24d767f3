//! Panel layout and screen navigation
//!
//! Two screens, named as in deck.toml: `home` with a navigation tile and
//! scene tiles, and `lights` with a back tile and one toggle per light
//! group. Navigation is driven by the press counters of the two
//! navigation tiles.

use defmt::*;
use embedded_graphics::pixelcolor::Rgb565;

use touchdeck_core::config::PanelConfig;
use touchdeck_core::Widget;
use touchdeck_display::{Canvas, Tile};
use touchdeck_hal::Region;

use crate::tasks::AppDeck;

pub const HOME: &str = "home";
pub const LIGHTS: &str = "lights";

/// Tiles the canvas can hold
pub const MAX_TILES: usize = 8;

/// Draw band: 20 lines of the 480-pixel landscape width
pub const DRAW_BUFFER_PX: usize = 480 * 20;

pub const BACKGROUND: Rgb565 = Rgb565::new(2, 4, 2);

/// Gap around and between tiles
const MARGIN: u16 = 10;

pub type AppCanvas = Canvas<'static, MAX_TILES, DRAW_BUFFER_PX>;

/// Every tile on the panel
pub struct TileSet {
    /// Navigation tile first
    pub home: [Tile; 3],
    /// Back tile first
    pub lights: [Tile; 4],
}

impl TileSet {
    /// Lay both screens out as a 2x2 grid
    pub fn layout(panel: &PanelConfig) -> Self {
        let cell = |index: u16| grid_cell(panel, index);
        Self {
            home: [
                Tile::new(cell(0), "Lights"),
                Tile::new(cell(1), "Evening"),
                Tile::new(cell(2), "All off"),
            ],
            lights: [
                Tile::new(cell(0), "< Home"),
                Tile::new(cell(1), "Kitchen"),
                Tile::new(cell(2), "Hall"),
                Tile::new(cell(3), "Porch"),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.home.iter().chain(self.lights.iter())
    }
}

fn grid_cell(panel: &PanelConfig, index: u16) -> Region {
    let w = (panel.width.saturating_sub(3 * MARGIN) / 2).max(1);
    let h = (panel.height.saturating_sub(3 * MARGIN) / 2).max(1);
    let x = MARGIN + (index % 2) * (w + MARGIN);
    let y = MARGIN + (index / 2) * (h + MARGIN);
    Region::new(x, y, x + w - 1, y + h - 1)
}

/// Toolkit handed from the init task to the control loop
pub struct Ui {
    pub canvas: &'static mut AppCanvas,
    pub tiles: &'static TileSet,
}

/// Register each screen's tiles with the matching deck screen
pub fn attach(deck: &mut AppDeck, tiles: &'static TileSet) {
    for (name, group) in [(HOME, &tiles.home[..]), (LIGHTS, &tiles.lights[..])] {
        let Some(screen) = deck.find_screen_mut(name) else {
            warn!("Screen '{=str}' missing from deck.toml, tiles not shown", name);
            continue;
        };
        for tile in group {
            screen.add_widget(Some(tile as &dyn Widget));
        }
    }
}

/// Switches screens when a navigation tile is pressed
pub struct Navigator {
    tiles: &'static TileSet,
    open_presses: u32,
    back_presses: u32,
}

impl Navigator {
    pub fn new(tiles: &'static TileSet) -> Self {
        Self {
            tiles,
            open_presses: tiles.home[0].presses(),
            back_presses: tiles.lights[0].presses(),
        }
    }

    /// Act on new navigation presses
    ///
    /// Also returns to `home` once every screen has timed out, so the panel
    /// never stays blank.
    pub fn poll(&mut self, deck: &mut AppDeck) {
        let open = self.tiles.home[0].presses();
        if open != self.open_presses {
            self.open_presses = open;
            deck.show_screen(LIGHTS);
        }

        let back = self.tiles.lights[0].presses();
        if back != self.back_presses {
            self.back_presses = back;
            deck.show_screen(HOME);
        }

        let idle = deck.screens().iter().all(|s| !s.is_active());
        if idle && deck.find_screen(HOME).is_some() {
            debug!("No active screen, returning home");
            deck.show_screen(HOME);
        }
    }
}
