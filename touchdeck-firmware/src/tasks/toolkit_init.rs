//! One-shot toolkit bring-up
//!
//! Runs on core 1 and builds the tile set and canvas while core 0
//! configures the panel and touch buses. It touches nothing the control loop
//! owns and exits after handing its result over through [`TOOLKIT_READY`];
//! core 1 then idles in its executor.

use defmt::*;
use embassy_time::Instant;
use static_cell::StaticCell;

use touchdeck_core::config::PanelConfig;

use crate::channels::TOOLKIT_READY;
use crate::ui::{AppCanvas, TileSet, Ui, BACKGROUND};

static TILES: StaticCell<TileSet> = StaticCell::new();
static CANVAS: StaticCell<AppCanvas> = StaticCell::new();

#[embassy_executor::task]
pub async fn toolkit_init_task(panel: &'static PanelConfig) {
    info!("Toolkit init task started");
    let started = Instant::now();

    let tiles: &'static TileSet = TILES.init(TileSet::layout(panel));
    let canvas = CANVAS.init_with(|| AppCanvas::new(panel).with_background(BACKGROUND));

    for tile in tiles.iter() {
        if !canvas.add_tile(tile) {
            warn!("Tile '{=str}' dropped, canvas full", tile.label());
        }
    }

    info!(
        "Toolkit ready: {} tiles in {} ms",
        canvas.tile_count(),
        started.elapsed().as_millis()
    );

    TOOLKIT_READY.signal(Ui { canvas, tiles });
}
