//! touchdeck - Touch Panel Control Firmware
//!
//! Main firmware binary for RP2040-based touch panels. One control task
//! drives display power, touch debouncing and screen lifecycle on core 0; a
//! one-shot task on core 1 builds the widget toolkit while the buses come up.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, Spawner};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_time::Instant;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use touchdeck_core::config::{parse_config, DeckConfig};
use touchdeck_core::scheduler::DeckParts;
use touchdeck_core::Deck;

use crate::clock::EmbassyClock;
use crate::monitor::HeapMonitor;

mod board;
mod channels;
mod clock;
mod monitor;
mod tasks;
mod ui;

#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit deck.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../deck.toml");

static CONFIG: StaticCell<DeckConfig> = StaticCell::new();

/// Core 1 stack; large enough to hold a canvas while it is built
static mut CORE1_STACK: Stack<{ 32 * 1024 }> = Stack::new();
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("touchdeck firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static DeckConfig = CONFIG.init(load_config());

    // Build the toolkit on core 1 while core 0 brings the buses up
    let panel_config = &config.panel;
    #[allow(static_mut_refs)]
    let core1_stack = unsafe { &mut CORE1_STACK };
    spawn_core1(
        p.CORE1,
        core1_stack,
        move || {
            let executor = CORE1_EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                spawner
                    .spawn(tasks::toolkit_init_task(panel_config))
                    .unwrap();
            })
        },
    );

    let resources = board::BoardResources {
        spi: p.SPI0,
        lcd_sck: p.PIN_18,
        lcd_mosi: p.PIN_19,
        lcd_cs: p.PIN_17,
        lcd_dc: p.PIN_20,
        backlight_slice: p.PWM_SLICE2,
        backlight: p.PIN_21,
        i2c: p.I2C0,
        touch_scl: p.PIN_5,
        touch_sda: p.PIN_4,
    };
    let (panel, touch) = board::bring_up(resources, &config.panel);

    let ui = channels::TOOLKIT_READY.wait().await;

    let parts = DeckParts {
        clock: EmbassyClock,
        panel,
        touch,
        gui: ui.canvas,
        monitor: HeapMonitor::new(&HEAP),
    };
    let mut deck = match Deck::new(config, parts) {
        Ok(deck) => deck,
        Err(e) => {
            error!("Hardware bring-up failed: {}", e);
            defmt::panic!("boot failed");
        }
    };

    ui::attach(&mut deck, ui.tiles);
    if !deck.show_screen(ui::HOME) {
        warn!("No '{=str}' screen configured", ui::HOME);
    }

    info!("Boot completed in {} ms", Instant::now().as_millis());

    spawner
        .spawn(tasks::control_task(deck, ui::Navigator::new(ui.tiles)))
        .unwrap();
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded deck.toml
///
/// Falls back to defaults if it does not parse; build.rs validates the same
/// file, so this only happens with a hand-patched image.
fn load_config() -> DeckConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Parsed embedded configuration: {} screens",
                config.screens.len()
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            DeckConfig::default()
        }
    }
}
