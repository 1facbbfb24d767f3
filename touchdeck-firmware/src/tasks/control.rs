//! Control loop task
//!
//! Advances every state machine once per tick: GUI work, touch sampling,
//! screen inactivity, display power and diagnostics all run inside
//! `Deck::tick`.

use defmt::*;
use embassy_time::{Duration, Ticker};

use touchdeck_core::Deck;

use crate::board::{AppPanel, AppTouch};
use crate::clock::EmbassyClock;
use crate::monitor::HeapMonitor;
use crate::ui::{AppCanvas, Navigator};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 5;

pub type AppDeck =
    Deck<'static, EmbassyClock, AppPanel, AppTouch, &'static mut AppCanvas, HeapMonitor>;

#[embassy_executor::task]
pub async fn control_task(mut deck: AppDeck, mut navigator: Navigator) {
    info!("Control task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        let report = deck.tick();

        if let Some(action) = report.power {
            trace!("Power action at {} ms: {}", report.now_ms, action);
        }

        navigator.poll(&mut deck);

        ticker.next().await;
    }
}
