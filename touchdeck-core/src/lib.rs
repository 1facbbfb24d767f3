//! Board-agnostic control core for touchscreen panel firmware
//!
//! This crate contains all control logic that does not depend on specific
//! hardware implementations:
//!
//! - Screen and widget lifecycle with inactivity timeouts
//! - Display power controller (auto-dim or sleep, wake on touch)
//! - Touch input debouncing
//! - The cooperative scheduler loop tying them together
//! - Configuration types and a TOML-subset parser
//! - Periodic resource diagnostics
//!
//! Everything runs on a single control loop. Timeouts are re-evaluated on
//! every tick against a wrapping millisecond clock; nothing blocks and
//! nothing is scheduled as a callback.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod diag;
pub mod input;
pub mod power;
pub mod scheduler;
pub mod time;
pub mod ui;

#[cfg(test)]
mod mock;

pub use config::DeckConfig;
pub use input::{InputDebouncer, TouchSample};
pub use power::{DisplayPowerController, PowerAction};
pub use scheduler::{Deck, GuiToolkit, TickReport};
pub use ui::{Screen, Widget};
