//! touchdeck Hardware Abstraction Layer
//!
//! This crate defines the narrow interfaces the control core consumes from
//! its hardware collaborators. Board support code implements them; the core
//! never touches a bus or a register directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  touchdeck-core (screens, power, input) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  touchdeck-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  touchdeck-   │       │  host mocks / │
//! │   drivers     │       │   simulators  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::DisplayActuator`], [`display::PixelWriter`] - Panel power and pixel output
//! - [`touch::TouchSource`] - Raw touch controller reads
//! - [`clock::MonotonicClock`] - Wrapping millisecond clock
//! - [`monitor::SystemMonitor`] - Heap and CPU statistics

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod display;
pub mod monitor;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use clock::{ManualClock, MonotonicClock};
pub use display::{DisplayActuator, PixelWriter, Region, MAX_BRIGHTNESS};
pub use monitor::{NoMonitor, SystemMonitor, SystemStats};
pub use touch::TouchSource;
