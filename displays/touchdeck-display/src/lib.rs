//! Tile widgets and banded redraw for touchdeck panels
//!
//! This crate provides:
//! - `Tile`, a labelled button implementing the core `Widget` lifecycle
//! - `Canvas`, the `GuiToolkit` the scheduler drives: it redraws dirty
//!   tiles and routes presses to the tile under the finger
//! - `DrawBuffer`, an `embedded-graphics` draw target covering a band of
//!   screen rows, flushed through a `PixelWriter`
//!
//! # Architecture
//!
//! ```text
//!   Screen ──render()/destroy()──▶ Tile ◀──draw── Canvas
//!                                                  │
//!                                  DrawBuffer ◀────┘ (band by band)
//!                                      │
//!                                      ▼
//!                                 PixelWriter (panel)
//! ```
//!
//! Memory is bounded: one band of `B` pixels is reused for every flush, so
//! the panel never needs a full frame buffer.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod canvas;
pub mod tile;

pub use buffer::DrawBuffer;
pub use canvas::Canvas;
pub use tile::{Tile, TileStyle};
