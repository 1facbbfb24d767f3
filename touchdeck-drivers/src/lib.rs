//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in touchdeck-hal, written against `embedded-hal` 1.0 so they run
//! on any board with a blocking SPI/I2C/PWM implementation:
//!
//! - Display: ST7796 SPI panel with a PWM backlight
//! - Touch: FT6x36 capacitive touch controller (I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod touch;

pub use display::{Panel, PanelError, PwmBacklight, St7796};
pub use touch::{Ft6x36, TouchError, TouchMapping};
