//! Screens and their widgets
//!
//! A [`Screen`] is a named, ordered list of borrowed [`Widget`]s with its
//! own activation state and inactivity timeout. Activation is driven by the
//! navigation layer above the core; the screen only ever deactivates itself.

pub mod screen;
pub mod widget;

pub use screen::Screen;
pub use widget::Widget;
