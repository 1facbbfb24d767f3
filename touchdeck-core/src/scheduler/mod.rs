//! Cooperative scheduler loop
//!
//! [`Deck`] owns every collaborator and advances all state machines from a
//! single tick. The host calls [`Deck::tick`] at 100 Hz or faster; nothing
//! inside blocks.

pub mod deck;
pub mod toolkit;

pub use deck::{Deck, DeckParts, TickReport};
pub use toolkit::{GuiToolkit, NoToolkit};

/// Hardware bring-up failure
///
/// Fatal to the device; there is no recovery path at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Display panel failed to initialize
    Display,
    /// Touch controller failed to initialize
    Touch,
}
