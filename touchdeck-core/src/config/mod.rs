//! Configuration types and parsing
//!
//! Types shared by the control core and the firmware, plus the TOML-subset
//! parser used for the embedded `deck.toml`.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
