//! Resource diagnostics
//!
//! A periodic, best-effort snapshot of heap usage. Not part of the control
//! contract: nothing reacts to it.

pub mod snapshot;

pub use snapshot::SystemSnapshot;
