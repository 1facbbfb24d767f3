//! Startup hand-off between tasks
//!
//! The only cross-task traffic in this firmware: once the control loop runs,
//! every state machine lives in the control task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::ui::Ui;

/// Raised by the toolkit init task on core 1 when the tile set and canvas
/// are built
pub static TOOLKIT_READY: Signal<CriticalSectionRawMutex, Ui> = Signal::new();
