//! Embassy async tasks
//!
//! The toolkit init task runs once on core 1 during boot; afterwards the
//! control task is the only thread of control touching panel, touch or screen state.

pub mod control;
pub mod toolkit_init;

pub use control::{control_task, AppDeck};
pub use toolkit_init::toolkit_init_task;
