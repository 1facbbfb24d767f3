//! Touch input
//!
//! The [`InputDebouncer`] rate-limits hardware reads and turns raw touch
//! points into [`TouchSample`]s for the GUI toolkit and the power controller.

pub mod debouncer;
pub mod sample;

pub use debouncer::InputDebouncer;
pub use sample::TouchSample;
