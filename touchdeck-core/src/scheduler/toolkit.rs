//! GUI toolkit capability
//!
//! The toolkit's drawing and layout engine lives outside the core. The core
//! only drives it: rate-limited timer work with a pixel sink to flush into,
//! and pointer samples from the debouncer.

use touchdeck_hal::PixelWriter;

use crate::input::TouchSample;

/// Hooks the scheduler calls on the GUI toolkit
pub trait GuiToolkit {
    /// Run pending timer-driven work (redraw, layout, animations)
    ///
    /// Called at most once per GUI interval. Rendered blocks are flushed
    /// through `display`.
    fn run_pending_work(&mut self, now_ms: u32, display: &mut dyn PixelWriter);

    /// Deliver the current pointer sample
    ///
    /// Called every tick, including replayed samples.
    fn pointer_input(&mut self, sample: &TouchSample);
}

impl<T: GuiToolkit + ?Sized> GuiToolkit for &mut T {
    fn run_pending_work(&mut self, now_ms: u32, display: &mut dyn PixelWriter) {
        (**self).run_pending_work(now_ms, display)
    }

    fn pointer_input(&mut self, sample: &TouchSample) {
        (**self).pointer_input(sample)
    }
}

/// Toolkit that does nothing (headless operation)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToolkit;

impl GuiToolkit for NoToolkit {
    fn run_pending_work(&mut self, _now_ms: u32, _display: &mut dyn PixelWriter) {}

    fn pointer_input(&mut self, _sample: &TouchSample) {}
}
