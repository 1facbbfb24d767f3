//! Touch input abstractions

/// Raw touch source
///
/// Implementations read the touch controller once per call. No filtering
/// or rate limiting is expected here; that is the debouncer's job.
pub trait TouchSource {
    /// Error type for controller bring-up
    type Error;

    /// Probe and configure the touch controller
    ///
    /// Failure here is fatal to the device.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Read the current touch point
    ///
    /// Returns `Some((x, y))` in panel pixel coordinates while the panel is
    /// touched, `None` when released or when the read failed.
    fn get_touch(&mut self) -> Option<(u16, u16)>;
}

impl<T: TouchSource + ?Sized> TouchSource for &mut T {
    type Error = T::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn get_touch(&mut self) -> Option<(u16, u16)> {
        (**self).get_touch()
    }
}
