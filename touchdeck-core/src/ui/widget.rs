//! Widget lifecycle capability

/// A renderable UI element owned by the GUI toolkit
///
/// The core never draws; it only tells a widget when to appear and when to
/// tear down its on-screen resources. Both hooks take `&self` because a
/// screen holds shared borrows, so implementations keep their state behind
/// `Cell`/`RefCell`.
pub trait Widget {
    /// Materialize the widget on screen
    fn render(&self);

    /// Tear down the widget's on-screen resources
    fn destroy(&self);
}

impl<W: Widget + ?Sized> Widget for &W {
    fn render(&self) {
        (**self).render()
    }

    fn destroy(&self) {
        (**self).destroy()
    }
}
