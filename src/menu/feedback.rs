/// Selection feedback hook, typically a haptic tick on touch devices.
///
/// Methods take `&self`; implementations that count or buffer use interior
/// mutability.
pub trait SelectionFeedback {
    /// Called when a panel opens so the device can warm up.
    fn prepare(&self) {}

    /// Called each time the highlighted row changes during a drag.
    fn selection_changed(&self);
}

/// Feedback that does nothing, the default on desktop.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFeedback;

impl SelectionFeedback for NoFeedback {
    fn selection_changed(&self) {}
}
