use crate::core::time::Step;
use crate::raster::pixmap::Pixmap;

/// The lifecycle contract for a room managed by the [`Director`](crate::Director).
///
/// All hooks have empty defaults; rooms implement only what they need.
pub trait Room {
    /// Called the first time the room becomes current.
    fn on_start(&mut self) {}

    /// Called when a previously started room becomes current again.
    fn on_resume(&mut self) {}

    /// Called when the room stops being current.
    fn on_end(&mut self) {}

    /// Called once per simulation step while the room is current.
    fn on_step(&mut self, _step: &Step) {}
}

/// Host-engine screenshot primitive.
///
/// The director calls this to capture the outgoing frame when arming a
/// transition; the returned pixmap is owned by the transition from then on.
pub trait FrameSource {
    fn screenshot(&mut self) -> Pixmap;
}
