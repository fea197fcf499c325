use super::ctx::FrameCtx;

/// What the runtime does after a frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Close the window and leave the event loop.
    Exit,
}

/// A demo driven by the runtime.
///
/// `on_frame` runs once per redraw, after the window events since the last
/// frame have reached [`InputState`](crate::input::InputState) and the UI layer.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
