//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame yields
//! the delta time the camera controller and the spinning transform consume.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
