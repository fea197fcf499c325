//! GPU device and window swapchain.
//!
//! [`Gpu`] owns the device, queue and surface configuration; `surface` holds
//! the format/present policy and resize/error handling.

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
