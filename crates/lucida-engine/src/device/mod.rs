//! GPU device + surface management.
//!
//! - `init`: configuration for adapter/device/surface creation
//! - `gpu`: owns Instance/Adapter/Device/Queue and the configured surface
//! - `frame`: an acquired swapchain frame and surface error handling

mod frame;
mod gpu;
mod init;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
