//! Rendering subsystem.
//!
//! Vector commands are tessellated on the CPU (`tessellate`) into colored
//! triangles. The same triangles feed the GPU mesh renderer and the CPU
//! rasterizer used for exports, so both paths agree on coverage.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
mod image_store;

pub mod raster;
pub mod shapes;
pub mod tessellate;

pub use ctx::{RenderCtx, RenderTarget};
pub use image_store::{ImageStore, StoredImage};
