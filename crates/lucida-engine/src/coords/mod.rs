//! Coordinate and geometry types shared across the engine and the grid.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! World-space content (the perspective grid) is mapped into this space by a
//! [`Transform`]; renderers convert logical px to NDC in shaders.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
