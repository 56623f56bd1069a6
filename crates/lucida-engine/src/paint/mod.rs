//! Paint model shared between the grid and renderers.
//!
//! Colors are linear premultiplied alpha; strokes pair a width with a color.
//! Geometry types remain in `coords`.

pub mod color;
pub mod stroke;

pub use color::Color;
pub use stroke::Stroke;
