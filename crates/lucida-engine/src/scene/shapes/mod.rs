pub(crate) mod circle;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod path;
pub(crate) mod polygon;

pub use circle::CircleCmd;
pub use image::{ImageCmd, ImageId};
pub use line::LineCmd;
pub use path::{CubicCmd, PolylineCmd};
pub use polygon::{FillRule, PolygonCmd};

use crate::paint::Color;

/// Stroke drawn along the outer edge of a filled shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
