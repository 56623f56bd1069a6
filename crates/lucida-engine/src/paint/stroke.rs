use super::Color;

/// Line style. `width` is in the units of the space the geometry is recorded
/// in; the draw list maps it to logical pixels with the active transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    #[inline]
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
