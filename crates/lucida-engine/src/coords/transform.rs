use super::Vec2;

/// Uniform scale followed by a translation: `p' = p * scale + translate`.
///
/// This is the only transform the draw stream needs: world space is mapped to
/// logical pixels by the camera's zoom and pan.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translate: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { scale: 1.0, translate: Vec2::zero() };

    #[inline]
    pub const fn new(scale: f32, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        p * self.scale + self.translate
    }

    /// Maps a length (radius, stroke width).
    #[inline]
    pub fn apply_len(self, len: f32) -> f32 {
        len * self.scale
    }

    #[inline]
    pub fn invert(self, p: Vec2) -> Vec2 {
        (p - self.translate) / self.scale
    }

    /// `self` applied after `inner`.
    #[inline]
    pub fn compose(self, inner: Transform) -> Transform {
        Transform {
            scale: self.scale * inner.scale,
            translate: self.apply(inner.translate),
        }
    }
}
