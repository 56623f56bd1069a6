use lucida_engine::coords::{Vec2, Viewport};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::GridError;
use crate::geometry::{centroid, point_in_quad};

/// Composition frame presets.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    None,
    Square,
    Widescreen,
    Portrait,
    Standard,
    Photo,
    Custom { width: f32, height: f32 },
}

impl AspectRatio {
    pub const PRESETS: [AspectRatio; 6] = [
        AspectRatio::None,
        AspectRatio::Square,
        AspectRatio::Widescreen,
        AspectRatio::Portrait,
        AspectRatio::Standard,
        AspectRatio::Photo,
    ];

    /// `width / height`, or `None` when no frame should be shown.
    pub fn ratio(self) -> Result<Option<f32>, GridError> {
        let (w, h) = match self {
            AspectRatio::None => return Ok(None),
            AspectRatio::Square => (1.0, 1.0),
            AspectRatio::Widescreen => (16.0, 9.0),
            AspectRatio::Portrait => (9.0, 16.0),
            AspectRatio::Standard => (4.0, 3.0),
            AspectRatio::Photo => (3.0, 2.0),
            AspectRatio::Custom { width, height } => {
                let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
                if !valid {
                    return Err(GridError::InvalidAspectRatio { width, height });
                }
                (width, height)
            }
        };
        Ok(Some(w / h))
    }

    /// Next preset in cycling order. Custom ratios cycle back to `None`.
    pub fn next(self) -> AspectRatio {
        let idx = Self::PRESETS.iter().position(|&p| p == self);
        match idx {
            Some(i) => Self::PRESETS[(i + 1) % Self::PRESETS.len()],
            None => AspectRatio::None,
        }
    }

    pub fn label(self) -> String {
        match self {
            AspectRatio::None => "none".to_owned(),
            AspectRatio::Square => "1:1".to_owned(),
            AspectRatio::Widescreen => "16:9".to_owned(),
            AspectRatio::Portrait => "9:16".to_owned(),
            AspectRatio::Standard => "4:3".to_owned(),
            AspectRatio::Photo => "3:2".to_owned(),
            AspectRatio::Custom { width, height } => format!("{width}:{height}"),
        }
    }
}

/// Draggable composition guide: four world-space corners, clockwise from top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameQuad {
    pub corners: [Vec2; 4],
}

impl FrameQuad {
    /// Largest rectangle of `ratio` that fits the visible view, centered in it.
    pub fn fitted(ratio: f32, camera: &Camera, viewport: Viewport) -> FrameQuad {
        let mut w = viewport.width;
        let mut h = w / ratio;
        if h > viewport.height {
            h = viewport.height;
            w = h * ratio;
        }
        let x = (viewport.width - w) * 0.5;
        let y = (viewport.height - h) * 0.5;
        let screen = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        FrameQuad { corners: screen.map(|p| camera.screen_to_world(p)) }
    }

    pub fn centroid(&self) -> Vec2 {
        centroid(&self.corners)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        point_in_quad(p, &self.corners)
    }

    /// Index of the corner within `radius` of `p`, if any.
    pub fn corner_at(&self, p: Vec2, radius: f32) -> Option<usize> {
        self.corners.iter().position(|c| c.distance(p) <= radius)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for c in &mut self.corners {
            *c += delta;
        }
    }

    /// Scales every corner about the centroid so that corner `index` lands at
    /// the same distance from the centroid as `target`.
    ///
    /// A corner sitting on the centroid cannot define a scale, and a target on
    /// the centroid would collapse the quad; either way nothing changes.
    pub fn scale_corner_to(&mut self, index: usize, target: Vec2) {
        let Some(&corner) = self.corners.get(index) else {
            return;
        };
        let center = self.centroid();
        let from = corner.distance(center);
        let to = target.distance(center);
        if from <= f32::EPSILON || to <= f32::EPSILON {
            return;
        }
        let factor = to / from;
        if !factor.is_finite() {
            return;
        }
        for c in &mut self.corners {
            *c = center + (*c - center) * factor;
        }
    }
}
