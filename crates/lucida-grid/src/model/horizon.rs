use lucida_engine::coords::Vec2;
use serde::{Deserialize, Serialize};

use super::point::Anchor;

/// Eye-level line. Its center is always at world x = 0.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    /// World y of the center.
    pub level: f32,
    /// Degrees, clockwise on screen (y grows down).
    pub rotation: f32,
}

impl Default for Horizon {
    fn default() -> Self {
        Self { level: 0.0, rotation: 0.0 }
    }
}

impl Horizon {
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(0.0, self.level)
    }

    /// Unit vector along the line.
    #[inline]
    pub fn axis(&self) -> Vec2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Vec2::new(cos, sin)
    }

    /// Unit vector perpendicular to the line, pointing "up" at rotation 0.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Vec2::new(sin, -cos)
    }

    /// Position an anchored point resolves to. `None` for free points.
    pub fn resolve(&self, anchor: &Anchor) -> Option<Vec2> {
        match *anchor {
            Anchor::Free => None,
            Anchor::Horizon { offset } => Some(self.center() + self.axis() * offset),
            Anchor::Perpendicular { offset } => Some(self.center() + self.normal() * offset),
        }
    }

    /// Offset along the horizon axis of `world`.
    #[inline]
    pub fn project_on_axis(&self, world: Vec2) -> f32 {
        (world - self.center()).dot(self.axis())
    }

    /// Offset along the perpendicular axis of `world`.
    #[inline]
    pub fn project_on_normal(&self, world: Vec2) -> f32 {
        (world - self.center()).dot(self.normal())
    }
}
