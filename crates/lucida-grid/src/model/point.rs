use std::fmt;

use lucida_engine::coords::Vec2;
use serde::{Deserialize, Serialize};

/// Vanishing point id. Assigned monotonically, never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared by exactly the two members of a pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PairId(pub u32);

/// How a point's position is derived.
///
/// Anchored variants carry their signed offset from the horizon center, so a
/// free point never has one and an anchored point always does.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Anchor {
    Free,
    /// Offset along the rotated horizon axis.
    Horizon { offset: f32 },
    /// Offset along the axis perpendicular to the horizon (positive is up).
    Perpendicular { offset: f32 },
}

/// Anchor kind without its offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AnchorMode {
    Free,
    Horizon,
    Perpendicular,
}

impl Anchor {
    pub fn mode(&self) -> AnchorMode {
        match self {
            Anchor::Free => AnchorMode::Free,
            Anchor::Horizon { .. } => AnchorMode::Horizon,
            Anchor::Perpendicular { .. } => AnchorMode::Perpendicular,
        }
    }

    pub fn offset(&self) -> Option<f32> {
        match *self {
            Anchor::Free => None,
            Anchor::Horizon { offset } | Anchor::Perpendicular { offset } => Some(offset),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Anchor::Free)
    }
}

/// A convergence target for projected parallel lines.
#[derive(Debug, Clone, PartialEq)]
pub struct VanishingPoint {
    pub id: PointId,
    /// World space.
    pub position: Vec2,
    /// Straight sRGB, display only.
    pub color: [u8; 3],
    pub anchor: Anchor,
    pub pair: Option<PairId>,
    /// Bow of the geodesic grid. Only the first member of a pair is read.
    pub curvature: f32,
}

impl VanishingPoint {
    #[inline]
    pub fn mode(&self) -> AnchorMode {
        self.anchor.mode()
    }

    #[inline]
    pub fn offset(&self) -> Option<f32> {
        self.anchor.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_present_only_when_anchored() {
        assert_eq!(Anchor::Free.offset(), None);
        assert_eq!(Anchor::Horizon { offset: -3.0 }.offset(), Some(-3.0));
        assert_eq!(Anchor::Perpendicular { offset: 2.0 }.offset(), Some(2.0));
        assert_eq!(Anchor::Perpendicular { offset: 2.0 }.mode(), AnchorMode::Perpendicular);
    }

    #[test]
    fn point_id_displays_with_hash() {
        assert_eq!(PointId(12).to_string(), "#12");
    }
}
