use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// How overlapping contours decide coverage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FillRule {
    /// Inside when the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside when an odd number of edges lie to one side.
    EvenOdd,
}

/// Filled region bounded by one or more closed contours.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCmd {
    pub contours: Vec<Vec<Vec2>>,
    pub fill: Color,
    pub rule: FillRule,
}

impl DrawList {
    /// Records a filled polygon. Contours with fewer than three points are dropped.
    pub fn push_polygon(&mut self, z: ZIndex, contours: &[&[Vec2]], fill: Color, rule: FillRule) {
        let t = self.transform();
        let contours: Vec<Vec<Vec2>> = contours
            .iter()
            .filter(|c| c.len() >= 3)
            .map(|c| c.iter().map(|&p| t.apply(p)).collect())
            .collect();
        if contours.is_empty() {
            return;
        }
        self.push(z, DrawCmd::Polygon(PolygonCmd { contours, fill, rule }));
    }
}
