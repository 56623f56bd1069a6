use crate::coords::Vec2;
use crate::paint::Stroke;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Cubic bezier stroke `from → to` with two control points.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicCmd {
    pub from: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
    pub stroke: Stroke,
}

/// Connected segments; `closed` joins the last point back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineCmd {
    pub points: Vec<Vec2>,
    pub closed: bool,
    pub stroke: Stroke,
}

impl DrawList {
    #[inline]
    pub fn push_cubic(
        &mut self,
        z: ZIndex,
        from: Vec2,
        ctrl1: Vec2,
        ctrl2: Vec2,
        to: Vec2,
        stroke: Stroke,
    ) {
        let t = self.transform();
        self.push(
            z,
            DrawCmd::Cubic(CubicCmd {
                from: t.apply(from),
                ctrl1: t.apply(ctrl1),
                ctrl2: t.apply(ctrl2),
                to: t.apply(to),
                stroke: Stroke::new(t.apply_len(stroke.width), stroke.color),
            }),
        );
    }

    /// Records a polyline. Fewer than two points records nothing.
    pub fn push_polyline(&mut self, z: ZIndex, points: &[Vec2], closed: bool, stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        let t = self.transform();
        self.push(
            z,
            DrawCmd::Polyline(PolylineCmd {
                points: points.iter().map(|&p| t.apply(p)).collect(),
                closed,
                stroke: Stroke::new(t.apply_len(stroke.width), stroke.color),
            }),
        );
    }
}
