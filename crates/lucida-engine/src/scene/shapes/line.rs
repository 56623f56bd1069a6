use crate::coords::Vec2;
use crate::paint::Stroke;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Straight segment payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: Stroke,
}

impl DrawList {
    /// Records a straight segment through the current transform.
    #[inline]
    pub fn push_line(&mut self, z: ZIndex, from: Vec2, to: Vec2, stroke: Stroke) {
        let t = self.transform();
        self.push(
            z,
            DrawCmd::Line(LineCmd {
                from: t.apply(from),
                to: t.apply(to),
                stroke: Stroke::new(t.apply_len(stroke.width), stroke.color),
            }),
        );
    }
}
