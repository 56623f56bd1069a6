use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a filled circle with an optional border, through the current transform.
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        fill: Color,
        border: Option<Border>,
    ) {
        let t = self.transform();
        self.push(
            z,
            DrawCmd::Circle(CircleCmd {
                center: t.apply(center),
                radius: t.apply_len(radius),
                fill,
                border: border.map(|b| Border::new(t.apply_len(b.width), b.color)),
            }),
        );
    }
}
