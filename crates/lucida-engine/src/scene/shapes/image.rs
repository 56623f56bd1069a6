use crate::coords::{Rect, Vec2};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Handle to an image registered in a [`crate::render::ImageStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId(pub u32);

/// Draws a stored image stretched into `dest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: ImageId,
    pub dest: Rect,
    pub opacity: f32,
}

impl DrawList {
    #[inline]
    pub fn push_image(&mut self, z: ZIndex, image: ImageId, dest: Rect, opacity: f32) {
        let t = self.transform();
        let origin = t.apply(dest.origin);
        let size = Vec2::new(t.apply_len(dest.size.x), t.apply_len(dest.size.y));
        self.push(
            z,
            DrawCmd::Image(ImageCmd {
                image,
                dest: Rect { origin, size },
                opacity: opacity.clamp(0.0, 1.0),
            }),
        );
    }
}
