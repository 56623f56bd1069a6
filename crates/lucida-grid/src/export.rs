//! Cutting the framed region out of a rendered surface.

use image::{Rgba, RgbaImage};
use lucida_engine::coords::{Rect, Vec2};

use crate::camera::Camera;
use crate::geometry::point_in_quad;
use crate::model::FrameQuad;

/// Copies the part of `surface` covered by `quad`.
///
/// The result is the bounding box of the quad's screen projection, clamped to
/// the surface; pixels whose centers fall outside the quad are left fully
/// transparent. Returns `None` when nothing of the quad is on the surface.
pub fn clip_to_frame(surface: &RgbaImage, quad: &FrameQuad, camera: &Camera) -> Option<RgbaImage> {
    let screen = quad.corners.map(|c| camera.world_to_screen(c));
    let bounds = Rect::bounding(&screen)?;
    let surface_rect = Rect::new(0.0, 0.0, surface.width() as f32, surface.height() as f32);
    let clipped = bounds.intersect(surface_rect)?;

    let x0 = clipped.min().x.floor().max(0.0) as u32;
    let y0 = clipped.min().y.floor().max(0.0) as u32;
    let x1 = (clipped.max().x.ceil() as u32).min(surface.width());
    let y1 = (clipped.max().y.ceil() as u32).min(surface.height());
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut out = RgbaImage::from_pixel(x1 - x0, y1 - y0, Rgba([0, 0, 0, 0]));
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if point_in_quad(center, &screen) {
                out.put_pixel(x - x0, y - y0, *surface.get_pixel(x, y));
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RgbaImage {
        RgbaImage::from_fn(20, 10, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> FrameQuad {
        FrameQuad {
            corners: [Vec2::new(x0, y0), Vec2::new(x1, y0), Vec2::new(x1, y1), Vec2::new(x0, y1)],
        }
    }

    #[test]
    fn axis_aligned_frame_copies_exact_block() {
        let out = clip_to_frame(&surface(), &quad(4.0, 2.0, 12.0, 8.0), &Camera::default());
        let out = out.expect("clipped image");
        assert_eq!(out.dimensions(), (8, 6));
        assert_eq!(out.get_pixel(0, 0), &Rgba([4, 2, 7, 255]));
        assert_eq!(out.get_pixel(7, 5), &Rgba([11, 7, 7, 255]));
    }

    #[test]
    fn frame_is_mapped_through_camera() {
        let mut camera = Camera::default();
        camera.set_scale(2.0);
        camera.pan = Vec2::new(2.0, 0.0);
        // World (1, 1)..(4, 3) lands on screen (4, 2)..(10, 6).
        let out = clip_to_frame(&surface(), &quad(1.0, 1.0, 4.0, 3.0), &camera);
        let out = out.expect("clipped image");
        assert_eq!(out.dimensions(), (6, 4));
        assert_eq!(out.get_pixel(0, 0), &Rgba([4, 2, 7, 255]));
    }

    #[test]
    fn pixels_outside_a_rotated_quad_are_transparent() {
        let diamond = FrameQuad {
            corners: [Vec2::new(10.0, 0.0), Vec2::new(20.0, 5.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 5.0)],
        };
        let out = clip_to_frame(&surface(), &diamond, &Camera::default()).expect("clipped image");
        assert_eq!(out.dimensions(), (20, 10));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(10, 5), &Rgba([10, 5, 7, 255]));
    }

    #[test]
    fn partially_offscreen_frame_is_clamped() {
        let out = clip_to_frame(&surface(), &quad(-5.0, -5.0, 3.0, 3.0), &Camera::default());
        assert_eq!(out.map(|o| o.dimensions()), Some((3, 3)));
    }

    #[test]
    fn offscreen_frame_yields_nothing() {
        assert!(clip_to_frame(&surface(), &quad(30.0, 30.0, 40.0, 40.0), &Camera::default()).is_none());
    }
}
