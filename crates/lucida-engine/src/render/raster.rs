//! CPU rasterization of a draw list.
//!
//! Used for exports: the result matches what the GPU renderers draw, without a
//! read-back from the swapchain. Coverage is binary per pixel center; blending
//! is premultiplied source-over.

use image::{Rgba, RgbaImage};

use crate::coords::{Rect, Vec2, Viewport};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ImageCmd};

use super::tessellate::{tessellate, Mesh};
use super::ImageStore;

/// Premultiplied float surface.
struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Surface {
    fn new(width: u32, height: u32, clear: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear.clamped().as_array(); (width * height) as usize],
        }
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        let inv = 1.0 - src[3];
        for i in 0..4 {
            dst[i] = src[i] + dst[i] * inv;
        }
    }

    /// Pixel range `[x0, x1) × [y0, y1)` covered by `r`, clamped to the surface.
    fn pixel_bounds(&self, r: Rect) -> Option<(u32, u32, u32, u32)> {
        let r = r.normalized();
        let x0 = r.min().x.floor().max(0.0) as u32;
        let y0 = r.min().y.floor().max(0.0) as u32;
        let x1 = (r.max().x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (r.max().y.ceil().max(0.0) as u32).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn into_image(self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (dst, src) in img.pixels_mut().zip(self.pixels) {
            *dst = Rgba(Color::from_premul(src[0], src[1], src[2], src[3]).to_rgba8());
        }
        img
    }
}

/// Renders `list` into a new RGBA8 (straight alpha) image of the viewport's size.
///
/// Images missing from `images` are skipped.
pub fn rasterize(list: &mut DrawList, viewport: Viewport, images: &ImageStore, clear: Color) -> RgbaImage {
    let width = viewport.width.ceil().max(1.0) as u32;
    let height = viewport.height.ceil().max(1.0) as u32;
    let mut surface = Surface::new(width, height, clear);
    let mut mesh = Mesh::new();
    let full = Rect::new(0.0, 0.0, width as f32, height as f32);

    for item in list.iter_in_paint_order() {
        let clip = item.clip_rect.map_or(Some(full), |c| c.intersect(full));
        let Some(clip) = clip else { continue };

        match &item.cmd {
            DrawCmd::Image(cmd) => draw_image(&mut surface, cmd, clip, images),
            cmd => {
                mesh.clear();
                if tessellate(cmd, &mut mesh) {
                    fill_mesh(&mut surface, &mesh, clip);
                }
            }
        }
    }

    surface.into_image()
}

fn fill_mesh(surface: &mut Surface, mesh: &Mesh, clip: Rect) {
    for [a, b, c] in mesh.triangles() {
        fill_triangle(
            surface,
            [Vec2::new(a.pos[0], a.pos[1]), Vec2::new(b.pos[0], b.pos[1]), Vec2::new(c.pos[0], c.pos[1])],
            a.color,
            clip,
        );
    }
}

/// Tie-break for pixel centers exactly on an edge. Reversing an edge flips the
/// answer, so of two triangles sharing that edge exactly one owns the pixel.
#[inline]
fn owns_edge(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    d.y > 0.0 || (d.y == 0.0 && d.x > 0.0)
}

fn fill_triangle(surface: &mut Surface, mut v: [Vec2; 3], color: [f32; 4], clip: Rect) {
    let area = (v[1] - v[0]).cross(v[2] - v[0]);
    if area == 0.0 || !area.is_finite() || color[3] <= 0.0 {
        return;
    }
    if area < 0.0 {
        v.swap(1, 2);
    }

    let Some(bounds) = Rect::bounding(&v).and_then(|b| {
        // Grow by one px so zero-width bounds still intersect.
        Rect::new(b.origin.x, b.origin.y, b.size.x + 1.0, b.size.y + 1.0).intersect(clip)
    }) else {
        return;
    };
    let Some((x0, y0, x1, y1)) = surface.pixel_bounds(bounds) else { return };

    let edges = [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])];
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if !clip.contains(p) {
                continue;
            }
            let inside = edges.iter().all(|&(from, to)| {
                let w = (to - from).cross(p - from);
                w > 0.0 || (w == 0.0 && owns_edge(from, to))
            });
            if inside {
                surface.blend(x, y, color);
            }
        }
    }
}

fn draw_image(surface: &mut Surface, cmd: &ImageCmd, clip: Rect, images: &ImageStore) {
    let Some(stored) = images.get(cmd.image) else {
        log::debug!("raster: image {:?} not in store", cmd.image);
        return;
    };
    let src = &stored.pixels;
    let dest = cmd.dest.normalized();
    if src.width() == 0 || src.height() == 0 || dest.is_empty() || cmd.opacity <= 0.0 {
        return;
    }
    let Some(area) = dest.intersect(clip) else { return };
    let Some((x0, y0, x1, y1)) = surface.pixel_bounds(area) else { return };

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if !area.contains(p) {
                continue;
            }
            let u = (p.x - dest.origin.x) / dest.size.x;
            let v = (p.y - dest.origin.y) / dest.size.y;
            let sx = ((u * src.width() as f32) as u32).min(src.width() - 1);
            let sy = ((v * src.height() as f32) as u32).min(src.height() - 1);
            let [r, g, b, a] = src.get_pixel(sx, sy).0;
            let c = Color::from_srgb_u8(r, g, b, a).with_alpha(cmd.opacity);
            surface.blend(x, y, c.as_array());
        }
    }
}
