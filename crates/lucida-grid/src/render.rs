//! Per-frame grid rendering.
//!
//! `render_frame` is pure: it reads the model and camera and records a fresh
//! [`DrawList`]. World-space content is recorded under the camera transform, so
//! widths given here in pixels are divided by the zoom first.

use lucida_engine::coords::{Vec2, Viewport};
use lucida_engine::paint::{Color, Stroke};
use lucida_engine::scene::{Border, DrawList, FillRule, ZIndex};

use crate::camera::Camera;
use crate::config::GridStyle;
use crate::geometry::{geodesic_curves, parallel_lines, projection_fan};
use crate::image_source::ImageSource;
use crate::model::{GridModel, VanishingPoint};

const Z_BACKGROUND: ZIndex = ZIndex::new(0);
const Z_GUIDES: ZIndex = ZIndex::new(10);
const Z_LINES: ZIndex = ZIndex::new(20);
const Z_MARKERS: ZIndex = ZIndex::new(30);
const Z_OUTSIDE_FRAME: ZIndex = ZIndex::new(40);
const Z_FRAME: ZIndex = ZIndex::new(50);

pub fn render_frame(
    model: &GridModel,
    camera: &Camera,
    background: Option<&dyn ImageSource>,
    viewport: Viewport,
    style: &GridStyle,
) -> DrawList {
    let mut list = DrawList::new();
    if !viewport.is_valid() {
        return list;
    }

    if model.settings().show_background
        && let Some(source) = background
        && source.is_ready()
    {
        source.draw_into(&mut list, Z_BACKGROUND, viewport.rect());
    }

    let px = camera.screen_len_to_world(1.0);
    let bounds = camera.visible_corners(viewport);

    list.push_transform(camera.transform());

    draw_horizon(&mut list, model, viewport, px, style);
    draw_reference_grids(&mut list, model, &bounds, viewport, px, style);
    if model.has_perpendicular_pair() {
        draw_axis_guide(&mut list, model, viewport, px, style);
    }

    let line = style.line_width * px;
    let count = model.settings().line_count;
    for p in model.points().iter().filter(|p| p.pair.is_none()) {
        let color = point_color(model, p, style);
        for (from, to) in projection_fan(p.position, &bounds, count) {
            list.push_line(Z_LINES, from, to, Stroke::new(line, color));
        }
    }
    for (a, b) in model.pairs() {
        let color = if model.is_pair_emphasized(a.id, b.id) { own_color(a) } else { style.dimmed };
        for c in geodesic_curves(a.position, b.position, a.curvature, count) {
            list.push_cubic(Z_LINES, c.from, c.ctrl1, c.ctrl2, c.to, Stroke::new(line, color));
        }
    }

    for p in model.points() {
        let border = (model.selected() == Some(p.id))
            .then(|| Border::new(style.selection_width * px, style.selection_outline));
        list.push_circle(Z_MARKERS, p.position, style.marker_radius * px, point_color(model, p, style), border);
    }

    if let Some(frame) = model.frame() {
        list.push_polyline(
            Z_FRAME,
            &frame.corners,
            true,
            Stroke::new(style.frame_width * px, style.frame_outline),
        );
        for &c in &frame.corners {
            list.push_circle(Z_FRAME, c, style.frame_handle_radius * px, style.frame_outline, None);
        }
    }

    list.pop_transform();

    if let Some(frame) = model.frame() {
        let screen = frame.corners.map(|c| camera.world_to_screen(c));
        let view = viewport.corners();
        list.push_polygon(Z_OUTSIDE_FRAME, &[&view[..], &screen[..]], style.outside_frame, FillRule::EvenOdd);
    }

    list
}

fn own_color(p: &VanishingPoint) -> Color {
    Color::rgb(p.color[0], p.color[1], p.color[2])
}

fn point_color(model: &GridModel, p: &VanishingPoint, style: &GridStyle) -> Color {
    if model.is_emphasized(p.id) { own_color(p) } else { style.dimmed }
}

fn draw_horizon(list: &mut DrawList, model: &GridModel, viewport: Viewport, px: f32, style: &GridStyle) {
    let horizon = model.horizon();
    let reach = horizon.axis() * (style.horizon_span * viewport.width * px);
    let center = horizon.center();
    list.push_line(
        Z_GUIDES,
        center - reach,
        center + reach,
        Stroke::new(style.horizon_width * px, style.horizon),
    );
}

fn draw_axis_guide(list: &mut DrawList, model: &GridModel, viewport: Viewport, px: f32, style: &GridStyle) {
    let horizon = model.horizon();
    let reach = horizon.normal() * (style.horizon_span * viewport.height * px);
    let center = horizon.center();
    list.push_line(
        Z_GUIDES,
        center - reach,
        center + reach,
        Stroke::new(style.line_width * px, style.axis_guide),
    );
}

/// Straight lines parallel and perpendicular to the horizon, `line_count`
/// across the visible extent.
fn draw_reference_grids(
    list: &mut DrawList,
    model: &GridModel,
    bounds: &[Vec2; 4],
    viewport: Viewport,
    px: f32,
    style: &GridStyle,
) {
    let settings = model.settings();
    let horizon = model.horizon();
    let count = settings.line_count.max(1) as f32;
    let stroke = Stroke::new(style.line_width * px, style.reference_grid);

    if settings.show_parallel_grid {
        let spacing = viewport.height * px / count;
        for (a, b) in parallel_lines(horizon.center(), horizon.axis(), spacing, bounds) {
            list.push_line(Z_GUIDES, a, b, stroke);
        }
    }
    if settings.show_perpendicular_grid {
        let spacing = viewport.width * px / count;
        for (a, b) in parallel_lines(horizon.center(), horizon.normal(), spacing, bounds) {
            list.push_line(Z_GUIDES, a, b, stroke);
        }
    }
}
