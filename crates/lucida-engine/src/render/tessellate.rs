//! CPU tessellation of vector draw commands into colored triangles.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::{Color, Stroke};
use crate::scene::{DrawCmd, FillRule};

/// Thinner strokes are widened to this (logical px) so they never vanish.
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Approximate length of one flattened curve segment (logical px).
const CURVE_STEP: f32 = 8.0;
const MAX_CURVE_SEGMENTS: usize = 256;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 2],
    /// Premultiplied.
    pub color: [f32; 4],
}

/// Indexed triangle list.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [MeshVertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }

    fn push_vertex(&mut self, p: Vec2, color: Color) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(MeshVertex { pos: [p.x, p.y], color: color.as_array() });
        idx
    }

    pub fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        let i = self.push_vertex(a, color);
        self.push_vertex(b, color);
        self.push_vertex(c, color);
        self.indices.extend_from_slice(&[i, i + 1, i + 2]);
    }

    /// `a b c d` in order around the quad.
    pub fn push_quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) {
        let i = self.push_vertex(a, color);
        self.push_vertex(b, color);
        self.push_vertex(c, color);
        self.push_vertex(d, color);
        self.indices.extend_from_slice(&[i, i + 1, i + 2, i, i + 2, i + 3]);
    }
}

/// Appends the triangles for `cmd` to `out`.
///
/// Returns `false` for commands that are not vector geometry (images).
pub fn tessellate(cmd: &DrawCmd, out: &mut Mesh) -> bool {
    match cmd {
        DrawCmd::Line(l) => stroke_segment(out, l.from, l.to, l.stroke, 0.0),
        DrawCmd::Cubic(c) => {
            let points = flatten_cubic(c.from, c.ctrl1, c.ctrl2, c.to);
            stroke_polyline(out, &points, false, c.stroke);
        }
        DrawCmd::Polyline(p) => stroke_polyline(out, &p.points, p.closed, p.stroke),
        DrawCmd::Circle(c) => {
            fill_circle(out, c.center, c.radius, c.fill);
            if let Some(border) = &c.border {
                let half = border.width.max(MIN_STROKE_WIDTH) * 0.5;
                stroke_ring(out, c.center, (c.radius - half).max(0.0), c.radius + half, border.color);
            }
        }
        DrawCmd::Polygon(p) => fill_polygon(out, &p.contours, p.rule, p.fill),
        DrawCmd::Image(_) => return false,
    }
    true
}

/// Point on a cubic bezier at `t ∈ [0, 1]`.
pub fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Samples a cubic into a polyline; segment count follows the control hull length.
pub fn flatten_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec<Vec2> {
    let hull = p0.distance(p1) + p1.distance(p2) + p2.distance(p3);
    let n = if hull.is_finite() {
        ((hull / CURVE_STEP).ceil() as usize).clamp(1, MAX_CURVE_SEGMENTS)
    } else {
        1
    };
    (0..=n)
        .map(|i| cubic_point(p0, p1, p2, p3, i as f32 / n as f32))
        .collect()
}

/// Quad along `a → b`, extended by `cap` at both ends.
fn stroke_segment(out: &mut Mesh, a: Vec2, b: Vec2, stroke: Stroke, cap: f32) {
    if !a.is_finite() || !b.is_finite() || stroke.color.a <= 0.0 {
        return;
    }
    let dir = (b - a).normalized_or_zero();
    if dir == Vec2::zero() {
        return;
    }
    let half = stroke.width.max(MIN_STROKE_WIDTH) * 0.5;
    let n = dir.perp() * half;
    let (a, b) = (a - dir * cap, b + dir * cap);
    out.push_quad(a + n, b + n, b - n, a - n, stroke.color);
}

/// Segments with square caps so corners stay closed.
fn stroke_polyline(out: &mut Mesh, points: &[Vec2], closed: bool, stroke: Stroke) {
    if points.len() < 2 {
        return;
    }
    let cap = stroke.width.max(MIN_STROKE_WIDTH) * 0.5;
    for w in points.windows(2) {
        stroke_segment(out, w[0], w[1], stroke, cap);
    }
    if closed && points.len() > 2 {
        stroke_segment(out, points[points.len() - 1], points[0], stroke, cap);
    }
}

fn circle_segments(radius: f32) -> usize {
    ((radius * TAU / 4.0).ceil() as usize).clamp(12, 96)
}

fn fill_circle(out: &mut Mesh, center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 || !center.is_finite() || !radius.is_finite() || color.a <= 0.0 {
        return;
    }
    let n = circle_segments(radius);
    let c = out.push_vertex(center, color);
    for i in 0..n {
        let angle = i as f32 / n as f32 * TAU;
        out.push_vertex(center + Vec2::new(angle.cos(), angle.sin()) * radius, color);
    }
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        out.indices.extend_from_slice(&[c, c + 1 + i, c + 1 + next]);
    }
}

fn stroke_ring(out: &mut Mesh, center: Vec2, inner: f32, outer: f32, color: Color) {
    if outer <= inner || !center.is_finite() || !outer.is_finite() || color.a <= 0.0 {
        return;
    }
    let n = circle_segments(outer);
    let base = out.vertices.len() as u32;
    for i in 0..n {
        let angle = i as f32 / n as f32 * TAU;
        let dir = Vec2::new(angle.cos(), angle.sin());
        out.push_vertex(center + dir * inner, color);
        out.push_vertex(center + dir * outer, color);
    }
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        let (i0, o0) = (base + 2 * i, base + 2 * i + 1);
        let (i1, o1) = (base + 2 * next, base + 2 * next + 1);
        out.indices.extend_from_slice(&[i0, o0, o1, i0, o1, i1]);
    }
}

// ── polygon fill ──────────────────────────────────────────────────────────

/// Non-horizontal polygon edge, stored top → bottom.
#[derive(Debug, Copy, Clone)]
struct Edge {
    top: Vec2,
    bottom: Vec2,
    /// +1 when the contour runs downwards along this edge.
    dir: i32,
}

impl Edge {
    fn x_at(&self, y: f32) -> f32 {
        let t = (y - self.top.y) / (self.bottom.y - self.top.y);
        self.top.x + (self.bottom.x - self.top.x) * t
    }
}

fn is_inside(winding: i32, rule: FillRule) -> bool {
    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding.rem_euclid(2) == 1,
    }
}

/// Y at which two edges cross inside their shared vertical span.
fn crossing_y(a: &Edge, b: &Edge) -> Option<f32> {
    let lo = a.top.y.max(b.top.y);
    let hi = a.bottom.y.min(b.bottom.y);
    if hi <= lo {
        return None;
    }
    let d0 = a.x_at(lo) - b.x_at(lo);
    let d1 = a.x_at(hi) - b.x_at(hi);
    if d0 * d1 >= 0.0 {
        return None;
    }
    Some(lo + (hi - lo) * d0 / (d0 - d1))
}

/// Fills closed contours under `rule` by splitting them into horizontal slabs.
///
/// Slab boundaries are every vertex y and every edge crossing, so no two edges
/// cross inside a slab and each covered span is an exact trapezoid.
fn fill_polygon(out: &mut Mesh, contours: &[Vec<Vec2>], rule: FillRule, color: Color) {
    if color.a <= 0.0 {
        return;
    }

    let mut edges = Vec::new();
    for contour in contours {
        if contour.iter().any(|p| !p.is_finite()) {
            continue;
        }
        let n = contour.len();
        for i in 0..n {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            if a.y < b.y {
                edges.push(Edge { top: a, bottom: b, dir: 1 });
            } else if a.y > b.y {
                edges.push(Edge { top: b, bottom: a, dir: -1 });
            }
        }
    }
    if edges.len() < 2 {
        return;
    }

    let mut ys: Vec<f32> = edges.iter().flat_map(|e| [e.top.y, e.bottom.y]).collect();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if let Some(y) = crossing_y(&edges[i], &edges[j]) {
                ys.push(y);
            }
        }
    }
    ys.sort_by(f32::total_cmp);
    ys.dedup();

    // (x at slab middle, x at top, x at bottom, dir)
    let mut active: Vec<(f32, f32, f32, i32)> = Vec::new();
    for w in ys.windows(2) {
        let (y0, y1) = (w[0], w[1]);
        let ym = (y0 + y1) * 0.5;

        active.clear();
        active.extend(
            edges
                .iter()
                .filter(|e| e.top.y <= ym && ym < e.bottom.y)
                .map(|e| (e.x_at(ym), e.x_at(y0), e.x_at(y1), e.dir)),
        );
        active.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        let mut span_start: Option<(f32, f32)> = None;
        for &(_, x0, x1, dir) in &active {
            let was_inside = is_inside(winding, rule);
            winding += dir;
            match (was_inside, is_inside(winding, rule)) {
                (false, true) => span_start = Some((x0, x1)),
                (true, false) => {
                    if let Some((s0, s1)) = span_start.take() {
                        out.push_quad(
                            Vec2::new(s0, y0),
                            Vec2::new(x0, y0),
                            Vec2::new(x1, y1),
                            Vec2::new(s1, y1),
                            color,
                        );
                    }
                }
                _ => {}
            }
        }
    }
}
