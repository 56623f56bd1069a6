//! Plane geometry used by the model, renderer and hit-testing.

use lucida_engine::coords::Vec2;

/// Cubic bezier segment in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bezier {
    pub from: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
}

/// True when `p` lies inside (or on the edge of) the quad, for either winding.
///
/// Uses the sign of the cross product of each edge with the vector to `p`. A
/// fully degenerate quad contains nothing.
pub fn point_in_quad(p: Vec2, quad: &[Vec2; 4]) -> bool {
    let mut pos = false;
    let mut neg = false;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let c = (b - a).cross(p - a);
        if c > 0.0 {
            pos = true;
        } else if c < 0.0 {
            neg = true;
        }
    }
    (pos || neg) && !(pos && neg)
}

pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::zero();
    }
    let sum = points.iter().fold(Vec2::zero(), |acc, &p| acc + p);
    sum / points.len() as f32
}

/// Segments from evenly spaced points on each edge of `bounds` to `target`.
///
/// Each of the four edges contributes `divisions + 1` segments, endpoints
/// included, so shared corners appear twice.
pub fn projection_fan(target: Vec2, bounds: &[Vec2; 4], divisions: u32) -> Vec<(Vec2, Vec2)> {
    let n = divisions.max(1);
    let mut out = Vec::with_capacity(4 * (n as usize + 1));
    for i in 0..4 {
        let a = bounds[i];
        let b = bounds[(i + 1) % 4];
        for k in 0..=n {
            out.push((a.lerp(b, k as f32 / n as f32), target));
        }
    }
    out
}

/// Family of bezier curves between two vanishing points.
///
/// Curve `i` bows sideways by `curvature * |d| * 0.5 * t` with `t` running
/// from -1 to 1, so the middle curve is the straight segment. Coincident points
/// yield straight (zero-length) curves.
pub fn geodesic_curves(p1: Vec2, p2: Vec2, curvature: f32, line_count: u32) -> Vec<Bezier> {
    let n = line_count.max(1);
    let d = p2 - p1;
    let perp = d.perp().normalized_or_zero();
    let h = curvature * d.length() * 0.5;
    let half = n as f32 / 2.0;

    (0..=n)
        .map(|i| {
            let t = (i as f32 - half) / half;
            let bow = perp * (h * t);
            Bezier {
                from: p1,
                ctrl1: p1 + d * 0.25 + bow,
                ctrl2: p1 + d * 0.75 + bow,
                to: p2,
            }
        })
        .collect()
}

/// Evenly spaced lines covering `bounds`, parallel to `direction` and spaced
/// `spacing` apart, all passing through offsets of `origin`.
///
/// Used for the optional reference grids. Returns nothing for a zero direction
/// or a non-positive spacing.
pub fn parallel_lines(origin: Vec2, direction: Vec2, spacing: f32, bounds: &[Vec2; 4]) -> Vec<(Vec2, Vec2)> {
    let dir = direction.normalized_or_zero();
    if dir == Vec2::zero() || !(spacing > 0.0) || !spacing.is_finite() {
        return Vec::new();
    }
    let normal = dir.perp();

    let (mut lo_n, mut hi_n) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut lo_d, mut hi_d) = (f32::INFINITY, f32::NEG_INFINITY);
    for &c in bounds {
        let rel = c - origin;
        lo_n = lo_n.min(rel.dot(normal));
        hi_n = hi_n.max(rel.dot(normal));
        lo_d = lo_d.min(rel.dot(dir));
        hi_d = hi_d.max(rel.dot(dir));
    }
    if !(lo_n.is_finite() && hi_n.is_finite()) {
        return Vec::new();
    }

    let first = (lo_n / spacing).ceil() as i64;
    let last = (hi_n / spacing).floor() as i64;
    if last < first || last - first > 10_000 {
        return Vec::new();
    }
    (first..=last)
        .map(|k| {
            let base = origin + normal * (k as f32 * spacing);
            (base + dir * lo_d, base + dir * hi_d)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn square() -> [Vec2; 4] {
        [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)]
    }

    // ── point_in_quad ───────────────────────────────────────────────────

    #[test]
    fn inside_for_both_windings() {
        let cw = square();
        let mut ccw = cw;
        ccw.reverse();
        for q in [cw, ccw] {
            assert!(point_in_quad(Vec2::new(5.0, 5.0), &q));
            assert!(!point_in_quad(Vec2::new(15.0, 5.0), &q));
            assert!(!point_in_quad(Vec2::new(-0.1, 5.0), &q));
        }
    }

    #[test]
    fn degenerate_quad_contains_nothing() {
        let q = [Vec2::new(1.0, 1.0); 4];
        assert!(!point_in_quad(Vec2::new(1.0, 1.0), &q));
    }

    // ── projection fan ──────────────────────────────────────────────────

    #[test]
    fn fan_has_line_count_plus_one_per_edge() {
        let target = Vec2::new(50.0, 50.0);
        let fan = projection_fan(target, &square(), 4);
        assert_eq!(fan.len(), 20);
        assert!(fan.iter().all(|&(_, t)| t == target));
        assert!(approx(fan[0].0, Vec2::new(0.0, 0.0)));
        assert!(approx(fan[2].0, Vec2::new(5.0, 0.0)));
        assert!(approx(fan[4].0, Vec2::new(10.0, 0.0)));
    }

    // ── geodesic curves ─────────────────────────────────────────────────

    #[test]
    fn geodesic_middle_curve_is_straight_and_ends_bow_symmetrically() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(100.0, 0.0);
        let curves = geodesic_curves(p1, p2, 0.5, 10);
        assert_eq!(curves.len(), 11);

        let mid = curves[5];
        assert!(approx(mid.ctrl1, Vec2::new(25.0, 0.0)));
        assert!(approx(mid.ctrl2, Vec2::new(75.0, 0.0)));

        // h = 0.5 * 100 * 0.5 = 25, perp of +x is +y.
        assert!(approx(curves[0].ctrl1, Vec2::new(25.0, -25.0)));
        assert!(approx(curves[10].ctrl2, Vec2::new(75.0, 25.0)));
        assert!(curves.iter().all(|c| c.from == p1 && c.to == p2));
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let p = Vec2::new(3.0, 4.0);
        let curves = geodesic_curves(p, p, 2.0, 5);
        for c in curves {
            assert!(c.ctrl1.is_finite() && c.ctrl2.is_finite());
            assert!(approx(c.ctrl1, p));
        }
    }

    #[test]
    fn zero_curvature_gives_straight_curves() {
        let curves = geodesic_curves(Vec2::zero(), Vec2::new(0.0, 40.0), 0.0, 4);
        for c in curves {
            assert!(approx(c.ctrl1, Vec2::new(0.0, 10.0)));
            assert!(approx(c.ctrl2, Vec2::new(0.0, 30.0)));
        }
    }

    // ── reference lines ─────────────────────────────────────────────────

    #[test]
    fn parallel_lines_cover_bounds() {
        let lines = parallel_lines(Vec2::zero(), Vec2::new(1.0, 0.0), 2.5, &square());
        // Horizontal lines at y = 0, 2.5, 5, 7.5, 10.
        assert_eq!(lines.len(), 5);
        for (a, b) in &lines {
            assert!((a.y - b.y).abs() < EPS);
            assert!((a.x - 0.0).abs() < EPS && (b.x - 10.0).abs() < EPS);
        }
    }

    #[test]
    fn parallel_lines_reject_bad_input() {
        assert!(parallel_lines(Vec2::zero(), Vec2::zero(), 1.0, &square()).is_empty());
        assert!(parallel_lines(Vec2::zero(), Vec2::new(1.0, 0.0), 0.0, &square()).is_empty());
    }

    #[test]
    fn centroid_of_square() {
        assert!(approx(centroid(&square()), Vec2::new(5.0, 5.0)));
        assert_eq!(centroid(&[]), Vec2::zero());
    }
}
