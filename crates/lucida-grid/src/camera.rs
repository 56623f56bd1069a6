use lucida_engine::coords::{Transform, Vec2, Viewport};

use crate::config::GridConfig;

/// Which kind of pointer a hit test is for. Touch gets a larger target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pan/zoom state for the world plane.
///
/// `screen = world * scale + pan`. `pan` is in logical pixels, `scale` is kept
/// inside `[min_scale, max_scale]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    scale: f32,
    min_scale: f32,
    max_scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}

impl Camera {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            pan: Vec2::zero(),
            scale: 1.0,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    /// Camera whose world x = 0 sits on the horizontal middle of `viewport`.
    ///
    /// With the horizon level at half the viewport height this puts the horizon
    /// center at the screen center.
    pub fn centered(config: &GridConfig, viewport: Viewport) -> Self {
        let mut camera = Self::new(config);
        camera.pan = Vec2::new(viewport.width * 0.5, 0.0);
        camera
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the scale, clamped. Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.pan)
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.pan
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.scale
    }

    /// Converts a screen-space distance (pixels) to world units.
    #[inline]
    pub fn screen_len_to_world(&self, len: f32) -> f32 {
        len / self.scale
    }

    pub fn hit_radius(&self, kind: PointerKind, config: &GridConfig) -> f32 {
        let px = match kind {
            PointerKind::Mouse => config.mouse_hit_radius,
            PointerKind::Touch => config.touch_hit_radius,
        };
        self.screen_len_to_world(px)
    }

    pub fn pan_by(&mut self, screen_delta: Vec2) {
        if screen_delta.is_finite() {
            self.pan += screen_delta;
        }
    }

    /// Multiplies the scale by `factor`, keeping the world point under `anchor`
    /// (screen space) fixed on screen.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.set_scale(self.scale * factor);
        self.pan = anchor - world * self.scale;
    }

    /// Viewport corners in world space, clockwise from top-left.
    pub fn visible_corners(&self, viewport: Viewport) -> [Vec2; 4] {
        viewport.corners().map(|c| self.screen_to_world(c))
    }

    /// World position under the viewport center.
    pub fn view_center(&self, viewport: Viewport) -> Vec2 {
        self.screen_to_world(viewport.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn camera(scale: f32, pan: Vec2) -> Camera {
        let mut c = Camera::default();
        c.set_scale(scale);
        c.pan = pan;
        c
    }

    #[test]
    fn default_uses_default_config_limits() {
        let mut c = Camera::default();
        assert_eq!(c, Camera::new(&GridConfig::default()));
        c.set_scale(1000.0);
        assert_eq!(c.scale(), GridConfig::default().max_scale);
    }

    // ── conversions ─────────────────────────────────────────────────────

    #[test]
    fn screen_world_round_trip() {
        let c = camera(2.5, Vec2::new(-40.0, 13.0));
        for p in [Vec2::new(0.0, 0.0), Vec2::new(123.4, -55.0), Vec2::new(-800.0, 600.0)] {
            assert!(approx(c.world_to_screen(c.screen_to_world(p)), p));
            assert!(approx(c.screen_to_world(c.world_to_screen(p)), p));
        }
    }

    #[test]
    fn transform_matches_world_to_screen() {
        let c = camera(3.0, Vec2::new(5.0, 7.0));
        let p = Vec2::new(-2.0, 4.0);
        assert!(approx(c.transform().apply(p), c.world_to_screen(p)));
    }

    #[test]
    fn centered_camera_maps_origin_x_to_middle() {
        let c = Camera::centered(&GridConfig::default(), Viewport::new(800.0, 600.0));
        let s = c.world_to_screen(Vec2::new(0.0, 300.0));
        assert!(approx(s, Vec2::new(400.0, 300.0)));
    }

    // ── zoom ────────────────────────────────────────────────────────────

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut c = camera(1.0, Vec2::new(30.0, -20.0));
        let anchor = Vec2::new(250.0, 180.0);
        let before = c.screen_to_world(anchor);
        for factor in [1.1, 1.1, 3.0, 0.5, 0.2, 1.0 / 1.1] {
            c.zoom_about(anchor, factor);
            assert!(approx(c.screen_to_world(anchor), before));
        }
    }

    #[test]
    fn zoom_is_clamped_and_still_anchored() {
        let mut c = Camera::default();
        let anchor = Vec2::new(100.0, 100.0);
        let before = c.screen_to_world(anchor);

        c.zoom_about(anchor, 1000.0);
        assert_eq!(c.scale(), 20.0);
        assert!(approx(c.screen_to_world(anchor), before));

        c.zoom_about(anchor, 1e-6);
        assert_eq!(c.scale(), 0.1);
        assert!(approx(c.screen_to_world(anchor), before));
    }

    #[test]
    fn invalid_zoom_factor_is_ignored() {
        let mut c = camera(2.0, Vec2::new(1.0, 1.0));
        c.zoom_about(Vec2::zero(), f32::NAN);
        c.zoom_about(Vec2::zero(), 0.0);
        c.zoom_about(Vec2::zero(), -1.0);
        assert_eq!(c, camera(2.0, Vec2::new(1.0, 1.0)));
    }

    // ── hit radius ──────────────────────────────────────────────────────

    #[test]
    fn hit_radius_is_constant_on_screen() {
        let config = GridConfig::default();
        let c = camera(4.0, Vec2::zero());
        assert!((c.hit_radius(PointerKind::Mouse, &config) - 2.5).abs() < EPS);
        assert!((c.hit_radius(PointerKind::Touch, &config) - 5.0).abs() < EPS);
    }
}
