//! Vanishing-point model.
//!
//! `GridModel` owns every vanishing point, the horizon, the optional frame
//! quad, the selection and the display settings. All mutation goes through its
//! methods so the anchoring invariants hold after every call:
//!
//! - anchored points sit exactly where the horizon says they should,
//! - every `PairId` in use is shared by exactly two points,
//! - no position or offset is ever NaN or infinite.

mod frame;
mod horizon;
mod point;

pub use frame::{AspectRatio, FrameQuad};
pub use horizon::Horizon;
pub use point::{Anchor, AnchorMode, PairId, PointId, VanishingPoint};

use lucida_engine::coords::{Vec2, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::GridConfig;
use crate::error::GridError;

/// Display toggles and grid density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub line_count: u32,
    pub show_background: bool,
    pub show_parallel_grid: bool,
    pub show_perpendicular_grid: bool,
    pub aspect_ratio: AspectRatio,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            line_count: 10,
            show_background: true,
            show_parallel_grid: false,
            show_perpendicular_grid: false,
            aspect_ratio: AspectRatio::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub id: PointId,
    pub position: [f32; 2],
    pub color: [u8; 3],
    pub anchor: Anchor,
    pub pair: Option<PairId>,
    pub curvature: f32,
}

/// Plain-value dump of the model, for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub points: Vec<PointSnapshot>,
    pub horizon: Horizon,
    pub frame: Option<[[f32; 2]; 4]>,
    pub selected: Option<PointId>,
    pub settings: GridSettings,
}

pub struct GridModel {
    config: GridConfig,
    points: Vec<VanishingPoint>,
    horizon: Horizon,
    frame: Option<FrameQuad>,
    selected: Option<PointId>,
    settings: GridSettings,
    next_point: u32,
    next_pair: u32,
    rng: StdRng,
}

impl GridModel {
    /// Empty model with the horizon at world y = 0.
    pub fn new(config: GridConfig) -> Self {
        let rng = match config.color_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let settings = GridSettings {
            line_count: config.default_line_count.clamp(1, config.max_line_count.max(1)),
            ..GridSettings::default()
        };
        Self {
            config,
            points: Vec::new(),
            horizon: Horizon::default(),
            frame: None,
            selected: None,
            settings,
            next_point: 0,
            next_pair: 0,
            rng,
        }
    }

    /// Model for a fresh view: horizon through the middle of the viewport and
    /// one free point at the view center.
    pub fn for_view(config: GridConfig, camera: &Camera, viewport: Viewport) -> Self {
        let mut model = Self::new(config);
        model.horizon.level = camera.view_center(viewport).y;
        model.add_free_point(camera, viewport);
        model
    }

    // ── accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Points in insertion order (later points are drawn on top).
    pub fn points(&self) -> &[VanishingPoint] {
        &self.points
    }

    pub fn point(&self, id: PointId) -> Option<&VanishingPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn frame(&self) -> Option<&FrameQuad> {
        self.frame.as_ref()
    }

    pub fn selected(&self) -> Option<PointId> {
        self.selected
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// The other member of `id`'s pair.
    pub fn partner(&self, id: PointId) -> Option<&VanishingPoint> {
        let pair = self.point(id)?.pair?;
        self.points.iter().find(|p| p.pair == Some(pair) && p.id != id)
    }

    /// Each pair once, first-created member first.
    pub fn pairs(&self) -> Vec<(&VanishingPoint, &VanishingPoint)> {
        let mut out = Vec::new();
        for (i, a) in self.points.iter().enumerate() {
            let Some(pair) = a.pair else { continue };
            if let Some(b) = self.points[i + 1..].iter().find(|p| p.pair == Some(pair)) {
                out.push((a, b));
            }
        }
        out
    }

    pub fn has_perpendicular_pair(&self) -> bool {
        self.pairs()
            .iter()
            .any(|(a, b)| a.mode() == AnchorMode::Perpendicular || b.mode() == AnchorMode::Perpendicular)
    }

    /// Topmost point within `radius` of `world`.
    pub fn point_at(&self, world: Vec2, radius: f32) -> Option<PointId> {
        self.points
            .iter()
            .rev()
            .find(|p| p.position.distance(world) <= radius)
            .map(|p| p.id)
    }

    // ── creation / removal ──────────────────────────────────────────────

    fn next_point_id(&mut self) -> PointId {
        let id = PointId(self.next_point);
        self.next_point += 1;
        id
    }

    fn next_pair_id(&mut self) -> PairId {
        let id = PairId(self.next_pair);
        self.next_pair += 1;
        id
    }

    fn random_color(&mut self) -> [u8; 3] {
        [
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(0..=255u8),
        ]
    }

    fn spawn(&mut self, position: Vec2, anchor: Anchor, pair: Option<PairId>) -> PointId {
        let id = self.next_point_id();
        let color = self.random_color();
        self.points.push(VanishingPoint {
            id,
            position,
            color,
            anchor,
            pair,
            curvature: self.config.default_curvature,
        });
        id
    }

    /// Adds a free point at the world position of the view center and selects it.
    pub fn add_free_point(&mut self, camera: &Camera, viewport: Viewport) -> PointId {
        let mut at = camera.view_center(viewport);
        if !at.is_finite() {
            at = self.horizon.center();
        }
        let id = self.spawn(at, Anchor::Free, None);
        self.selected = Some(id);
        log::debug!("added free point {id} at ({:.1}, {:.1})", at.x, at.y);
        id
    }

    /// Adds two horizon-anchored points either side of the horizon center.
    pub fn add_horizon_pair(&mut self, viewport_width: f32) -> (PointId, PointId) {
        let width = if viewport_width.is_finite() { viewport_width } else { 0.0 };
        let offset = width * self.config.horizon_pair_fraction;
        self.add_pair(Anchor::Horizon { offset: -offset }, Anchor::Horizon { offset })
    }

    /// Adds two perpendicular-anchored points above and below the horizon center.
    pub fn add_perpendicular_pair(&mut self) -> (PointId, PointId) {
        let offset = self.config.perpendicular_pair_offset;
        self.add_pair(Anchor::Perpendicular { offset: -offset }, Anchor::Perpendicular { offset })
    }

    fn add_pair(&mut self, first: Anchor, second: Anchor) -> (PointId, PointId) {
        let pair = self.next_pair_id();
        let center = self.horizon.center();
        let a = self.spawn(center, first, Some(pair));
        let b = self.spawn(center, second, Some(pair));
        self.recompute_constraints();
        self.selected = Some(a);
        log::debug!("added pair {} ({a}, {b})", pair.0);
        (a, b)
    }

    /// Removes the point, or both members of its pair. Unknown ids are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn remove_point(&mut self, id: PointId) -> bool {
        let Some(target) = self.point(id) else {
            return false;
        };
        let pair = target.pair;
        let before = self.points.len();
        match pair {
            Some(pair) => self.points.retain(|p| p.pair != Some(pair)),
            None => self.points.retain(|p| p.id != id),
        }
        if let Some(sel) = self.selected
            && self.point(sel).is_none()
        {
            self.selected = None;
        }
        log::debug!("removed {} point(s) starting at {id}", before - self.points.len());
        true
    }

    // ── selection ───────────────────────────────────────────────────────

    /// Toggles selection of `id`; selecting one point deselects any other.
    pub fn select_point(&mut self, id: PointId) -> Result<(), GridError> {
        if self.point(id).is_none() {
            return Err(GridError::UnknownPoint(id));
        }
        self.selected = if self.selected == Some(id) { None } else { Some(id) };
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// True when `id` should be drawn in its own color: nothing is selected,
    /// or `id` is the selection.
    pub fn is_emphasized(&self, id: PointId) -> bool {
        self.selected.is_none_or(|sel| sel == id)
    }

    /// Same rule for a pair's grid: either member being selected counts.
    pub fn is_pair_emphasized(&self, a: PointId, b: PointId) -> bool {
        self.selected.is_none_or(|sel| sel == a || sel == b)
    }

    // ── anchoring ───────────────────────────────────────────────────────

    /// Free points become horizon-anchored at their projection onto the
    /// horizon axis; anchored points become free where they stand.
    pub fn toggle_anchor(&mut self, id: PointId) -> Result<AnchorMode, GridError> {
        let horizon = self.horizon;
        let point = self
            .points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GridError::UnknownPoint(id))?;
        point.anchor = match point.anchor {
            Anchor::Free => Anchor::Horizon { offset: horizon.project_on_axis(point.position) },
            Anchor::Horizon { .. } | Anchor::Perpendicular { .. } => Anchor::Free,
        };
        let mode = point.anchor.mode();
        self.recompute_constraints();
        log::debug!("point {id} anchor -> {mode:?}");
        Ok(mode)
    }

    /// Places every anchored point on its axis. Idempotent for a fixed horizon.
    pub fn recompute_constraints(&mut self) {
        let horizon = self.horizon;
        for p in &mut self.points {
            if let Some(pos) = horizon.resolve(&p.anchor)
                && pos.is_finite()
            {
                p.position = pos;
            }
        }
    }

    pub fn set_rotation(&mut self, degrees: f32) -> Result<(), GridError> {
        if !degrees.is_finite() {
            return Err(GridError::NonFinite("rotation"));
        }
        self.horizon.rotation = degrees;
        self.recompute_constraints();
        Ok(())
    }

    pub fn set_horizon_level(&mut self, level: f32) -> Result<(), GridError> {
        if !level.is_finite() {
            return Err(GridError::NonFinite("horizon level"));
        }
        self.horizon.level = level;
        self.recompute_constraints();
        Ok(())
    }

    /// Moves a point toward `world`, respecting its anchor.
    ///
    /// Free points land exactly on `world`. Anchored points take the offset of
    /// `world` projected onto their axis; a perpendicular point also mirrors
    /// its perpendicular partner.
    pub fn drag_point_to(&mut self, id: PointId, world: Vec2) -> Result<(), GridError> {
        if !world.is_finite() {
            return Err(GridError::NonFinite("drag position"));
        }
        let horizon = self.horizon;
        let partner = self.partner(id).map(|p| p.id);
        let point = self
            .points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GridError::UnknownPoint(id))?;

        let current = point.anchor;
        match current {
            Anchor::Free => point.position = world,
            Anchor::Horizon { .. } => {
                point.anchor = Anchor::Horizon { offset: horizon.project_on_axis(world) };
            }
            Anchor::Perpendicular { .. } => {
                let offset = horizon.project_on_normal(world);
                point.anchor = Anchor::Perpendicular { offset };
                if let Some(partner) = partner
                    && let Some(other) = self.points.iter_mut().find(|p| p.id == partner)
                    && matches!(other.anchor, Anchor::Perpendicular { .. })
                {
                    other.anchor = Anchor::Perpendicular { offset: -offset };
                }
            }
        }
        self.recompute_constraints();
        Ok(())
    }

    pub fn set_curvature(&mut self, id: PointId, curvature: f32) -> Result<(), GridError> {
        if !curvature.is_finite() {
            return Err(GridError::NonFinite("curvature"));
        }
        let max = self.config.max_curvature;
        let point = self
            .points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GridError::UnknownPoint(id))?;
        point.curvature = curvature.clamp(0.0, max);
        Ok(())
    }

    // ── settings ────────────────────────────────────────────────────────

    pub fn set_line_count(&mut self, count: u32) {
        self.settings.line_count = count.clamp(1, self.config.max_line_count.max(1));
    }

    pub fn toggle_background(&mut self) -> bool {
        self.settings.show_background = !self.settings.show_background;
        self.settings.show_background
    }

    pub fn toggle_parallel_grid(&mut self) -> bool {
        self.settings.show_parallel_grid = !self.settings.show_parallel_grid;
        self.settings.show_parallel_grid
    }

    pub fn toggle_perpendicular_grid(&mut self) -> bool {
        self.settings.show_perpendicular_grid = !self.settings.show_perpendicular_grid;
        self.settings.show_perpendicular_grid
    }

    // ── frame ───────────────────────────────────────────────────────────

    /// Regenerates the frame for `ratio`, fitted into the current view.
    ///
    /// An invalid custom ratio leaves both the frame and the stored ratio as
    /// they were.
    pub fn set_aspect_ratio(
        &mut self,
        ratio: AspectRatio,
        camera: &Camera,
        viewport: Viewport,
    ) -> Result<(), GridError> {
        let value = ratio.ratio()?;
        self.settings.aspect_ratio = ratio;
        self.frame = match value {
            Some(r) if viewport.is_valid() => Some(FrameQuad::fitted(r, camera, viewport)),
            Some(_) => self.frame,
            None => None,
        };
        log::debug!("aspect ratio -> {}", ratio.label());
        Ok(())
    }

    pub fn translate_frame(&mut self, delta: Vec2) {
        if let Some(frame) = &mut self.frame
            && delta.is_finite()
        {
            frame.translate(delta);
        }
    }

    pub fn scale_frame_corner(&mut self, corner: usize, world: Vec2) {
        if let Some(frame) = &mut self.frame
            && world.is_finite()
        {
            frame.scale_corner_to(corner, world);
        }
    }

    // ── snapshot ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            points: self
                .points
                .iter()
                .map(|p| PointSnapshot {
                    id: p.id,
                    position: [p.position.x, p.position.y],
                    color: p.color,
                    anchor: p.anchor,
                    pair: p.pair,
                    curvature: p.curvature,
                })
                .collect(),
            horizon: self.horizon,
            frame: self.frame.map(|f| f.corners.map(|c| [c.x, c.y])),
            selected: self.selected,
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn config() -> GridConfig {
        GridConfig { color_seed: Some(7), ..GridConfig::default() }
    }

    fn model() -> GridModel {
        GridModel::new(config())
    }

    fn pos(m: &GridModel, id: PointId) -> Vec2 {
        m.point(id).map(|p| p.position).unwrap_or(Vec2::new(f32::NAN, f32::NAN))
    }

    fn assert_invariants(m: &GridModel) {
        for p in m.points() {
            assert_eq!(p.anchor.is_free(), p.offset().is_none());
            assert!(p.position.is_finite());
            if let Some(pair) = p.pair {
                assert_eq!(m.points().iter().filter(|q| q.pair == Some(pair)).count(), 2);
            }
        }
        if let Some(sel) = m.selected() {
            assert!(m.point(sel).is_some());
        }
    }

    // ── creation ────────────────────────────────────────────────────────

    #[test]
    fn fresh_view_has_one_selected_free_point_at_center() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::centered(&config(), viewport);
        let m = GridModel::for_view(config(), &camera, viewport);
        assert_eq!(m.points().len(), 1);
        let p = &m.points()[0];
        assert_eq!(p.anchor, Anchor::Free);
        assert!(approx(p.position, Vec2::new(0.0, 300.0)));
        assert_eq!(m.selected(), Some(p.id));
        assert_eq!(m.horizon().level, 300.0);
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut m = model();
        let a = m.add_free_point(&Camera::default(), Viewport::new(10.0, 10.0));
        m.remove_point(a);
        let b = m.add_free_point(&Camera::default(), Viewport::new(10.0, 10.0));
        assert!(b > a);
    }

    #[test]
    fn seeded_colors_are_deterministic() {
        let mut a = model();
        let mut b = model();
        a.add_perpendicular_pair();
        b.add_perpendicular_pair();
        assert_eq!(a.points()[0].color, b.points()[0].color);
        assert_eq!(a.points()[1].color, b.points()[1].color);
    }

    #[test]
    fn horizon_pair_scenario() {
        let mut m = model();
        m.set_horizon_level(100.0).unwrap();
        let (a, b) = m.add_horizon_pair(800.0);
        assert!(approx(pos(&m, a), Vec2::new(-200.0, 100.0)));
        assert!(approx(pos(&m, b), Vec2::new(200.0, 100.0)));
        assert_eq!(m.selected(), Some(a));

        m.set_rotation(90.0).unwrap();
        assert!(approx(pos(&m, a), Vec2::new(0.0, -100.0)));
        assert!(approx(pos(&m, b), Vec2::new(0.0, 300.0)));
        assert_invariants(&m);
    }

    #[test]
    fn perpendicular_pair_straddles_horizon() {
        let mut m = model();
        m.set_horizon_level(50.0).unwrap();
        let (a, b) = m.add_perpendicular_pair();
        assert!(approx(pos(&m, a), Vec2::new(0.0, 250.0)));
        assert!(approx(pos(&m, b), Vec2::new(0.0, -150.0)));
        assert!(m.has_perpendicular_pair());
        assert_eq!(m.pairs().len(), 1);
    }

    // ── constraints ─────────────────────────────────────────────────────

    #[test]
    fn horizon_anchor_follows_formula_and_is_idempotent() {
        let mut m = model();
        m.set_horizon_level(-30.0).unwrap();
        let (a, _) = m.add_horizon_pair(400.0);
        m.set_rotation(30.0).unwrap();

        let theta = 30f32.to_radians();
        let expected = Vec2::new(0.0, -30.0) + Vec2::new(theta.cos(), theta.sin()) * -100.0;
        assert!(approx(pos(&m, a), expected));

        let before: Vec<Vec2> = m.points().iter().map(|p| p.position).collect();
        m.recompute_constraints();
        m.recompute_constraints();
        let after: Vec<Vec2> = m.points().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn non_finite_horizon_changes_are_rejected() {
        let mut m = model();
        m.add_horizon_pair(800.0);
        let before = m.snapshot();
        assert_eq!(m.set_rotation(f32::NAN), Err(GridError::NonFinite("rotation")));
        assert!(m.set_horizon_level(f32::INFINITY).is_err());
        assert_eq!(m.snapshot(), before);
    }

    // ── dragging ────────────────────────────────────────────────────────

    #[test]
    fn free_drag_then_anchor_then_rotate() {
        let mut m = model();
        let id = m.add_free_point(&Camera::default(), Viewport::new(100.0, 100.0));
        m.drag_point_to(id, Vec2::new(50.0, 50.0)).unwrap();
        assert_eq!(pos(&m, id), Vec2::new(50.0, 50.0));

        assert_eq!(m.toggle_anchor(id), Ok(AnchorMode::Horizon));
        assert_eq!(m.point(id).and_then(|p| p.offset()), Some(50.0));
        assert!(approx(pos(&m, id), Vec2::new(50.0, 0.0)));

        m.set_rotation(45.0).unwrap();
        let d = 50.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(pos(&m, id), Vec2::new(d, d)));
        assert_invariants(&m);
    }

    #[test]
    fn toggling_back_to_free_keeps_position() {
        let mut m = model();
        let (a, _) = m.add_horizon_pair(800.0);
        let at = pos(&m, a);
        assert_eq!(m.toggle_anchor(a), Ok(AnchorMode::Free));
        assert_eq!(pos(&m, a), at);
        m.set_rotation(60.0).unwrap();
        assert_eq!(pos(&m, a), at);
        assert_invariants(&m);
    }

    #[test]
    fn horizon_drag_projects_onto_axis() {
        let mut m = model();
        let (a, _) = m.add_horizon_pair(800.0);
        m.drag_point_to(a, Vec2::new(-120.0, 55.0)).unwrap();
        assert!(approx(pos(&m, a), Vec2::new(-120.0, 0.0)));
    }

    #[test]
    fn perpendicular_drag_mirrors_partner() {
        let mut m = model();
        let (a, b) = m.add_perpendicular_pair();
        m.drag_point_to(a, Vec2::new(30.0, -80.0)).unwrap();
        assert_eq!(m.point(a).and_then(|p| p.offset()), Some(80.0));
        assert_eq!(m.point(b).and_then(|p| p.offset()), Some(-80.0));
        assert!(approx(pos(&m, a), Vec2::new(0.0, -80.0)));
        assert!(approx(pos(&m, b), Vec2::new(0.0, 80.0)));
    }

    #[test]
    fn non_finite_drag_is_ignored() {
        let mut m = model();
        let id = m.add_free_point(&Camera::default(), Viewport::new(100.0, 100.0));
        let at = pos(&m, id);
        assert!(m.drag_point_to(id, Vec2::new(f32::NAN, 0.0)).is_err());
        assert_eq!(pos(&m, id), at);
    }

    // ── removal / selection ─────────────────────────────────────────────

    #[test]
    fn removing_either_pair_member_removes_both() {
        for pick_second in [false, true] {
            let mut m = model();
            let (a, b) = m.add_horizon_pair(800.0);
            let keep = m.add_free_point(&Camera::default(), Viewport::new(10.0, 10.0));
            m.select_point(a).unwrap();
            assert!(m.remove_point(if pick_second { b } else { a }));
            assert_eq!(m.points().len(), 1);
            assert_eq!(m.points()[0].id, keep);
            assert!(m.points().iter().all(|p| p.pair.is_none()));
            assert_eq!(m.selected(), None);
            assert_invariants(&m);
        }
    }

    #[test]
    fn removing_unknown_id_is_a_noop() {
        let mut m = model();
        m.add_horizon_pair(800.0);
        let before = m.snapshot();
        assert!(!m.remove_point(PointId(999)));
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn selecting_b_after_a_leaves_only_b() {
        let mut m = model();
        let cam = Camera::default();
        let vp = Viewport::new(10.0, 10.0);
        let a = m.add_free_point(&cam, vp);
        let b = m.add_free_point(&cam, vp);
        m.clear_selection();
        m.select_point(a).unwrap();
        m.select_point(b).unwrap();
        assert_eq!(m.selected(), Some(b));
        m.select_point(b).unwrap();
        assert_eq!(m.selected(), None);
        assert_eq!(m.select_point(PointId(42)), Err(GridError::UnknownPoint(PointId(42))));
    }

    #[test]
    fn emphasis_follows_selection() {
        let mut m = model();
        let (a, b) = m.add_horizon_pair(800.0);
        let c = m.add_free_point(&Camera::default(), Viewport::new(10.0, 10.0));
        m.clear_selection();
        assert!(m.is_emphasized(c));

        m.select_point(a).unwrap();
        assert!(m.is_emphasized(a));
        assert!(!m.is_emphasized(b));
        assert!(!m.is_emphasized(c));
        assert!(m.is_pair_emphasized(a, b));
        assert!(m.is_pair_emphasized(b, a));
    }

    #[test]
    fn topmost_point_wins_hit_test() {
        let mut m = model();
        let cam = Camera::default();
        let vp = Viewport::new(10.0, 10.0);
        let _under = m.add_free_point(&cam, vp);
        let over = m.add_free_point(&cam, vp);
        assert_eq!(m.point_at(Vec2::new(5.0, 5.0), 1.0), Some(over));
        assert_eq!(m.point_at(Vec2::new(50.0, 5.0), 1.0), None);
    }

    // ── settings ────────────────────────────────────────────────────────

    #[test]
    fn curvature_and_line_count_are_clamped() {
        let mut m = model();
        let id = m.add_free_point(&Camera::default(), Viewport::new(10.0, 10.0));
        assert_eq!(m.point(id).map(|p| p.curvature), Some(0.5));
        m.set_curvature(id, 5.0).unwrap();
        assert_eq!(m.point(id).map(|p| p.curvature), Some(2.0));
        m.set_curvature(id, -1.0).unwrap();
        assert_eq!(m.point(id).map(|p| p.curvature), Some(0.0));

        assert_eq!(m.settings().line_count, 10);
        m.set_line_count(0);
        assert_eq!(m.settings().line_count, 1);
        m.set_line_count(1000);
        assert_eq!(m.settings().line_count, 100);
    }

    // ── frame ───────────────────────────────────────────────────────────

    #[test]
    fn aspect_ratio_creates_and_removes_frame() {
        let mut m = model();
        let cam = Camera::default();
        let vp = Viewport::new(800.0, 600.0);
        m.set_aspect_ratio(AspectRatio::Square, &cam, vp).unwrap();
        assert!(m.frame().is_some());
        m.set_aspect_ratio(AspectRatio::None, &cam, vp).unwrap();
        assert!(m.frame().is_none());
    }

    #[test]
    fn invalid_custom_ratio_keeps_previous_frame() {
        let mut m = model();
        let cam = Camera::default();
        let vp = Viewport::new(800.0, 600.0);
        m.set_aspect_ratio(AspectRatio::Photo, &cam, vp).unwrap();
        let before = m.frame().copied();
        let bad = AspectRatio::Custom { width: 0.0, height: 1.0 };
        assert!(m.set_aspect_ratio(bad, &cam, vp).is_err());
        assert_eq!(m.frame().copied(), before);
        assert_eq!(m.settings().aspect_ratio, AspectRatio::Photo);
    }

    #[test]
    fn frame_edits_go_through_model() {
        let mut m = model();
        let cam = Camera::default();
        m.set_aspect_ratio(AspectRatio::Square, &cam, Viewport::new(100.0, 100.0)).unwrap();
        m.translate_frame(Vec2::new(10.0, 0.0));
        let f = m.frame().copied();
        assert!(f.is_some_and(|f| approx(f.corners[0], Vec2::new(10.0, 0.0))));

        // Centroid (60, 50); corner 2 at (110, 100) pulled to (85, 75) halves the frame.
        m.scale_frame_corner(2, Vec2::new(85.0, 75.0));
        let f = m.frame().copied();
        assert!(f.is_some_and(|f| approx(f.corners[0], Vec2::new(35.0, 25.0))));
    }

    // ── snapshot ────────────────────────────────────────────────────────

    #[test]
    fn snapshot_serializes_to_json() {
        let mut m = model();
        m.add_perpendicular_pair();
        let snap = m.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"mode\":\"perpendicular\""));
        let back: GridSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
