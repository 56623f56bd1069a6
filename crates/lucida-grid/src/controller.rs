//! Interaction controller: the gesture state machine.
//!
//! Screen-space pointer events come in; camera changes and model edits come
//! out. Exactly one [`Gesture`] is active at a time, established on press and
//! cleared unconditionally on release.

use lucida_engine::coords::Vec2;
use lucida_engine::input::MouseButton;

use crate::camera::{Camera, PointerKind};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::events::{EventHub, PointerEvent, Subscription};
use crate::model::{GridModel, PointId};

/// The active gesture, with the context needed to apply the next move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging the view; `last` is the previous screen position.
    PanningView { last: Vec2 },
    DraggingPoint { id: PointId },
    /// `last` is the previous world position of the pointer.
    DraggingFrameBody { last: Vec2 },
    DraggingFrameCorner { corner: usize },
    /// Two-finger zoom; distance and center are from the previous event.
    PinchZooming { distance: f32, center: Vec2 },
}

pub struct Controller {
    config: GridConfig,
    camera: Camera,
    gesture: Gesture,
    subscription: Option<Subscription>,
}

impl Controller {
    pub fn new(config: GridConfig, camera: Camera) -> Self {
        Self { config, camera, gesture: Gesture::Idle, subscription: None }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Starts receiving events from `hub`, replacing any earlier subscription.
    pub fn attach(&mut self, hub: &EventHub) {
        self.subscription = Some(hub.subscribe());
    }

    /// Stops receiving events and abandons any gesture in progress.
    pub fn detach(&mut self) {
        self.subscription = None;
        self.gesture = Gesture::Idle;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Applies every event queued since the last call. Returns how many there were.
    pub fn pump(&mut self, model: &mut GridModel) -> usize {
        let events = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return 0,
        };
        for event in &events {
            self.handle(model, event);
        }
        events.len()
    }

    pub fn handle(&mut self, model: &mut GridModel, event: &PointerEvent) {
        match event {
            PointerEvent::ButtonDown { pos, button: MouseButton::Middle, .. } => {
                self.gesture = Gesture::PanningView { last: *pos };
            }
            PointerEvent::ButtonDown { pos, button: MouseButton::Left, .. } => {
                self.press(model, *pos, PointerKind::Mouse);
            }
            PointerEvent::ButtonDown { .. } => {}
            PointerEvent::Moved { pos } => self.drag(model, *pos),
            PointerEvent::ButtonUp { .. } | PointerEvent::TouchUp { .. } | PointerEvent::Cancel => {
                self.gesture = Gesture::Idle;
            }
            PointerEvent::Wheel { pos, delta_y } => {
                let step = self.config.wheel_zoom_step;
                let factor = if *delta_y < 0.0 { step } else { 1.0 / step };
                self.camera.zoom_about(*pos, factor);
            }
            PointerEvent::TouchDown { touches } => match touches.as_slice() {
                [a, b, ..] => {
                    self.gesture = Gesture::PinchZooming { distance: a.distance(*b), center: a.lerp(*b, 0.5) };
                }
                [only] => {
                    if !self.press(model, *only, PointerKind::Touch) {
                        self.gesture = Gesture::PanningView { last: *only };
                    }
                }
                [] => self.gesture = Gesture::Idle,
            },
            PointerEvent::TouchMoved { touches } => match touches.as_slice() {
                [a, b, ..] => self.pinch(*a, *b),
                [only] => self.drag(model, *only),
                [] => {}
            },
        }
    }

    /// Hit-tests in order frame corners, frame body, points (topmost first).
    /// Returns whether anything was hit.
    fn press(&mut self, model: &mut GridModel, pos: Vec2, kind: PointerKind) -> bool {
        let world = self.camera.screen_to_world(pos);
        let radius = self.camera.hit_radius(kind, &self.config);

        if let Some(frame) = model.frame() {
            if let Some(corner) = frame.corner_at(world, radius) {
                self.gesture = Gesture::DraggingFrameCorner { corner };
                return true;
            }
            if frame.contains(world) {
                self.gesture = Gesture::DraggingFrameBody { last: world };
                return true;
            }
        }

        if let Some(id) = model.point_at(world, radius) {
            if let Err(err) = model.select_point(id) {
                log::warn!("select failed: {err}");
            }
            self.gesture = Gesture::DraggingPoint { id };
            return true;
        }

        self.gesture = Gesture::Idle;
        false
    }

    fn drag(&mut self, model: &mut GridModel, pos: Vec2) {
        let world = self.camera.screen_to_world(pos);
        match self.gesture {
            Gesture::Idle | Gesture::PinchZooming { .. } => {}
            Gesture::PanningView { last } => {
                self.camera.pan_by(pos - last);
                self.gesture = Gesture::PanningView { last: pos };
            }
            Gesture::DraggingPoint { id } => match model.drag_point_to(id, world) {
                Ok(()) => {}
                Err(GridError::UnknownPoint(_)) => self.gesture = Gesture::Idle,
                Err(err) => log::debug!("drag ignored: {err}"),
            },
            Gesture::DraggingFrameBody { last } => {
                model.translate_frame(world - last);
                self.gesture = Gesture::DraggingFrameBody { last: world };
            }
            Gesture::DraggingFrameCorner { corner } => model.scale_frame_corner(corner, world),
        }
    }

    fn pinch(&mut self, a: Vec2, b: Vec2) {
        let distance = a.distance(b);
        let center = a.lerp(b, 0.5);
        if let Gesture::PinchZooming { distance: prev, center: prev_center } = self.gesture {
            self.camera.pan_by(center - prev_center);
            if prev > 0.0 {
                self.camera.zoom_about(center, distance / prev);
            }
        }
        // A second finger landing mid-drag turns the gesture into a pinch.
        self.gesture = Gesture::PinchZooming { distance, center };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnchorMode, AspectRatio};
    use lucida_engine::coords::Viewport;
    use lucida_engine::input::{InputEvent, Modifiers, MouseWheelDelta};
    use crate::events::PointerTranslator;

    const EPS: f32 = 1e-3;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn setup() -> (Controller, GridModel, Viewport) {
        let viewport = Viewport::new(800.0, 600.0);
        let config = GridConfig { color_seed: Some(3), ..GridConfig::default() };
        let model = GridModel::new(config.clone());
        (Controller::new(config, Camera::default()), model, viewport)
    }

    fn down(x: f32, y: f32, button: MouseButton) -> PointerEvent {
        PointerEvent::ButtonDown { pos: Vec2::new(x, y), button, modifiers: Modifiers::default() }
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Moved { pos: Vec2::new(x, y) }
    }

    fn up(x: f32, y: f32) -> PointerEvent {
        PointerEvent::ButtonUp { pos: Vec2::new(x, y), button: MouseButton::Left }
    }

    // ── view ────────────────────────────────────────────────────────────

    #[test]
    fn wheel_zooms_about_cursor() {
        let (mut c, mut m, _) = setup();
        let cursor = Vec2::new(300.0, 200.0);
        let before = c.camera().screen_to_world(cursor);

        c.handle(&mut m, &PointerEvent::Wheel { pos: cursor, delta_y: -1.0 });
        assert!((c.camera().scale() - 1.1).abs() < EPS);
        assert!(approx(c.camera().screen_to_world(cursor), before));

        c.handle(&mut m, &PointerEvent::Wheel { pos: cursor, delta_y: 3.0 });
        assert!((c.camera().scale() - 1.0).abs() < EPS);
    }

    #[test]
    fn wheel_rolled_away_from_user_zooms_in() {
        let (mut c, mut m, _) = setup();
        let mut t = PointerTranslator::new();
        let away = InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        };
        let ev = t.translate(&away).expect("wheel event");
        c.handle(&mut m, &ev);
        assert!(c.camera().scale() > 1.0);
    }

    #[test]
    fn focus_loss_ends_drag() {
        let (mut c, mut m, _) = setup();
        let mut t = PointerTranslator::new();
        c.handle(&mut m, &down(10.0, 10.0, MouseButton::Middle));
        assert!(matches!(c.gesture(), Gesture::PanningView { .. }));

        let ev = t.translate(&InputEvent::Focused(false)).expect("cancel event");
        c.handle(&mut m, &ev);
        assert_eq!(c.gesture(), Gesture::Idle);
        c.handle(&mut m, &moved(50.0, 50.0));
        assert!(approx(c.camera().pan, Vec2::zero()));
    }

    #[test]
    fn middle_button_pans_by_screen_delta() {
        let (mut c, mut m, _) = setup();
        c.handle(&mut m, &down(10.0, 10.0, MouseButton::Middle));
        c.handle(&mut m, &moved(25.0, 5.0));
        c.handle(&mut m, &moved(30.0, 0.0));
        assert!(approx(c.camera().pan, Vec2::new(20.0, -10.0)));
        c.handle(&mut m, &up(30.0, 0.0));
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    fn left_press_on_empty_space_does_nothing() {
        let (mut c, mut m, _) = setup();
        c.handle(&mut m, &down(10.0, 10.0, MouseButton::Left));
        c.handle(&mut m, &moved(50.0, 50.0));
        assert_eq!(c.gesture(), Gesture::Idle);
        assert_eq!(c.camera().pan, Vec2::zero());
    }

    // ── points ──────────────────────────────────────────────────────────

    #[test]
    fn dragging_a_free_point_follows_cursor_in_world_space() {
        let (mut c, mut m, vp) = setup();
        c.camera_mut().set_scale(2.0);
        let id = m.add_free_point(c.camera(), vp);
        m.clear_selection();
        let at = c.camera().world_to_screen(m.point(id).map(|p| p.position).unwrap_or_default());

        c.handle(&mut m, &down(at.x + 3.0, at.y, MouseButton::Left));
        assert_eq!(c.gesture(), Gesture::DraggingPoint { id });
        assert_eq!(m.selected(), Some(id));

        c.handle(&mut m, &moved(100.0, 60.0));
        assert_eq!(m.point(id).map(|p| p.position), Some(Vec2::new(50.0, 30.0)));
        c.handle(&mut m, &up(100.0, 60.0));
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    fn pressing_selected_point_deselects_it() {
        let (mut c, mut m, vp) = setup();
        let id = m.add_free_point(c.camera(), vp);
        assert_eq!(m.selected(), Some(id));
        let at = vp.center();
        c.handle(&mut m, &down(at.x, at.y, MouseButton::Left));
        assert_eq!(m.selected(), None);
        assert_eq!(c.gesture(), Gesture::DraggingPoint { id });
    }

    #[test]
    fn dragging_anchored_point_stays_on_horizon() {
        let (mut c, mut m, vp) = setup();
        c.camera_mut().pan = Vec2::new(400.0, 300.0);
        let (a, _) = m.add_horizon_pair(vp.width);
        let at = c.camera().world_to_screen(Vec2::new(-200.0, 0.0));
        c.handle(&mut m, &down(at.x, at.y, MouseButton::Left));
        c.handle(&mut m, &moved(at.x - 50.0, at.y + 80.0));
        let p = m.point(a).map(|p| p.position).unwrap_or_default();
        assert!(approx(p, Vec2::new(-250.0, 0.0)));
        assert_eq!(m.point(a).map(|p| p.mode()), Some(AnchorMode::Horizon));
    }

    #[test]
    fn touch_uses_larger_hit_radius() {
        let (mut c, mut m, vp) = setup();
        let id = m.add_free_point(c.camera(), vp);
        let center = vp.center();
        let near = Vec2::new(center.x + 15.0, center.y);

        c.handle(&mut m, &down(near.x, near.y, MouseButton::Left));
        assert_eq!(c.gesture(), Gesture::Idle);

        c.handle(&mut m, &PointerEvent::TouchDown { touches: vec![near] });
        assert_eq!(c.gesture(), Gesture::DraggingPoint { id });
    }

    #[test]
    fn single_touch_on_empty_space_pans() {
        let (mut c, mut m, _) = setup();
        c.handle(&mut m, &PointerEvent::TouchDown { touches: vec![Vec2::new(5.0, 5.0)] });
        c.handle(&mut m, &PointerEvent::TouchMoved { touches: vec![Vec2::new(15.0, 0.0)] });
        assert!(approx(c.camera().pan, Vec2::new(10.0, -5.0)));
        c.handle(&mut m, &PointerEvent::TouchUp { touches: vec![] });
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    // ── pinch ───────────────────────────────────────────────────────────

    #[test]
    fn pinch_scales_by_distance_ratio() {
        let (mut c, mut m, _) = setup();
        let a = Vec2::new(100.0, 100.0);
        c.handle(&mut m, &PointerEvent::TouchDown { touches: vec![a, Vec2::new(200.0, 100.0)] });
        let anchor = Vec2::new(150.0, 100.0);
        let before = c.camera().screen_to_world(anchor);

        c.handle(&mut m, &PointerEvent::TouchMoved { touches: vec![Vec2::new(50.0, 100.0), Vec2::new(250.0, 100.0)] });
        assert!((c.camera().scale() - 2.0).abs() < EPS);
        assert!(approx(c.camera().screen_to_world(anchor), before));
    }

    #[test]
    fn pinch_from_zero_distance_is_ignored() {
        let (mut c, mut m, _) = setup();
        let p = Vec2::new(100.0, 100.0);
        c.handle(&mut m, &PointerEvent::TouchDown { touches: vec![p, p] });
        c.handle(&mut m, &PointerEvent::TouchMoved { touches: vec![p, Vec2::new(200.0, 100.0)] });
        assert_eq!(c.camera().scale(), 1.0);
        assert!(c.camera().pan.is_finite());
    }

    // ── frame ───────────────────────────────────────────────────────────

    #[test]
    fn frame_is_hit_before_points() {
        let (mut c, mut m, vp) = setup();
        m.add_free_point(c.camera(), vp);
        m.set_aspect_ratio(AspectRatio::Square, c.camera(), vp).unwrap();

        c.handle(&mut m, &down(400.0, 300.0, MouseButton::Left));
        assert!(matches!(c.gesture(), Gesture::DraggingFrameBody { .. }));
        c.handle(&mut m, &moved(410.0, 320.0));
        let f = m.frame().copied();
        assert!(f.is_some_and(|f| approx(f.corners[0], Vec2::new(110.0, 20.0))));
    }

    #[test]
    fn frame_corner_drag_scales_about_centroid() {
        let (mut c, mut m, vp) = setup();
        m.set_aspect_ratio(AspectRatio::Square, c.camera(), vp).unwrap();
        // Corner 2 sits at (700, 600); centroid at (400, 300).
        c.handle(&mut m, &down(698.0, 598.0, MouseButton::Left));
        assert_eq!(c.gesture(), Gesture::DraggingFrameCorner { corner: 2 });
        c.handle(&mut m, &moved(550.0, 450.0));
        let f = m.frame().copied();
        assert!(f.is_some_and(|f| approx(f.corners[0], Vec2::new(250.0, 150.0))));
    }

    // ── subscription ────────────────────────────────────────────────────

    #[test]
    fn pump_drains_only_while_attached() {
        let (mut c, mut m, _) = setup();
        let hub = EventHub::new();
        hub.publish(PointerEvent::Wheel { pos: Vec2::zero(), delta_y: -1.0 });
        assert_eq!(c.pump(&mut m), 0);

        c.attach(&hub);
        hub.publish(PointerEvent::Wheel { pos: Vec2::zero(), delta_y: -1.0 });
        hub.publish(down(0.0, 0.0, MouseButton::Middle));
        assert_eq!(c.pump(&mut m), 2);
        assert!((c.camera().scale() - 1.1).abs() < EPS);
        assert!(matches!(c.gesture(), Gesture::PanningView { .. }));

        c.detach();
        assert_eq!(c.gesture(), Gesture::Idle);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(PointerEvent::Wheel { pos: Vec2::zero(), delta_y: -1.0 });
        assert_eq!(c.pump(&mut m), 0);
    }
}
