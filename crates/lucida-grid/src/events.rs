//! Pointer events and their delivery.
//!
//! The host publishes [`PointerEvent`]s into an [`EventHub`]; each consumer
//! holds a [`Subscription`] with its own queue. Dropping the subscription
//! unsubscribes, so nothing keeps receiving events after its owner is gone.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use lucida_engine::coords::Vec2;
use lucida_engine::input::{InputEvent, Modifiers, MouseButton, MouseButtonState, TouchPhase};

/// Screen-space pointer input, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    ButtonDown { pos: Vec2, button: MouseButton, modifiers: Modifiers },
    Moved { pos: Vec2 },
    ButtonUp { pos: Vec2, button: MouseButton },
    /// Negative `delta_y` means the wheel rolled away from the user.
    Wheel { pos: Vec2, delta_y: f32 },
    /// Every active touch after the change, in contact order.
    TouchDown { touches: Vec<Vec2> },
    TouchMoved { touches: Vec<Vec2> },
    /// Touches still down after one lifted.
    TouchUp { touches: Vec<Vec2> },
    /// The window lost focus; any press or touch in progress is abandoned.
    Cancel,
}

#[derive(Debug, Default)]
struct Queues {
    next_id: u64,
    queues: BTreeMap<u64, VecDeque<PointerEvent>>,
}

/// Fan-out point for pointer events. Cheap to clone; clones share queues.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<Queues>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.queues.insert(id, VecDeque::new());
        Subscription { id, hub: Rc::downgrade(&self.inner) }
    }

    /// Queues `event` for every live subscription.
    pub fn publish(&self, event: PointerEvent) {
        let mut inner = self.inner.borrow_mut();
        for queue in inner.queues.values_mut() {
            queue.push_back(event.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().queues.len()
    }
}

/// A live registration with an [`EventHub`]. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<Queues>>,
}

impl Subscription {
    /// Takes every event queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<PointerEvent> {
        let Some(hub) = self.hub.upgrade() else {
            return Vec::new();
        };
        let mut inner = hub.borrow_mut();
        inner
            .queues
            .get_mut(&self.id)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().queues.remove(&self.id);
        }
    }
}

/// Turns engine input into pointer events, tracking the cursor and active
/// touches between calls.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    pointer: Vec2,
    touches: BTreeMap<u64, Vec2>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn translate(&mut self, event: &InputEvent) -> Option<PointerEvent> {
        match event {
            InputEvent::PointerMoved(e) => {
                self.pointer = Vec2::new(e.x, e.y);
                Some(PointerEvent::Moved { pos: self.pointer })
            }
            InputEvent::PointerButton(e) => {
                let pos = Vec2::new(e.x, e.y);
                self.pointer = pos;
                Some(match e.state {
                    MouseButtonState::Pressed => PointerEvent::ButtonDown {
                        pos,
                        button: e.button,
                        modifiers: e.modifiers,
                    },
                    MouseButtonState::Released => PointerEvent::ButtonUp { pos, button: e.button },
                })
            }
            InputEvent::MouseWheel { delta, .. } => {
                Some(PointerEvent::Wheel { pos: self.pointer, delta_y: -delta.y() })
            }
            InputEvent::Focused(false) => {
                self.touches.clear();
                Some(PointerEvent::Cancel)
            }
            InputEvent::Touch(t) => {
                let pos = Vec2::new(t.x, t.y);
                match t.phase {
                    TouchPhase::Started => {
                        self.touches.insert(t.id, pos);
                        Some(PointerEvent::TouchDown { touches: self.active() })
                    }
                    TouchPhase::Moved => {
                        // A move for a contact we never saw start is dropped.
                        let slot = self.touches.get_mut(&t.id)?;
                        *slot = pos;
                        Some(PointerEvent::TouchMoved { touches: self.active() })
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touches.remove(&t.id)?;
                        Some(PointerEvent::TouchUp { touches: self.active() })
                    }
                }
            }
            _ => None,
        }
    }

    fn active(&self) -> Vec<Vec2> {
        self.touches.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucida_engine::input::{MouseWheelDelta, PointerButtonEvent, PointerMoveEvent, TouchEvent};

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Moved { pos: Vec2::new(x, y) }
    }

    // ── hub ─────────────────────────────────────────────────────────────

    #[test]
    fn every_subscription_gets_its_own_copy() {
        let hub = EventHub::new();
        let a = hub.subscribe();
        let b = hub.subscribe();
        hub.publish(moved(1.0, 2.0));
        hub.publish(moved(3.0, 4.0));

        assert_eq!(a.drain(), vec![moved(1.0, 2.0), moved(3.0, 4.0)]);
        assert!(a.drain().is_empty());
        assert_eq!(b.drain().len(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = EventHub::new();
        let a = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(a);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(moved(0.0, 0.0));
    }

    #[test]
    fn events_before_subscribing_are_not_seen() {
        let hub = EventHub::new();
        hub.publish(moved(0.0, 0.0));
        let a = hub.subscribe();
        assert!(a.drain().is_empty());
    }

    #[test]
    fn subscription_outliving_hub_is_inert() {
        let hub = EventHub::new();
        let a = hub.subscribe();
        drop(hub);
        assert!(a.drain().is_empty());
    }

    // ── translation ─────────────────────────────────────────────────────

    #[test]
    fn wheel_uses_last_pointer_position() {
        let mut t = PointerTranslator::new();
        t.translate(&InputEvent::PointerMoved(PointerMoveEvent { x: 30.0, y: 40.0 }));
        let ev = t.translate(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: -1.0 },
            modifiers: Modifiers::default(),
        });
        assert_eq!(ev, Some(PointerEvent::Wheel { pos: Vec2::new(30.0, 40.0), delta_y: 1.0 }));
    }

    #[test]
    fn focus_loss_drops_touches_and_cancels() {
        let mut t = PointerTranslator::new();
        t.translate(&InputEvent::Touch(TouchEvent { id: 1, phase: TouchPhase::Started, x: 0.0, y: 0.0 }));
        assert_eq!(t.translate(&InputEvent::Focused(false)), Some(PointerEvent::Cancel));
        assert_eq!(
            t.translate(&InputEvent::Touch(TouchEvent { id: 1, phase: TouchPhase::Moved, x: 5.0, y: 0.0 })),
            None
        );
    }

    #[test]
    fn buttons_map_to_down_and_up() {
        let mut t = PointerTranslator::new();
        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 5.0,
            y: 6.0,
            modifiers: Modifiers::default(),
        });
        assert!(matches!(t.translate(&press), Some(PointerEvent::ButtonDown { button: MouseButton::Left, .. })));
        assert_eq!(t.pointer(), Vec2::new(5.0, 6.0));
        assert_eq!(t.translate(&InputEvent::Focused(true)), None);
    }

    #[test]
    fn touches_are_tracked_across_phases() {
        let mut t = PointerTranslator::new();
        let touch = |id, phase, x| InputEvent::Touch(TouchEvent { id, phase, x, y: 0.0 });

        assert_eq!(
            t.translate(&touch(1, TouchPhase::Started, 10.0)),
            Some(PointerEvent::TouchDown { touches: vec![Vec2::new(10.0, 0.0)] })
        );
        t.translate(&touch(2, TouchPhase::Started, 50.0));
        assert_eq!(
            t.translate(&touch(2, TouchPhase::Moved, 60.0)),
            Some(PointerEvent::TouchMoved { touches: vec![Vec2::new(10.0, 0.0), Vec2::new(60.0, 0.0)] })
        );
        assert_eq!(
            t.translate(&touch(1, TouchPhase::Cancelled, 0.0)),
            Some(PointerEvent::TouchUp { touches: vec![Vec2::new(60.0, 0.0)] })
        );
        assert_eq!(t.translate(&touch(9, TouchPhase::Moved, 0.0)), None);
    }
}
