use crate::coords::{Rect, Transform};

use super::{DrawCmd, SortKey, ZIndex};

/// A single draw item: sort key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Scissor rect in logical pixels. `None` = no clipping (draw everywhere).
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
///
/// # Transforms
///
/// Shape helpers (`push_line`, `push_circle`, ...) map their geometry through the
/// current transform before recording, so callers can emit world-space content
/// between [`push_transform`](Self::push_transform) and
/// [`pop_transform`](Self::pop_transform). Stroke widths and radii scale too.
///
/// # Clipping
///
/// Clip rects are always logical pixels and are not affected by transforms.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Top is the effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
    /// Top is the effective transform, already composed with all parents.
    transform_stack: Vec<Transform>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears items and both stacks. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
        self.transform_stack.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes an already-transformed draw command with the given z-index.
    ///
    /// The item inherits the current clip rect from the clip stack.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });

        self.sorted_dirty = true;
    }

    /// The transform applied by shape helpers.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform_stack.last().copied().unwrap_or(Transform::IDENTITY)
    }

    /// Begins a transformed region, composed with the current transform.
    ///
    /// Calls must be balanced with [`pop_transform`](Self::pop_transform).
    #[inline]
    pub fn push_transform(&mut self, t: Transform) {
        let effective = self.transform().compose(t);
        self.transform_stack.push(effective);
    }

    #[inline]
    pub fn pop_transform(&mut self) {
        debug_assert!(!self.transform_stack.is_empty(), "pop_transform called without matching push_transform");
        self.transform_stack.pop();
    }

    /// Begins a scissor region intersected with any parent clip rect.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap yields a zero-area rect so renderers skip the items.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Iterates items in paint order (back-to-front) without cloning commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{Color, Stroke};

    fn line_from(cmd: &DrawCmd) -> Vec2 {
        match cmd {
            DrawCmd::Line(l) => l.from,
            other => panic!("expected line, got {other:?}"),
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut list = DrawList::new();
        let s = Stroke::new(1.0, Color::WHITE);
        list.push_line(ZIndex(5), Vec2::new(1.0, 0.0), Vec2::zero(), s);
        list.push_line(ZIndex(0), Vec2::new(2.0, 0.0), Vec2::zero(), s);
        list.push_line(ZIndex(5), Vec2::new(3.0, 0.0), Vec2::zero(), s);

        let xs: Vec<f32> = list.iter_in_paint_order().map(|i| line_from(&i.cmd).x).collect();
        assert_eq!(xs, vec![2.0, 1.0, 3.0]);
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn helpers_apply_the_active_transform() {
        let mut list = DrawList::new();
        list.push_transform(Transform::new(2.0, Vec2::new(10.0, 20.0)));
        list.push_line(ZIndex(0), Vec2::new(1.0, 1.0), Vec2::zero(), Stroke::new(0.5, Color::WHITE));
        list.pop_transform();

        match &list.items()[0].cmd {
            DrawCmd::Line(l) => {
                assert_eq!(l.from, Vec2::new(12.0, 22.0));
                assert_eq!(l.to, Vec2::new(10.0, 20.0));
                assert_eq!(l.stroke.width, 1.0);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn nested_transforms_compose() {
        let mut list = DrawList::new();
        list.push_transform(Transform::new(2.0, Vec2::zero()));
        list.push_transform(Transform::new(1.0, Vec2::new(5.0, 0.0)));
        assert_eq!(list.transform().apply(Vec2::zero()), Vec2::new(10.0, 0.0));
        list.pop_transform();
        list.pop_transform();
        assert_eq!(list.transform(), Transform::IDENTITY);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn clip_rects_intersect_and_are_not_transformed() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_transform(Transform::new(3.0, Vec2::zero()));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        list.push_line(ZIndex(0), Vec2::zero(), Vec2::zero(), Stroke::new(1.0, Color::WHITE));
        list.pop_clip();
        list.pop_transform();
        list.pop_clip();

        assert_eq!(list.items()[0].clip_rect, Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
    }

    #[test]
    fn clear_resets_items_and_stacks() {
        let mut list = DrawList::new();
        list.push_transform(Transform::new(4.0, Vec2::zero()));
        list.push_line(ZIndex(0), Vec2::zero(), Vec2::zero(), Stroke::new(1.0, Color::WHITE));
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.transform(), Transform::IDENTITY);
    }
}
