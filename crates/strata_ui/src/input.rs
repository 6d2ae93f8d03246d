//! Input handling for UI.
//!
//! The host records cursor and button events into an [`InputState`]; once
//! per frame the [`InputRouter`] turns them into hover/active transitions
//! and click callbacks on the element tree.

use crate::layout;
use crate::tree::{ElementId, ElementTree};
use crate::widget::StateFlags;
use strata_core::{Rect, Vec2};

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Extra buttons, numbered from 0. Only 0 to 4 are tracked.
    Extra(u8),
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: u8 = 8;

    /// Returns the button for a slot in `0..COUNT`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Middle),
            3..=7 => Some(Self::Extra(index - 3)),
            _ => None,
        }
    }

    /// Returns the button's slot, or `None` for untracked extra buttons.
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Left => Some(0),
            Self::Right => Some(1),
            Self::Middle => Some(2),
            Self::Extra(n) if n < 5 => Some(n + 3),
            Self::Extra(_) => None,
        }
    }

    const fn mask(self) -> u8 {
        match self.index() {
            Some(i) => 1 << i,
            None => 0,
        }
    }
}

/// Input accumulated since the last router update.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    cursor: Vec2,
    /// Buttons pressed since the last update.
    buttons_pressed: u8,
    /// Buttons released since the last update.
    buttons_released: u8,
    /// Buttons currently held.
    buttons_down: u8,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-frame edges. Held buttons and the cursor persist.
    pub fn begin_frame(&mut self) {
        self.buttons_pressed = 0;
        self.buttons_released = 0;
    }

    /// Updates the cursor position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Current cursor position.
    #[must_use]
    pub const fn mouse_pos(&self) -> Vec2 {
        self.cursor
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        let mask = button.mask();
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = button.mask();
        self.buttons_released |= mask;
        self.buttons_down &= !mask;
    }

    /// Samples a button level. Only changes from the held state are
    /// recorded as edges.
    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        match (self.mouse_down(button), down) {
            (false, true) => self.mouse_button_down(button),
            (true, false) => self.mouse_button_up(button),
            _ => {}
        }
    }

    /// Returns true if the button went down since the last update.
    #[must_use]
    pub const fn mouse_pressed(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & button.mask()) != 0
    }

    /// Returns true if the button went up since the last update.
    #[must_use]
    pub const fn mouse_released(&self, button: MouseButton) -> bool {
        (self.buttons_released & button.mask()) != 0
    }

    /// Returns true if the button is held.
    #[must_use]
    pub const fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & button.mask()) != 0
    }
}

/// What changed during one router update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputResponse {
    /// Element under the cursor after the update.
    pub hovered: Option<ElementId>,
    /// The hovered element changed.
    pub hover_changed: bool,
    /// Element that became active.
    pub pressed: Option<ElementId>,
    /// Element whose click fired.
    pub clicked: Option<ElementId>,
}

/// Hover/active state machine.
///
/// At most one element is hovered and at most one is active. An element
/// becomes active when a button goes down over it, and fires its click when
/// the same button is released with the cursor still inside it.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    hovered: Option<ElementId>,
    active: Option<(ElementId, MouseButton)>,
}

impl InputRouter {
    /// Creates an idle router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Element under the cursor as of the last update.
    #[must_use]
    pub const fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Element currently pressed.
    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active.map(|(id, _)| id)
    }

    /// Applies the accumulated input to the tree.
    ///
    /// Hover is resolved first, from the cursor's final position; button
    /// edges are then handled in slot order.
    pub fn update(&mut self, tree: &mut ElementTree, input: &InputState) -> InputResponse {
        if self.hovered.is_some_and(|id| !tree.contains(id)) {
            self.hovered = None;
        }
        // Disabling ACTIVE clears the bit and ends the press, even if the
        // state is enabled again before this update.
        if self.active.is_some_and(|(id, _)| !tree.get(id).is_some_and(|node| node.is_active())) {
            self.active = None;
        }

        let mut response = InputResponse::default();
        let cursor = input.mouse_pos();

        let target = hit_test(tree, cursor);
        if target == self.hovered {
            // Re-asserted every update: the bit may have been cleared by a
            // change to the enabled states.
            if let Some(id) = target {
                tree.add_state(id, StateFlags::HOVERED);
            }
        } else {
            if let Some(old) = self.hovered {
                tree.remove_state(old, StateFlags::HOVERED);
            }
            if let Some(new) = target {
                tree.add_state(new, StateFlags::HOVERED);
            }
            tracing::trace!(from = ?self.hovered, to = ?target, "hover changed");
            self.hovered = target;
            response.hover_changed = true;
        }
        response.hovered = self.hovered;

        for button in (0..MouseButton::COUNT).filter_map(MouseButton::from_index) {
            let pressed = input.mouse_pressed(button);
            let released = input.mouse_released(button);
            if pressed && released && input.mouse_down(button) {
                // Released, then pressed again within one frame.
                self.release(tree, button, cursor, &mut response);
                self.press(tree, button, &mut response);
            } else {
                if pressed {
                    self.press(tree, button, &mut response);
                }
                if released {
                    self.release(tree, button, cursor, &mut response);
                }
            }
        }

        response
    }

    fn press(&mut self, tree: &mut ElementTree, button: MouseButton, response: &mut InputResponse) {
        if self.active.is_some() {
            return;
        }
        let Some(id) = self.hovered else {
            return;
        };
        if !tree.add_state(id, StateFlags::ACTIVE) {
            return;
        }

        self.active = Some((id, button));
        response.pressed = Some(id);
        tracing::trace!(?id, ?button, "element pressed");
        if let Some(widget) = tree.widget_dyn_mut(id) {
            widget.on_mouse_button_down(id, button);
        }
    }

    fn release(&mut self, tree: &mut ElementTree, button: MouseButton, cursor: Vec2, response: &mut InputResponse) {
        let Some((id, pressed_with)) = self.active else {
            return;
        };
        if pressed_with != button {
            return;
        }
        self.active = None;
        let still_active = tree.remove_state(id, StateFlags::ACTIVE);

        let inside = tree.is_attached(id) && tree.bounds(id).is_some_and(|bounds| bounds.contains(cursor));
        if !(still_active && inside) {
            tracing::trace!(?id, "press cancelled");
            return;
        }

        response.clicked = Some(id);
        tracing::trace!(?id, ?button, "element clicked");
        if let Some(widget) = tree.widget_dyn_mut(id) {
            widget.on_mouse_button_up(id, button);
        }
    }
}

/// Finds the element under `point`.
///
/// Children are tested before their parent and later siblings before
/// earlier ones, so the topmost drawn element wins. Only elements that
/// enable the hovered state can be hit; others let the cursor through.
#[must_use]
pub fn hit_test(tree: &ElementTree, point: Vec2) -> Option<ElementId> {
    let root = tree.root();
    let bounds = tree.bounds(root)?;
    hit_test_children(tree, root, bounds, point)
}

fn hit_test_children(tree: &ElementTree, parent: ElementId, parent_bounds: Rect, point: Vec2) -> Option<ElementId> {
    let mut child = tree.get(parent)?.last_child();
    while let Some(id) = child {
        let node = tree.get(id)?;
        let bounds = layout::resolve(Some(parent_bounds), node.position(), node.size());

        if let Some(hit) = hit_test_children(tree, id, bounds, point) {
            return Some(hit);
        }
        if node.enabled_states().has(StateFlags::HOVERED) && bounds.contains(point) {
            return Some(id);
        }
        child = node.prev_sibling();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementDesc;
    use crate::widget::Panel;
    use strata_core::Dim2;

    fn tree_with_root(w: f32, h: f32) -> ElementTree {
        let mut tree = ElementTree::new();
        let root = tree.root();
        if let Some(mut node) = tree.get_mut(root) {
            node.set_size(Dim2::px(w, h));
        }
        tree
    }

    fn attach(tree: &mut ElementTree, parent: ElementId, desc: ElementDesc) -> ElementId {
        let id = tree.create(desc, Panel::new());
        tree.add_child(parent, id).unwrap();
        id
    }

    fn clickable(pos: (f32, f32), size: (f32, f32)) -> ElementDesc {
        ElementDesc::default()
            .with_position(Dim2::px(pos.0, pos.1))
            .with_size(Dim2::px(size.0, size.1))
            .with_enabled_states(StateFlags::ALL)
    }

    #[test]
    fn test_button_masks() {
        assert_eq!(MouseButton::from_index(4), Some(MouseButton::Extra(1)));
        assert_eq!(MouseButton::Extra(4).index(), Some(7));
        assert_eq!(MouseButton::Extra(5).index(), None);
        assert_eq!(MouseButton::from_index(8), None);
    }

    #[test]
    fn test_mouse_edges() {
        let mut input = InputState::new();

        input.mouse_button_down(MouseButton::Left);
        assert!(input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.begin_frame();
        assert!(!input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.set_mouse_button(MouseButton::Left, true);
        assert!(!input.mouse_pressed(MouseButton::Left));
        input.set_mouse_button(MouseButton::Left, false);
        assert!(input.mouse_released(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));

        // Untracked buttons are ignored.
        input.mouse_button_down(MouseButton::Extra(9));
        assert!(!input.mouse_down(MouseButton::Extra(9)));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let back = attach(&mut tree, root, clickable((0.0, 0.0), (100.0, 100.0)));
        let front = attach(&mut tree, root, clickable((50.0, 50.0), (100.0, 100.0)));
        let inner = attach(&mut tree, back, clickable((10.0, 10.0), (20.0, 20.0)));

        assert_eq!(hit_test(&tree, Vec2::new(75.0, 75.0)), Some(front));
        assert_eq!(hit_test(&tree, Vec2::new(15.0, 15.0)), Some(inner));
        assert_eq!(hit_test(&tree, Vec2::new(40.0, 5.0)), Some(back));
        assert_eq!(hit_test(&tree, Vec2::new(500.0, 500.0)), None);
        // Edges are inclusive.
        assert_eq!(hit_test(&tree, Vec2::new(150.0, 150.0)), Some(front));
    }

    #[test]
    fn test_hit_test_skips_non_hoverable() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let below = attach(&mut tree, root, clickable((0.0, 0.0), (100.0, 100.0)));
        let overlay = ElementDesc::default().with_size(Dim2::px(100.0, 100.0)).with_enabled_states(StateFlags::NONE);
        attach(&mut tree, root, overlay);

        assert_eq!(hit_test(&tree, Vec2::new(50.0, 50.0)), Some(below));
    }

    #[test]
    fn test_press_release_inside_clicks() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((10.0, 10.0), (100.0, 50.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(20.0, 20.0);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.hovered, Some(id));
        assert!(r.hover_changed);
        assert!(tree.get(id).unwrap().is_hovered());

        input.mouse_button_down(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        input.begin_frame();
        assert_eq!(r.pressed, Some(id));
        assert_eq!(router.active(), Some(id));
        assert!(tree.get(id).unwrap().is_active());

        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.clicked, Some(id));
        assert_eq!(router.active(), None);
        assert!(!tree.get(id).unwrap().is_active());
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((10.0, 10.0), (100.0, 50.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(20.0, 20.0);
        input.mouse_button_down(MouseButton::Left);
        assert_eq!(router.update(&mut tree, &input).pressed, Some(id));
        input.begin_frame();

        input.set_mouse_pos(500.0, 500.0);
        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.clicked, None);
        assert_eq!(r.hovered, None);
        assert!(tree.get(id).unwrap().state().is_empty());
    }

    #[test]
    fn test_press_and_release_in_one_frame() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((0.0, 0.0), (10.0, 10.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.pressed, Some(id));
        assert_eq!(r.clicked, Some(id));
    }

    #[test]
    fn test_other_button_does_not_release() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((0.0, 0.0), (10.0, 10.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Right);
        router.update(&mut tree, &input);
        input.begin_frame();

        input.mouse_button_down(MouseButton::Left);
        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.clicked, None);
        assert_eq!(router.active(), Some(id));
    }

    #[test]
    fn test_hover_only_element_never_activates() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let desc = clickable((0.0, 0.0), (10.0, 10.0)).with_enabled_states(StateFlags::from_bits(StateFlags::HOVERED));
        attach(&mut tree, root, desc);
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert!(r.hovered.is_some());
        assert_eq!(r.pressed, None);
        assert_eq!(r.clicked, None);
    }

    #[test]
    fn test_hover_restored_after_reenable() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((0.0, 0.0), (100.0, 100.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(50.0, 50.0);
        router.update(&mut tree, &input);
        assert!(tree.get(id).unwrap().is_hovered());

        // Disabled and re-enabled between two updates, cursor never moves.
        tree.get_mut(id).unwrap().set_enabled_states(StateFlags::NONE);
        assert!(!tree.get(id).unwrap().is_hovered());
        tree.get_mut(id).unwrap().set_enabled_states(StateFlags::ALL);
        tree.clear_dirty();

        let r = router.update(&mut tree, &input);
        assert_eq!(r.hovered, Some(id));
        assert!(!r.hover_changed);
        assert!(tree.get(id).unwrap().is_hovered());
        assert!(tree.is_dirty());

        // Steady state stays clean.
        tree.clear_dirty();
        router.update(&mut tree, &input);
        assert!(!tree.is_dirty());
    }

    #[test]
    fn test_active_reenabled_mid_press_cancels() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((0.0, 0.0), (100.0, 100.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(50.0, 50.0);
        input.mouse_button_down(MouseButton::Left);
        assert_eq!(router.update(&mut tree, &input).pressed, Some(id));
        input.begin_frame();

        tree.get_mut(id).unwrap().set_enabled_states(StateFlags::NONE);
        tree.get_mut(id).unwrap().set_enabled_states(StateFlags::ALL);

        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.clicked, None);
        assert_eq!(router.active(), None);
        assert!(!tree.get(id).unwrap().is_active());
    }

    #[test]
    fn test_destroyed_element_is_forgotten() {
        let mut tree = tree_with_root(800.0, 600.0);
        let root = tree.root();
        let id = attach(&mut tree, root, clickable((0.0, 0.0), (10.0, 10.0)));
        let mut router = InputRouter::new();
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        router.update(&mut tree, &input);
        input.begin_frame();

        tree.destroy(id).unwrap();
        input.mouse_button_up(MouseButton::Left);
        let r = router.update(&mut tree, &input);
        assert_eq!(r.clicked, None);
        assert_eq!(router.hovered(), None);
        assert_eq!(router.active(), None);
    }
}
