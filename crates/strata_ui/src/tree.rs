//! # Element Tree
//!
//! Elements live in an arena of generational slots. Links between them
//! (parent, first/last child, prev/next sibling) are stored as ids, so the
//! tree can be edited in O(1) without shared ownership.
//!
//! Every context owns one tree with a permanent root element. Elements
//! created through [`ElementTree::create`] start orphaned; only elements
//! reachable from the root are laid out, rendered and hit-tested.
//!
//! All mutations that can change the rendered output set the tree's dirty
//! flag. The context clears it after rebuilding the draw data.

use crate::error::{UiError, UiResult};
use crate::layout;
use crate::widget::{Panel, StateFlags, Widget};
use std::fmt;
use std::ops::Deref;
use strata_core::{Color, Dim2, Rect, Vec2};

/// Unique identifier for an element.
///
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation, bumped every time the slot is freed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Null/invalid element id. Never returned by a tree.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates an id from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this is the null id.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Initial properties of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementDesc {
    /// Position relative to the parent.
    pub position: Dim2,
    /// Size relative to the parent.
    pub size: Dim2,
    /// Base color.
    pub color: Color,
    /// Color while hovered. Falls back to `color`.
    pub hovered_color: Option<Color>,
    /// Color while active. Falls back to `color`.
    pub active_color: Option<Color>,
    /// States the element may enter. `None` uses the widget's default.
    pub enabled_states: Option<StateFlags>,
}

impl Default for ElementDesc {
    fn default() -> Self {
        Self {
            position: Dim2::ZERO,
            size: Dim2::ZERO,
            color: Color::WHITE,
            hovered_color: None,
            active_color: None,
            enabled_states: None,
        }
    }
}

impl ElementDesc {
    /// Sets the position.
    #[must_use]
    pub const fn with_position(mut self, position: Dim2) -> Self {
        self.position = position;
        self
    }

    /// Sets the size.
    #[must_use]
    pub const fn with_size(mut self, size: Dim2) -> Self {
        self.size = size;
        self
    }

    /// Sets the base color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the hovered color.
    #[must_use]
    pub const fn with_hovered_color(mut self, color: Color) -> Self {
        self.hovered_color = Some(color);
        self
    }

    /// Sets the active color.
    #[must_use]
    pub const fn with_active_color(mut self, color: Color) -> Self {
        self.active_color = Some(color);
        self
    }

    /// Overrides the widget's enabled states.
    #[must_use]
    pub const fn with_enabled_states(mut self, states: StateFlags) -> Self {
        self.enabled_states = Some(states);
        self
    }
}

/// A live element.
pub struct ElementNode {
    parent: Option<ElementId>,
    first_child: Option<ElementId>,
    last_child: Option<ElementId>,
    prev_sibling: Option<ElementId>,
    next_sibling: Option<ElementId>,

    position: Dim2,
    size: Dim2,
    color: Color,
    hovered_color: Option<Color>,
    active_color: Option<Color>,
    enabled_states: StateFlags,
    state: StateFlags,

    widget: Box<dyn Widget>,
}

impl ElementNode {
    fn new(desc: ElementDesc, widget: Box<dyn Widget>) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            position: desc.position,
            size: desc.size,
            color: desc.color,
            hovered_color: desc.hovered_color,
            active_color: desc.active_color,
            enabled_states: desc.enabled_states.unwrap_or_else(|| widget.enabled_states()),
            state: StateFlags::NONE,
            widget,
        }
    }

    /// Parent element, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// First child in sibling order.
    #[must_use]
    pub const fn first_child(&self) -> Option<ElementId> {
        self.first_child
    }

    /// Last child in sibling order.
    #[must_use]
    pub const fn last_child(&self) -> Option<ElementId> {
        self.last_child
    }

    /// Previous sibling.
    #[must_use]
    pub const fn prev_sibling(&self) -> Option<ElementId> {
        self.prev_sibling
    }

    /// Next sibling.
    #[must_use]
    pub const fn next_sibling(&self) -> Option<ElementId> {
        self.next_sibling
    }

    /// Position relative to the parent.
    #[must_use]
    pub const fn position(&self) -> Dim2 {
        self.position
    }

    /// Size relative to the parent.
    #[must_use]
    pub const fn size(&self) -> Dim2 {
        self.size
    }

    /// Base color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Hovered color, if set.
    #[must_use]
    pub const fn hovered_color(&self) -> Option<Color> {
        self.hovered_color
    }

    /// Active color, if set.
    #[must_use]
    pub const fn active_color(&self) -> Option<Color> {
        self.active_color
    }

    /// States the element may enter.
    #[must_use]
    pub const fn enabled_states(&self) -> StateFlags {
        self.enabled_states
    }

    /// Current state bits. Always a subset of [`Self::enabled_states`].
    #[must_use]
    pub const fn state(&self) -> StateFlags {
        self.state
    }

    /// Returns true while the cursor is over the element.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.state.has(StateFlags::HOVERED)
    }

    /// Returns true while the element is pressed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.has(StateFlags::ACTIVE)
    }

    /// Color to draw with: active beats hovered beats base.
    #[must_use]
    pub fn render_color(&self) -> Color {
        if self.is_active() {
            if let Some(color) = self.active_color {
                return color;
            }
        }
        if self.is_hovered() {
            if let Some(color) = self.hovered_color {
                return color;
            }
        }
        self.color
    }

    /// The element's widget.
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        &*self.widget
    }

    /// The element's widget as a concrete type.
    #[must_use]
    pub fn widget_as<T: Widget>(&self) -> Option<&T> {
        self.widget.as_any().downcast_ref()
    }
}

impl fmt::Debug for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementNode")
            .field("kind", &self.widget.kind())
            .field("parent", &self.parent)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Mutable access to one element.
///
/// Every setter marks the owning tree dirty. Setters chain:
///
/// ```
/// # use strata_ui::{ElementDesc, ElementTree, Panel};
/// # use strata_core::{Color, Dim2};
/// let mut tree = ElementTree::new();
/// let id = tree.create(ElementDesc::default(), Panel::new());
/// if let Some(mut element) = tree.get_mut(id) {
///     element.set_position(Dim2::px(10.0, 10.0)).set_color(Color::BLACK);
/// }
/// ```
pub struct ElementMut<'a> {
    node: &'a mut ElementNode,
    dirty: &'a mut bool,
}

impl ElementMut<'_> {
    /// Sets the position relative to the parent.
    pub fn set_position(&mut self, position: Dim2) -> &mut Self {
        self.node.position = position;
        *self.dirty = true;
        self
    }

    /// Sets the size relative to the parent.
    pub fn set_size(&mut self, size: Dim2) -> &mut Self {
        self.node.size = size;
        *self.dirty = true;
        self
    }

    /// Sets the base color.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.node.color = color;
        *self.dirty = true;
        self
    }

    /// Sets the hovered color. `None` falls back to the base color.
    pub fn set_hovered_color(&mut self, color: Option<Color>) -> &mut Self {
        self.node.hovered_color = color;
        *self.dirty = true;
        self
    }

    /// Sets the active color. `None` falls back to the base color.
    pub fn set_active_color(&mut self, color: Option<Color>) -> &mut Self {
        self.node.active_color = color;
        *self.dirty = true;
        self
    }

    /// Replaces the enabled states. Current state bits that are no longer
    /// enabled are cleared.
    pub fn set_enabled_states(&mut self, states: StateFlags) -> &mut Self {
        self.node.enabled_states = states;
        self.node.state.retain(states);
        *self.dirty = true;
        self
    }

    /// The element's widget as a concrete type. Marks the tree dirty when
    /// the type matches.
    pub fn widget_mut<T: Widget>(&mut self) -> Option<&mut T> {
        let widget = self.node.widget.as_any_mut().downcast_mut::<T>()?;
        *self.dirty = true;
        Some(widget)
    }
}

impl Deref for ElementMut<'_> {
    type Target = ElementNode;

    fn deref(&self) -> &ElementNode {
        &*self.node
    }
}

struct Slot {
    generation: u32,
    node: Option<ElementNode>,
}

/// Arena of elements with a permanent root.
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ElementId,
    len: usize,
    dirty: bool,
}

impl ElementTree {
    /// Creates a tree holding only the root.
    ///
    /// The root has zero size, is transparent and enables no states.
    #[must_use]
    pub fn new() -> Self {
        let root_desc = ElementDesc::default().with_color(Color::TRANSPARENT).with_enabled_states(StateFlags::NONE);
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(ElementNode::new(root_desc, Box::new(Panel::new()))),
            }],
            free: Vec::new(),
            root: ElementId::new(0, 0),
            len: 1,
            dirty: true,
        }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, root included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false: the root is permanent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `id` names a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Creates an orphaned element.
    pub fn create(&mut self, desc: ElementDesc, widget: impl Widget) -> ElementId {
        let node = ElementNode::new(desc, Box::new(widget));
        let kind = node.widget.kind();

        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            ElementId::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot { generation: 0, node: Some(node) });
            ElementId::new(index, 0)
        };

        self.len += 1;
        tracing::trace!(?id, kind, "element created");
        id
    }

    /// Looks up a live element.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    /// Mutable access to a live element.
    #[must_use]
    pub fn get_mut(&mut self, id: ElementId) -> Option<ElementMut<'_>> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.as_mut()?;
        Some(ElementMut { node, dirty: &mut self.dirty })
    }

    /// The element's widget as a concrete type.
    #[must_use]
    pub fn widget<T: Widget>(&self, id: ElementId) -> Option<&T> {
        self.get(id)?.widget_as()
    }

    pub(crate) fn widget_dyn_mut(&mut self, id: ElementId) -> Option<&mut (dyn Widget + 'static)> {
        let node = self.node_mut(id)?;
        Some(node.widget.as_mut())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`UiError::RootElement`] if `child` is the root
    /// - [`UiError::ElementNotFound`] if either id is stale
    /// - [`UiError::AlreadyParented`] if `child` already has a parent
    /// - [`UiError::WouldCycle`] if `child` is `parent` or one of its ancestors
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> UiResult<()> {
        if child == self.root {
            tracing::debug!(?parent, "rejected attaching the root");
            return Err(UiError::RootElement);
        }
        if !self.contains(parent) {
            return Err(UiError::ElementNotFound(parent));
        }
        let Some(node) = self.get(child) else {
            return Err(UiError::ElementNotFound(child));
        };
        if let Some(existing) = node.parent {
            tracing::debug!(?child, ?existing, "rejected attaching a parented element");
            return Err(UiError::AlreadyParented { child, parent: existing });
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!(?child, ?parent, "rejected cyclic attach");
            return Err(UiError::WouldCycle { child, parent });
        }

        let last = self.get(parent).and_then(ElementNode::last_child);
        match last.and_then(|id| self.node_mut(id)) {
            Some(last_node) => last_node.next_sibling = Some(child),
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = Some(child);
                }
            }
        }
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.last_child = Some(child);
        }
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = last;
            child_node.next_sibling = None;
        }

        self.dirty = true;
        Ok(())
    }

    /// Unlinks `child` from `parent`. The child stays alive as an orphan.
    ///
    /// Returns false if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.get(child).and_then(ElementNode::parent) != Some(parent) {
            return false;
        }
        self.unlink(child);
        true
    }

    /// Unlinks `id` from whatever parent it has. Returns false for orphans.
    pub fn detach(&mut self, id: ElementId) -> bool {
        if self.get(id).and_then(ElementNode::parent).is_none() {
            return false;
        }
        self.unlink(id);
        true
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next_sibling = next,
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = next;
                }
            }
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev_sibling = prev,
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.last_child = prev;
                }
            }
        }

        self.dirty = true;
    }

    /// Detaches `id` and frees it together with its whole subtree.
    ///
    /// Returns the number of elements freed. Ids of freed elements go stale.
    ///
    /// # Errors
    ///
    /// [`UiError::RootElement`] for the root, [`UiError::ElementNotFound`]
    /// for a stale id.
    pub fn destroy(&mut self, id: ElementId) -> UiResult<usize> {
        if id == self.root {
            return Err(UiError::RootElement);
        }
        if !self.contains(id) {
            return Err(UiError::ElementNotFound(id));
        }
        self.detach(id);

        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(current) = stack.pop() {
            let index = current.index();
            let Some(node) = self.slots.get_mut(index as usize).and_then(|slot| slot.node.take()) else {
                continue;
            };
            stack.extend(self.children_from(node.first_child));
            drop(node);

            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
            freed += 1;
        }

        self.len -= freed;
        tracing::trace!(?id, freed, "element destroyed");
        Ok(freed)
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get(c).and_then(ElementNode::parent);
        }
        false
    }

    /// Returns true if `id` is the root or reachable from it.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// Children of `id` in sibling order. Empty for stale ids.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Children<'_> {
        self.children_from(self.get(id).and_then(ElementNode::first_child))
    }

    fn children_from(&self, first: Option<ElementId>) -> Children<'_> {
        Children { tree: self, next: first }
    }

    /// Absolute screen bounds of `id`, resolved through its ancestors.
    #[must_use]
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.get(c)?;
            chain.push(node);
            current = node.parent;
        }

        let mut bounds = None;
        for node in chain.iter().rev() {
            bounds = Some(layout::resolve(bounds, node.position, node.size));
        }
        bounds
    }

    /// Absolute top-left corner of `id`.
    #[must_use]
    pub fn screen_position(&self, id: ElementId) -> Option<Vec2> {
        self.bounds(id).map(|b| b.tl)
    }

    /// Absolute size of `id`.
    #[must_use]
    pub fn screen_size(&self, id: ElementId) -> Option<Vec2> {
        self.bounds(id).map(|b| b.size())
    }

    /// Sets a state bit if the element enables it. Returns true on change.
    pub(crate) fn add_state(&mut self, id: ElementId, flag: u8) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let changed = node.enabled_states.has(flag) && node.state.set(flag);
        self.dirty |= changed;
        changed
    }

    /// Clears a state bit. Returns true on change.
    pub(crate) fn remove_state(&mut self, id: ElementId, flag: u8) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let changed = node.state.clear(flag);
        self.dirty |= changed;
        changed
    }

    /// Returns true if the rendered output may be stale.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next render to rebuild.
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over an element's children.
pub struct Children<'a> {
    tree: &'a ElementTree,
    next: Option<ElementId>,
}

impl Iterator for Children<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(ElementNode::next_sibling);
        Some(id)
    }
}
