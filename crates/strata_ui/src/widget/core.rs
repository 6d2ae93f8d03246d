//! Core widget types and traits.

use crate::font::Fonts;
use crate::input::MouseButton;
use crate::tree::ElementId;
use std::any::Any;
use strata_core::{Color, DrawList, Rect, TextureId};

/// Interaction state bits of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StateFlags(u8);

impl StateFlags {
    /// The cursor is over the element.
    pub const HOVERED: u8 = 1 << 0;
    /// A mouse button went down on the element and has not been released.
    pub const ACTIVE: u8 = 1 << 1;

    /// No bits set.
    pub const NONE: Self = Self(0);
    /// Every state bit.
    pub const ALL: Self = Self(Self::HOVERED | Self::ACTIVE);

    /// Creates flags from raw bits. Unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Returns true if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets a flag. Returns true if it was previously clear.
    #[inline]
    pub fn set(&mut self, flag: u8) -> bool {
        let before = self.0;
        self.0 |= flag & Self::ALL.0;
        self.0 != before
    }

    /// Clears a flag. Returns true if it was previously set.
    #[inline]
    pub fn clear(&mut self, flag: u8) -> bool {
        let before = self.0;
        self.0 &= !flag;
        self.0 != before
    }

    /// Keeps only the bits also set in `mask`. Returns true if any bit was dropped.
    #[inline]
    pub fn retain(&mut self, mask: Self) -> bool {
        let before = self.0;
        self.0 &= mask.0;
        self.0 != before
    }
}

/// Everything a widget needs to emit its geometry.
pub struct RenderContext<'a> {
    /// Absolute screen bounds of the element.
    pub bounds: Rect,
    /// Background color for the element's current state.
    pub color: Color,
    /// Texture bound for untextured quads.
    pub solid_texture: TextureId,
    /// Fonts available to text-bearing widgets.
    pub fonts: &'a Fonts,
}

/// Base trait for all element behaviours.
///
/// An element owns exactly one widget. The tree handles layout, links and
/// state bits; the widget decides which states the element can take, how
/// it reacts to presses and what it draws.
pub trait Widget: Any {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;

    /// States the element may enter by default.
    fn enabled_states(&self) -> StateFlags {
        StateFlags::from_bits(StateFlags::HOVERED)
    }

    /// A mouse button went down while the element was hovered.
    fn on_mouse_button_down(&mut self, _id: ElementId, _button: MouseButton) {}

    /// The button that activated the element was released over it.
    fn on_mouse_button_up(&mut self, _id: ElementId, _button: MouseButton) {}

    /// Emits the element's geometry. The default draws the background.
    fn render(&self, ctx: &RenderContext<'_>, list: &mut DrawList) {
        draw_background(ctx, list);
    }

    /// Upcast for downcasting to the concrete widget.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete widget.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Emits the element's background rect with the solid texture.
pub fn draw_background(ctx: &RenderContext<'_>, list: &mut DrawList) {
    list.set_texture(ctx.solid_texture);
    list.add_rect(ctx.bounds.tl, ctx.bounds.br, ctx.color);
}

/// Plain rectangle. Hoverable, never active.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel;

impl Panel {
    /// Creates a panel.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "panel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
