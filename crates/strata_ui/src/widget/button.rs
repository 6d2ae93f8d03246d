//! Clickable button.

use super::core::{StateFlags, Widget};
use crate::input::MouseButton;
use crate::tree::ElementId;
use std::any::Any;
use std::fmt;

type ClickHandler = Box<dyn FnMut(ElementId, MouseButton)>;

/// Element that can be pressed and fires a callback on click.
///
/// The callback runs inside the router update with the context borrowed,
/// so it must not call back into the same context.
#[derive(Default)]
pub struct Button {
    on_clicked: Option<ClickHandler>,
    clicks: u32,
}

impl Button {
    /// Creates a button without a callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a button that runs `handler` on every click.
    #[must_use]
    pub fn with_on_clicked(handler: impl FnMut(ElementId, MouseButton) + 'static) -> Self {
        Self { on_clicked: Some(Box::new(handler)), clicks: 0 }
    }

    /// Replaces the click callback.
    pub fn set_on_clicked(&mut self, handler: impl FnMut(ElementId, MouseButton) + 'static) {
        self.on_clicked = Some(Box::new(handler));
    }

    /// Number of clicks received so far.
    #[must_use]
    pub const fn clicks(&self) -> u32 {
        self.clicks
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("has_handler", &self.on_clicked.is_some())
            .field("clicks", &self.clicks)
            .finish()
    }
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn enabled_states(&self) -> StateFlags {
        StateFlags::ALL
    }

    fn on_mouse_button_up(&mut self, id: ElementId, button: MouseButton) {
        self.clicks = self.clicks.saturating_add(1);
        if let Some(handler) = self.on_clicked.as_mut() {
            handler(id, button);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_click_runs_handler() {
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let mut button = Button::with_on_clicked(move |id, b| sink.set(Some((id, b))));

        let id = ElementId::new(3, 1);
        button.on_mouse_button_down(id, MouseButton::Left);
        assert_eq!(seen.get(), None);

        button.on_mouse_button_up(id, MouseButton::Left);
        assert_eq!(seen.get(), Some((id, MouseButton::Left)));
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_button_enables_hover_and_active() {
        assert_eq!(Button::new().enabled_states(), StateFlags::ALL);
    }
}
