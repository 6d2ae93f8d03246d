//! Widget system for UI components.
//!
//! Each element carries one widget that decides its enabled states, its
//! reaction to presses and the geometry it emits.

mod button;
mod core;
mod label;

pub use button::Button;
pub use self::core::{draw_background, Panel, RenderContext, StateFlags, Widget};
pub use label::Label;
