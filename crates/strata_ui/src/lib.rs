//! # STRATA UI
//!
//! Retained-mode interface layer. The host builds an element tree once,
//! feeds input every frame and re-uploads geometry only when something
//! visible changed.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     UI PIPELINE                         │
//! ├────────────────────────────────────────────────────────┤
//! │  Input State → Router → Element Tree → Draw List       │
//! │       ↓          ↓           ↓             ↓           │
//! │  Edge Capture  Hit Test  Dirty Flag   Texture Runs     │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use strata_core::{Color, Dim2};
//! use strata_ui::{Button, Context, ElementDesc, MouseButton, UiConfig};
//!
//! let mut ctx = Context::new(UiConfig { display_width: 800, display_height: 600, ..UiConfig::default() });
//! let ok = ctx.create(
//!     ElementDesc::default()
//!         .with_position(Dim2::px(10.0, 10.0))
//!         .with_size(Dim2::px(400.0, 150.0))
//!         .with_hovered_color(Color::rgb(0.0, 1.0, 0.0)),
//!     Button::new(),
//! );
//! ctx.add_to_root(ok).unwrap();
//!
//! ctx.input_mut().set_mouse_pos(50.0, 50.0);
//! ctx.input_mut().mouse_button_down(MouseButton::Left);
//! ctx.update();
//! ctx.input_mut().mouse_button_up(MouseButton::Left);
//! assert_eq!(ctx.update().clicked, Some(ok));
//!
//! if ctx.render() {
//!     let draw_data = ctx.draw_data();
//!     assert_eq!(draw_data.vertices().len(), 4);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod current;
pub mod error;
pub mod font;
pub mod input;
pub mod layout;
pub mod render;
pub mod tree;
pub mod widget;

pub use config::{ConfigError, UiConfig};
pub use context::Context;
pub use current::{
    add_to_root, create_context, current_context, destroy_context, remove_from_root, render, set_current_context,
    set_dirty, set_root_size, update, with_context, with_current, with_draw_data, ContextHandle,
};
pub use error::{UiError, UiResult};
pub use font::{Atlas, Font, FontDesc, FontError, FontId, Fonts, GlyphMetrics, GlyphProvider, LineMetrics};
pub use input::{hit_test, InputResponse, InputRouter, InputState, MouseButton};
pub use render::render_tree;
pub use tree::{Children, ElementDesc, ElementId, ElementMut, ElementNode, ElementTree};
pub use widget::{draw_background, Button, Label, Panel, RenderContext, StateFlags, Widget};
