//! # STRATA Core
//!
//! Value types and the draw list shared by every STRATA crate:
//! - 2D vectors, rectangles and colors
//! - Relative dimensions (`scale * parent_extent + offset`)
//! - Index-buffered quads partitioned into texture-keyed draw commands
//!
//! ## Pipeline position
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Element Tree │ →  │  Draw List   │ →  │ GPU Backend  │
//! │ (strata_ui)  │    │ (this crate) │    │  (external)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Nothing here knows about elements, input or fonts. The UI crate resolves
//! layout into pixel rectangles and pushes quads; the backend uploads
//! [`DrawList::vertex_bytes`] and [`DrawList::index_bytes`] and issues one draw
//! call per [`DrawCmd`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod draw;
pub mod geometry;

pub use draw::{DrawCmd, DrawData, DrawList, DrawVert, IndexFormat, Indices, TextureId};
pub use geometry::{Color, Dim, Dim2, Rect, Vec2};
