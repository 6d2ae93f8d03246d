//! Draw list compilation.
//!
//! Every visual primitive ends up here as a quad: four vertices (TL, BL, BR,
//! TR) and six indices (`0,1,2,2,3,0` relative to the quad). Consecutive
//! primitives that sample the same texture share one [`DrawCmd`]; a texture
//! switch closes the open command and starts a new one.

use crate::geometry::{Color, Vec2};
use serde::{Deserialize, Serialize};

/// Texture handle understood by the backend.
///
/// [`TextureId::SOLID`] is the backend's 1x1 white texture used for untextured
/// quads unless configured otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(pub u64);

impl TextureId {
    /// The conventional solid white texture.
    pub const SOLID: Self = Self(0);
}

/// Vertex for UI rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    /// Screen position in pixels.
    pub pos: Vec2,
    /// Texture coordinates.
    pub uv: Vec2,
    /// Packed color (see [`Color::to_rgba32`]).
    pub col: u32,
}

impl DrawVert {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(pos: Vec2, uv: Vec2, col: u32) -> Self {
        Self { pos, uv, col }
    }
}

/// A run of indices drawn with one bound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCmd {
    /// Texture bound for this run.
    pub texture: TextureId,
    /// First index of the run.
    pub index_offset: u32,
    /// Number of indices in the run.
    pub index_count: u32,
}

/// Width of the index buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    /// 16-bit indices (widened automatically past 65 536 vertices).
    U16,
    /// 32-bit indices.
    #[default]
    U32,
}

/// Index buffer in either width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl Indices {
    /// Creates an empty buffer of the given format.
    #[must_use]
    pub fn with_capacity(format: IndexFormat, capacity: usize) -> Self {
        match format {
            IndexFormat::U16 => Self::U16(Vec::with_capacity(capacity)),
            IndexFormat::U32 => Self::U32(Vec::with_capacity(capacity)),
        }
    }

    /// Returns the current format.
    #[must_use]
    pub const fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    /// Returns the number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    /// Returns true if there are no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index at `i`, widened to `u32`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Self::U32(v) => v.get(i).copied(),
        }
    }

    /// Copies the indices out as `u32`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u32> {
        match self {
            Self::U16(v) => v.iter().map(|&x| u32::from(x)).collect(),
            Self::U32(v) => v.clone(),
        }
    }

    /// Raw bytes for buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::U16(v) => v.clear(),
            Self::U32(v) => v.clear(),
        }
    }

    /// Converts a 16-bit buffer to 32 bits in place.
    fn widen(&mut self) {
        if let Self::U16(v) = self {
            let widened = v.iter().map(|&x| u32::from(x)).collect();
            *self = Self::U32(widened);
        }
    }

    /// Appends the two triangles of a quad starting at vertex `base`.
    ///
    /// Callers guarantee `base + 3` fits the current format.
    #[allow(clippy::cast_possible_truncation)]
    fn push_quad(&mut self, base: u32) {
        const PATTERN: [u32; 6] = [0, 1, 2, 2, 3, 0];
        match self {
            Self::U16(v) => v.extend(PATTERN.iter().map(|&k| (base + k) as u16)),
            Self::U32(v) => v.extend(PATTERN.iter().map(|&k| base + k)),
        }
    }
}

/// Append-only vertex/index buffers with texture-keyed command runs.
///
/// # Example
///
/// ```rust
/// use strata_core::{Color, DrawList, IndexFormat, Vec2};
///
/// let mut list = DrawList::new(IndexFormat::U32);
/// list.add_rect(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0), Color::WHITE);
/// list.finish();
///
/// assert_eq!(list.vertices().len(), 4);
/// assert_eq!(list.indices().to_vec(), vec![0, 1, 2, 2, 3, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    vertices: Vec<DrawVert>,
    indices: Indices,
    commands: Vec<DrawCmd>,
    /// Format requested at construction; `clear` returns to it.
    format: IndexFormat,
}

impl DrawList {
    /// Largest vertex count addressable with 16-bit indices.
    const U16_VERTEX_LIMIT: usize = u16::MAX as usize + 1;

    /// Creates an empty draw list.
    #[must_use]
    pub fn new(format: IndexFormat) -> Self {
        Self::with_capacity(format, 0, 0)
    }

    /// Creates an empty draw list with pre-allocated buffers.
    #[must_use]
    pub fn with_capacity(format: IndexFormat, vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Indices::with_capacity(format, indices),
            commands: Vec::with_capacity(8),
            format,
        }
    }

    /// Drops all geometry and commands, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.commands.clear();
        if self.indices.format() == self.format {
            self.indices.clear();
        } else {
            self.indices = Indices::with_capacity(self.format, 0);
        }
    }

    /// Selects the texture for the primitives that follow.
    ///
    /// Switching away from a command that already holds indices closes it;
    /// an empty open command is retargeted instead, so no zero-length runs
    /// appear in the middle of the list.
    pub fn set_texture(&mut self, texture: TextureId) {
        let len = self.index_len();
        match self.commands.last_mut() {
            Some(open) if open.texture == texture => {}
            Some(open) if open.index_offset == len => {
                open.texture = texture;
                let n = self.commands.len();
                // The retarget may make the open run continue the previous one.
                if n >= 2 && self.commands[n - 2].texture == texture {
                    self.commands.pop();
                    self.commands[n - 2].index_count = 0;
                }
            }
            Some(open) => {
                open.index_count = len - open.index_offset;
                self.commands.push(DrawCmd { texture, index_offset: len, index_count: 0 });
            }
            None => {
                self.commands.push(DrawCmd { texture, index_offset: len, index_count: 0 });
            }
        }
    }

    /// Adds an untextured rectangle (UV `(0,0)-(1,1)`).
    pub fn add_rect(&mut self, top_left: Vec2, bottom_right: Vec2, color: Color) {
        self.add_rect_uv(top_left, bottom_right, color, Vec2::ZERO, Vec2::ONE);
    }

    /// Adds a rectangle sampling the `uv0..uv1` region of the current texture.
    pub fn add_rect_uv(&mut self, top_left: Vec2, bottom_right: Vec2, color: Color, uv0: Vec2, uv1: Vec2) {
        self.push_quad(
            [
                top_left,
                Vec2::new(top_left.x, bottom_right.y),
                bottom_right,
                Vec2::new(bottom_right.x, top_left.y),
            ],
            [uv0, Vec2::new(uv0.x, uv1.y), uv1, Vec2::new(uv1.x, uv0.y)],
            color.to_rgba32(),
        );
    }

    /// Adds a line segment as a quad `thickness` pixels wide.
    ///
    /// Returns false and emits nothing for a zero-length or non-finite
    /// segment.
    pub fn add_line(&mut self, a: Vec2, b: Vec2, color: Color, thickness: f32) -> bool {
        let dir = (b - a).normalized();
        if dir == Vec2::ZERO || !thickness.is_finite() {
            tracing::trace!(?a, ?b, thickness, "skipping degenerate line");
            return false;
        }

        let n = dir.perpendicular() * (thickness * 0.5);
        let uvs = [Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::new(1.0, 0.0)];
        self.push_quad([a - n, b - n, b + n, a + n], uvs, color.to_rgba32());
        true
    }

    /// Closes the open command.
    ///
    /// Call once after the last primitive; a trailing empty command is
    /// dropped. Calling it again is harmless.
    pub fn finish(&mut self) {
        let len = self.index_len();
        if let Some(open) = self.commands.last_mut() {
            open.index_count = len - open.index_offset;
            if open.index_count == 0 {
                self.commands.pop();
            }
        }
    }

    /// Returns the vertex buffer.
    #[must_use]
    pub fn vertices(&self) -> &[DrawVert] {
        &self.vertices
    }

    /// Returns the index buffer.
    #[must_use]
    pub const fn indices(&self) -> &Indices {
        &self.indices
    }

    /// Returns the draw commands (complete after [`DrawList::finish`]).
    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Returns the vertex count.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the index count.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no geometry was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw vertex bytes for buffer upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for buffer upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn index_len(&self) -> u32 {
        self.indices.len() as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_quad(&mut self, pos: [Vec2; 4], uv: [Vec2; 4], col: u32) {
        if self.commands.is_empty() {
            self.set_texture(TextureId::SOLID);
        }

        let base = self.vertices.len();
        if self.indices.format() == IndexFormat::U16 && base + 4 > Self::U16_VERTEX_LIMIT {
            tracing::warn!(vertices = base + 4, "16-bit index buffer overflow, widening to 32-bit");
            self.indices.widen();
        }

        self.vertices.extend((0..4).map(|i| DrawVert::new(pos[i], uv[i], col)));
        self.indices.push_quad(base as u32);
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(IndexFormat::default())
    }
}

/// The compiled output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawData {
    /// Geometry and command runs.
    pub list: DrawList,
    /// Display size the geometry was laid out for.
    pub display_size: Vec2,
}

impl DrawData {
    /// Creates empty draw data.
    #[must_use]
    pub fn new(list: DrawList) -> Self {
        Self { list, display_size: Vec2::ZERO }
    }

    /// Returns the vertex buffer.
    #[must_use]
    pub fn vertices(&self) -> &[DrawVert] {
        self.list.vertices()
    }

    /// Returns the index buffer.
    #[must_use]
    pub fn indices(&self) -> &Indices {
        self.list.indices()
    }

    /// Returns the draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        self.list.commands()
    }
}
