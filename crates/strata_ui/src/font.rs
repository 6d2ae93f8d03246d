//! # Fonts
//!
//! Glyph metrics and atlases arrive pre-baked: the caller rasterizes glyphs
//! elsewhere and hands over an alpha atlas plus per-glyph quads. Text
//! elements only need the [`GlyphProvider`] view of a font.

use std::collections::HashMap;
use strata_core::{TextureId, Vec2};
use thiserror::Error;

/// Errors raised while building a [`Font`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// Atlas pixel count does not match its dimensions.
    #[error("atlas is {width}x{height} but holds {actual} pixels")]
    AtlasSizeMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Pixels supplied.
        actual: usize,
    },

    /// A line metric is not a finite number.
    #[error("line metric `{0}` is not finite")]
    InvalidLineMetric(&'static str),

    /// A glyph has non-finite geometry or UVs outside `0..=1`.
    #[error("glyph {0:?} has invalid metrics")]
    InvalidGlyph(char),

    /// The fallback codepoint has no glyph.
    #[error("fallback glyph {0:?} is missing")]
    MissingFallback(char),
}

/// Placement of one glyph relative to the pen on the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Left edge.
    pub x0: f32,
    /// Top edge (negative above the baseline).
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
    /// Atlas UV of the top-left corner.
    pub uv0: Vec2,
    /// Atlas UV of the bottom-right corner.
    pub uv1: Vec2,
    /// Horizontal pen advance.
    pub advance_x: f32,
}

impl GlyphMetrics {
    /// Returns true if the glyph covers any pixels.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.x1 > self.x0 && self.y1 > self.y0
    }

    fn is_valid(&self) -> bool {
        let finite = [self.x0, self.y0, self.x1, self.y1, self.advance_x].iter().all(|v| v.is_finite());
        let in_atlas = |uv: Vec2| (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
        finite && in_atlas(self.uv0) && in_atlas(self.uv1)
    }
}

/// Vertical metrics shared by every line of a font.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of a line to the baseline.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of a line (usually negative).
    pub descender: f32,
    /// Extra space between lines.
    pub line_gap: f32,
    /// Baseline-to-baseline distance.
    pub line_spacing: f32,
}

impl LineMetrics {
    /// Derives the line spacing from the other metrics.
    #[must_use]
    pub fn new(ascender: f32, descender: f32, line_gap: f32) -> Self {
        Self { ascender, descender, line_gap, line_spacing: ascender - descender + line_gap }
    }
}

/// Glyph lookup used by text-bearing widgets.
pub trait GlyphProvider {
    /// Metrics for `c`, if the font has it.
    fn glyph(&self, c: char) -> Option<&GlyphMetrics>;

    /// Glyph drawn for codepoints the font lacks.
    fn fallback_glyph(&self) -> Option<&GlyphMetrics> {
        None
    }

    /// Vertical metrics.
    fn line_metrics(&self) -> LineMetrics;

    /// Texture holding the glyph atlas.
    fn texture_id(&self) -> TextureId;

    /// The atlas pixels, if the provider owns them.
    fn atlas(&self) -> Option<Atlas<'_>> {
        None
    }

    /// Metrics for `c`, or the fallback glyph.
    fn glyph_or_fallback(&self, c: char) -> Option<&GlyphMetrics> {
        self.glyph(c).or_else(|| self.fallback_glyph())
    }

    /// Size of `text` laid out as by a label: the widest line by the
    /// number of lines times the line spacing.
    fn calc_text_size(&self, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }

        let mut widest = 0.0_f32;
        let mut lines = 0_u16;
        for line in text.split('\n') {
            let width: f32 = line
                .chars()
                .filter(|&c| c != '\r')
                .filter_map(|c| self.glyph_or_fallback(c))
                .map(|g| g.advance_x)
                .sum();
            widest = widest.max(width);
            lines = lines.saturating_add(1);
        }
        Vec2::new(widest, f32::from(lines) * self.line_metrics().line_spacing)
    }
}

/// Borrowed view of an 8-bit alpha atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atlas<'a> {
    /// One coverage byte per pixel, row-major.
    pub pixels: &'a [u8],
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Atlas<'_> {
    /// Expands the atlas to packed RGBA with white color and the coverage
    /// as alpha, in the same packing as vertex colors.
    #[must_use]
    pub fn to_rgba32(&self) -> Vec<u32> {
        self.pixels.iter().map(|&a| (u32::from(a) << 24) | 0x00FF_FFFF).collect()
    }
}

/// Everything needed to build a [`Font`].
#[derive(Debug, Clone, Default)]
pub struct FontDesc {
    /// Vertical metrics.
    pub line_metrics: LineMetrics,
    /// Glyph table.
    pub glyphs: Vec<(char, GlyphMetrics)>,
    /// Codepoint drawn for missing glyphs, if any.
    pub fallback: Option<char>,
    /// Texture the atlas is uploaded to.
    pub texture: TextureId,
    /// Atlas width in pixels.
    pub atlas_width: u32,
    /// Atlas height in pixels.
    pub atlas_height: u32,
    /// Atlas coverage bytes.
    pub atlas: Vec<u8>,
}

/// A pre-baked bitmap font.
#[derive(Debug, Clone)]
pub struct Font {
    line_metrics: LineMetrics,
    glyphs: HashMap<char, GlyphMetrics>,
    fallback: Option<char>,
    texture: TextureId,
    atlas_width: u32,
    atlas_height: u32,
    atlas: Vec<u8>,
}

impl Font {
    /// Validates and builds a font.
    ///
    /// # Errors
    ///
    /// Returns a [`FontError`] if the atlas size is inconsistent, a metric
    /// is not finite, a UV leaves the atlas or the fallback glyph is absent.
    pub fn new(desc: FontDesc) -> Result<Self, FontError> {
        let expected = u64::from(desc.atlas_width) * u64::from(desc.atlas_height);
        if expected != desc.atlas.len() as u64 {
            return Err(FontError::AtlasSizeMismatch {
                width: desc.atlas_width,
                height: desc.atlas_height,
                actual: desc.atlas.len(),
            });
        }

        let metrics = desc.line_metrics;
        for (name, value) in [
            ("ascender", metrics.ascender),
            ("descender", metrics.descender),
            ("line_gap", metrics.line_gap),
            ("line_spacing", metrics.line_spacing),
        ] {
            if !value.is_finite() {
                return Err(FontError::InvalidLineMetric(name));
            }
        }

        let mut glyphs = HashMap::with_capacity(desc.glyphs.len());
        for (c, glyph) in desc.glyphs {
            if !glyph.is_valid() {
                return Err(FontError::InvalidGlyph(c));
            }
            glyphs.insert(c, glyph);
        }

        if let Some(c) = desc.fallback {
            if !glyphs.contains_key(&c) {
                return Err(FontError::MissingFallback(c));
            }
        }

        tracing::debug!(glyphs = glyphs.len(), width = desc.atlas_width, height = desc.atlas_height, "font loaded");

        Ok(Self {
            line_metrics: metrics,
            glyphs,
            fallback: desc.fallback,
            texture: desc.texture,
            atlas_width: desc.atlas_width,
            atlas_height: desc.atlas_height,
            atlas: desc.atlas,
        })
    }

    /// Number of glyphs.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The atlas as one coverage byte per pixel, with its width and height.
    #[must_use]
    pub fn texture_data_as_alpha8(&self) -> (&[u8], u32, u32) {
        (&self.atlas, self.atlas_width, self.atlas_height)
    }

    /// The atlas as packed white RGBA pixels, with its width and height.
    #[must_use]
    pub fn texture_data_as_rgba32(&self) -> (Vec<u32>, u32, u32) {
        let atlas = Atlas { pixels: &self.atlas, width: self.atlas_width, height: self.atlas_height };
        (atlas.to_rgba32(), self.atlas_width, self.atlas_height)
    }
}

impl GlyphProvider for Font {
    fn glyph(&self, c: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&c)
    }

    fn fallback_glyph(&self) -> Option<&GlyphMetrics> {
        self.glyphs.get(&self.fallback?)
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line_metrics
    }

    fn texture_id(&self) -> TextureId {
        self.texture
    }

    fn atlas(&self) -> Option<Atlas<'_>> {
        Some(Atlas { pixels: &self.atlas, width: self.atlas_width, height: self.atlas_height })
    }
}

/// Handle to a font in a [`Fonts`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Fonts available to a context. The first one is the default.
#[derive(Default)]
pub struct Fonts {
    fonts: Vec<Box<dyn GlyphProvider>>,
}

impl Fonts {
    /// Registers a font.
    pub fn add(&mut self, font: impl GlyphProvider + 'static) -> FontId {
        let id = FontId(u32::try_from(self.fonts.len()).unwrap_or(u32::MAX));
        self.fonts.push(Box::new(font));
        id
    }

    /// Looks up a font.
    #[must_use]
    pub fn get(&self, id: FontId) -> Option<&dyn GlyphProvider> {
        self.fonts.get(id.0 as usize).map(|font| &**font)
    }

    /// The first registered font.
    #[must_use]
    pub fn default_font(&self) -> Option<&dyn GlyphProvider> {
        self.fonts.first().map(|font| &**font)
    }

    /// `id`'s font, or the default font when `id` is `None`.
    #[must_use]
    pub fn resolve(&self, id: Option<FontId>) -> Option<&dyn GlyphProvider> {
        match id {
            Some(id) => self.get(id),
            None => self.default_font(),
        }
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Returns true if no font is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Iterates over the fonts with their ids, e.g. to upload atlases.
    pub fn iter(&self) -> impl Iterator<Item = (FontId, &dyn GlyphProvider)> {
        self.fonts
            .iter()
            .enumerate()
            .map(|(i, font)| (FontId(u32::try_from(i).unwrap_or(u32::MAX)), &**font))
    }
}

/// Builds a small monospace font for tests: every glyph in `chars` is 8 px
/// wide, spans 10 px above the baseline and advances 10 px.
#[cfg(test)]
pub(crate) fn test_font(chars: &str, fallback: Option<char>) -> Font {
    let glyphs = chars
        .chars()
        .map(|c| {
            let visible = !c.is_whitespace();
            let glyph = GlyphMetrics {
                x0: 0.0,
                y0: if visible { -10.0 } else { 0.0 },
                x1: if visible { 8.0 } else { 0.0 },
                y1: 0.0,
                uv0: Vec2::ZERO,
                uv1: Vec2::new(0.5, 0.5),
                advance_x: 10.0,
            };
            (c, glyph)
        })
        .collect();

    Font::new(FontDesc {
        line_metrics: LineMetrics::new(12.0, -4.0, 0.0),
        glyphs,
        fallback,
        texture: TextureId(7),
        atlas_width: 2,
        atlas_height: 2,
        atlas: vec![0, 64, 128, 255],
    })
    .unwrap()
}
