//! Static text.

use super::core::{draw_background, RenderContext, StateFlags, Widget};
use crate::font::FontId;
use std::any::Any;
use strata_core::{Color, DrawList, Vec2};

/// Element that draws a line or more of text over its background.
///
/// Labels enable no states, so the cursor passes through them to the
/// element beneath. Give the element a transparent color to draw text only.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    font: Option<FontId>,
    text_color: Color,
}

impl Label {
    /// Creates a label drawn with the default font in white.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: None, text_color: Color::WHITE }
    }

    /// Uses `font` instead of the default font.
    #[must_use]
    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Explicit font, if any.
    #[must_use]
    pub const fn font(&self) -> Option<FontId> {
        self.font
    }

    /// Sets the font. `None` selects the default font.
    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
    }

    /// The text color.
    #[must_use]
    pub const fn text_color(&self) -> Color {
        self.text_color
    }

    /// Sets the text color.
    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        "label"
    }

    fn enabled_states(&self) -> StateFlags {
        StateFlags::NONE
    }

    /// Background, then one quad per visible glyph on the font's texture.
    ///
    /// The pen starts one ascender below the top-left corner. `\n` moves it
    /// to the next line; codepoints without a glyph or fallback are skipped.
    fn render(&self, ctx: &RenderContext<'_>, list: &mut DrawList) {
        draw_background(ctx, list);
        if self.text.is_empty() {
            return;
        }
        let Some(font) = ctx.fonts.resolve(self.font) else {
            return;
        };

        let metrics = font.line_metrics();
        let origin = ctx.bounds.tl;
        let mut pen = Vec2::new(origin.x, origin.y + metrics.ascender);
        list.set_texture(font.texture_id());

        for c in self.text.chars() {
            match c {
                '\n' => {
                    pen.x = origin.x;
                    pen.y += metrics.line_spacing;
                    continue;
                }
                '\r' => continue,
                _ => {}
            }
            let Some(glyph) = font.glyph_or_fallback(c) else {
                continue;
            };
            if glyph.is_visible() {
                list.add_rect_uv(
                    pen + Vec2::new(glyph.x0, glyph.y0),
                    pen + Vec2::new(glyph.x1, glyph.y1),
                    self.text_color,
                    glyph.uv0,
                    glyph.uv1,
                );
            }
            pen.x += glyph.advance_x;
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
    use crate::font::{test_font, Fonts};
    use strata_core::{IndexFormat, Rect, TextureId};

    fn render(label: &Label, fonts: &Fonts) -> DrawList {
        let ctx = RenderContext {
            bounds: Rect::from_pos_size(Vec2::new(100.0, 50.0), Vec2::new(200.0, 40.0)),
            color: Color::TRANSPARENT,
            solid_texture: TextureId::SOLID,
            fonts,
        };
        let mut list = DrawList::new(IndexFormat::U16);
        label.render(&ctx, &mut list);
        list.finish();
        list
    }

    #[test]
    fn test_glyph_quads_follow_pen() {
        let mut fonts = Fonts::default();
        fonts.add(test_font("ab ", None));
        let list = render(&Label::new("a b"), &fonts);

        // Background plus two visible glyphs; the space only advances.
        assert_eq!(list.vertex_count(), 12);
        let cmds = list.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].texture, TextureId::SOLID);
        assert_eq!(cmds[0].index_count, 6);
        assert_eq!(cmds[1].texture, TextureId(7));
        assert_eq!(cmds[1].index_count, 12);

        // Baseline at y = 50 + 12; glyphs span 10 px above it.
        let first = &list.vertices()[4];
        assert_eq!(first.pos, Vec2::new(100.0, 52.0));
        let second = &list.vertices()[8];
        assert_eq!(second.pos, Vec2::new(120.0, 52.0));
        assert_eq!(second.col, Color::WHITE.to_rgba32());
    }

    #[test]
    fn test_newline_and_fallback() {
        let mut fonts = Fonts::default();
        fonts.add(test_font("a?", Some('?')));
        let list = render(&Label::new("a\nz"), &fonts);

        assert_eq!(list.vertex_count(), 12);
        // Second line: pen back at x = 100, one line spacing lower.
        assert_eq!(list.vertices()[8].pos, Vec2::new(100.0, 68.0));
    }

    #[test]
    fn test_missing_glyph_without_fallback_is_skipped() {
        let mut fonts = Fonts::default();
        fonts.add(test_font("a", None));
        let list = render(&Label::new("zaz"), &fonts);

        assert_eq!(list.vertex_count(), 8);
        assert_eq!(list.vertices()[4].pos.x, 100.0);
    }

    #[test]
    fn test_no_font_draws_background_only() {
        let list = render(&Label::new("text").with_text_color(Color::BLACK), &Fonts::default());
        assert_eq!(list.vertex_count(), 4);
        assert_eq!(list.commands().len(), 1);
        assert_eq!(Label::new("x").enabled_states(), StateFlags::NONE);
    }

    #[test]
    fn test_explicit_font_selected() {
        let mut fonts = Fonts::default();
        fonts.add(test_font("a", None));
        let second = fonts.add(test_font("b", None));

        assert_eq!(render(&Label::new("b"), &fonts).vertex_count(), 4);
        assert_eq!(render(&Label::new("b").with_font(second), &fonts).vertex_count(), 8);
    }
}
