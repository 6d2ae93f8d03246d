//! # UI Context
//!
//! A context bundles one element tree with its input, fonts and the draw
//! data of the last render. Frames follow a fixed order:
//!
//! 1. Record input into [`Context::input_mut`]
//! 2. [`Context::update`] routes it to the tree
//! 3. [`Context::render`] rebuilds the draw data if anything changed
//! 4. Submit [`Context::draw_data`]

use crate::config::UiConfig;
use crate::error::UiResult;
use crate::font::{Font, FontDesc, FontId, Fonts};
use crate::input::{InputResponse, InputRouter, InputState};
use crate::render::render_tree;
use crate::tree::{ElementDesc, ElementId, ElementTree};
use crate::widget::Widget;
use std::path::Path;
use strata_core::{Dim2, DrawData, DrawList, Vec2};

/// A retained UI instance.
pub struct Context {
    config: UiConfig,
    tree: ElementTree,
    router: InputRouter,
    input: InputState,
    fonts: Fonts,
    draw_data: DrawData,
    display_size: (u32, u32),
    frame: u64,
}

impl Context {
    /// Creates a context with an empty tree sized to the configured display.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        let list = DrawList::with_capacity(config.index_format, config.vertex_capacity, config.index_capacity);
        let mut ctx = Self {
            tree: ElementTree::new(),
            router: InputRouter::new(),
            input: InputState::new(),
            fonts: Fonts::default(),
            draw_data: DrawData::new(list),
            display_size: (0, 0),
            frame: 0,
            config,
        };
        ctx.apply_root_size(ctx.config.display_width, ctx.config.display_height);
        ctx
    }

    /// Creates a context from a TOML config file.
    ///
    /// # Errors
    ///
    /// [`UiError::Config`](crate::UiError::Config) if the file cannot be read or parsed.
    pub fn from_config_file(path: impl AsRef<Path>) -> UiResult<Self> {
        let config = UiConfig::load(path)?;
        Ok(Self::new(config))
    }

    /// The configuration the context was built with.
    #[must_use]
    pub const fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The element tree.
    #[must_use]
    pub const fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable element tree.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.tree.root()
    }

    /// Creates an orphaned element.
    pub fn create(&mut self, desc: ElementDesc, widget: impl Widget) -> ElementId {
        self.tree.create(desc, widget)
    }

    /// Attaches `id` as the last child of the root.
    ///
    /// # Errors
    ///
    /// See [`ElementTree::add_child`].
    pub fn add_to_root(&mut self, id: ElementId) -> UiResult<()> {
        self.tree.add_child(self.tree.root(), id)
    }

    /// Detaches `id` from the root. Returns false if it is not a root child.
    pub fn remove_from_root(&mut self, id: ElementId) -> bool {
        self.tree.remove_child(self.tree.root(), id)
    }

    /// Resizes the root. Only a real change marks the tree dirty.
    pub fn set_root_size(&mut self, width: u32, height: u32) {
        if self.display_size != (width, height) {
            self.apply_root_size(width, height);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn apply_root_size(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
        let root = self.tree.root();
        if let Some(mut node) = self.tree.get_mut(root) {
            node.set_size(Dim2::px(width as f32, height as f32));
        }
        tracing::debug!(width, height, "root resized");
    }

    /// Current root size in pixels.
    #[must_use]
    pub const fn root_size(&self) -> (u32, u32) {
        self.display_size
    }

    /// Input recorded for the next update.
    #[must_use]
    pub const fn input(&self) -> &InputState {
        &self.input
    }

    /// Records input for the next update.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Hover/active state.
    #[must_use]
    pub const fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Registered fonts.
    #[must_use]
    pub const fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// Registered fonts. Marks the tree dirty, since labels without an
    /// explicit font follow the default one.
    pub fn fonts_mut(&mut self) -> &mut Fonts {
        self.tree.set_dirty();
        &mut self.fonts
    }

    /// Validates and registers a baked font.
    ///
    /// # Errors
    ///
    /// [`UiError::Font`](crate::UiError::Font) if the description is inconsistent.
    pub fn add_font(&mut self, desc: FontDesc) -> UiResult<FontId> {
        let font = Font::new(desc)?;
        let id = self.fonts_mut().add(font);
        tracing::debug!(?id, "font registered");
        Ok(id)
    }

    /// Forces the next render to rebuild.
    pub fn set_dirty(&mut self) {
        self.tree.set_dirty();
    }

    /// Returns true if the next render will rebuild.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.tree.is_dirty()
    }

    /// Routes the recorded input to the tree and starts a new input frame.
    pub fn update(&mut self) -> InputResponse {
        let response = self.router.update(&mut self.tree, &self.input);
        self.input.begin_frame();
        response
    }

    /// Rebuilds the draw data if the tree is dirty.
    ///
    /// Returns true if the draw data changed.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&mut self) -> bool {
        if !self.tree.is_dirty() {
            return false;
        }

        let list = &mut self.draw_data.list;
        list.clear();
        render_tree(&self.tree, &self.fonts, self.config.solid_texture, list);
        self.draw_data.display_size = Vec2::new(self.display_size.0 as f32, self.display_size.1 as f32);
        self.tree.clear_dirty();
        self.frame += 1;

        tracing::debug!(
            frame = self.frame,
            elements = self.tree.len(),
            vertices = self.draw_data.list.vertex_count(),
            indices = self.draw_data.list.index_count(),
            commands = self.draw_data.list.commands().len(),
            "ui rebuilt"
        );
        true
    }

    /// Output of the last render that rebuilt.
    #[must_use]
    pub const fn draw_data(&self) -> &DrawData {
        &self.draw_data
    }

    /// Number of renders that rebuilt the draw data.
    #[must_use]
    pub const fn frames_rendered(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::config::ConfigError;
    use crate::error::UiError;
    use crate::font::{FontError, LineMetrics};
    use crate::widget::{Button, Label};
    use strata_core::{Color, TextureId};

    fn context() -> Context {
        Context::new(UiConfig { display_width: 800, display_height: 600, ..UiConfig::default() })
    }

    #[test]
    fn test_render_only_when_dirty() {
        let mut ctx = context();
        assert!(ctx.render());
        assert!(!ctx.is_dirty());
        assert!(!ctx.render());

        ctx.set_dirty();
        assert!(ctx.render());
        assert_eq!(ctx.frames_rendered(), 2);
    }

    #[test]
    fn test_root_size() {
        let mut ctx = context();
        ctx.render();
        assert_eq!(ctx.draw_data().display_size, Vec2::new(800.0, 600.0));

        ctx.set_root_size(800, 600);
        assert!(!ctx.is_dirty());

        ctx.set_root_size(1024, 768);
        assert!(ctx.is_dirty());
        assert_eq!(ctx.tree().screen_size(ctx.root()), Some(Vec2::new(1024.0, 768.0)));
    }

    #[test]
    fn test_hover_color_rebuilds() {
        let mut ctx = context();
        let red = Color::rgb(1.0, 0.0, 0.0);
        let id = ctx.create(
            ElementDesc::default()
                .with_position(Dim2::px(10.0, 10.0))
                .with_size(Dim2::px(100.0, 100.0))
                .with_hovered_color(red),
            Button::new(),
        );
        ctx.add_to_root(id).unwrap();
        ctx.render();
        assert_eq!(ctx.draw_data().vertices()[0].col, Color::WHITE.to_rgba32());

        ctx.input_mut().set_mouse_pos(50.0, 50.0);
        ctx.update();
        assert!(ctx.render());
        assert_eq!(ctx.draw_data().vertices()[0].col, red.to_rgba32());

        // Moving within the element changes nothing.
        ctx.input_mut().set_mouse_pos(60.0, 60.0);
        ctx.update();
        assert!(!ctx.render());
    }

    #[test]
    fn test_click_reaches_button() {
        let mut ctx = context();
        let id = ctx.create(ElementDesc::default().with_size(Dim2::px(100.0, 100.0)), Button::new());
        ctx.add_to_root(id).unwrap();

        ctx.input_mut().set_mouse_pos(5.0, 5.0);
        ctx.input_mut().mouse_button_down(MouseButton::Left);
        ctx.update();
        ctx.input_mut().mouse_button_up(MouseButton::Left);
        let response = ctx.update();

        assert_eq!(response.clicked, Some(id));
        assert_eq!(ctx.tree().widget::<Button>(id).map(Button::clicks), Some(1));
    }

    #[test]
    fn test_label_edit_marks_dirty() {
        let mut ctx = context();
        let id = ctx.create(ElementDesc::default(), Label::new("a"));
        ctx.add_to_root(id).unwrap();
        ctx.render();

        if let Some(mut element) = ctx.tree_mut().get_mut(id) {
            if let Some(label) = element.widget_mut::<Label>() {
                label.set_text("b");
            }
        }
        assert!(ctx.is_dirty());
        assert_eq!(ctx.tree().widget::<Label>(id).map(Label::text), Some("b"));
    }

    #[test]
    fn test_config_file_errors_surface() {
        let missing = std::env::temp_dir().join("strata_ui_context_missing.toml");
        let result = Context::from_config_file(&missing);
        assert!(matches!(result, Err(UiError::Config(ConfigError::Io(_)))));

        let path = std::env::temp_dir().join(format!("strata_ui_context_{}.toml", std::process::id()));
        std::fs::write(&path, "display_width = 320\ndisplay_height = 240\n").unwrap();
        let ctx = Context::from_config_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(ctx.root_size(), (320, 240));
    }

    #[test]
    fn test_add_font_validates() {
        let mut ctx = context();
        ctx.render();

        let mut desc = FontDesc {
            line_metrics: LineMetrics::new(12.0, -4.0, 0.0),
            glyphs: Vec::new(),
            fallback: None,
            texture: TextureId(3),
            atlas_width: 2,
            atlas_height: 2,
            atlas: vec![0; 3],
        };
        assert!(matches!(ctx.add_font(desc.clone()), Err(UiError::Font(FontError::AtlasSizeMismatch { .. }))));
        assert!(ctx.fonts().is_empty());

        desc.atlas = vec![0; 4];
        let id = ctx.add_font(desc).unwrap();
        assert_eq!(ctx.fonts().get(id).map(crate::font::GlyphProvider::texture_id), Some(TextureId(3)));
        assert!(ctx.is_dirty());
    }

    #[test]
    fn test_remove_from_root() {
        let mut ctx = context();
        let id = ctx.create(ElementDesc::default().with_size(Dim2::px(5.0, 5.0)), Button::new());
        ctx.add_to_root(id).unwrap();
        ctx.render();
        assert_eq!(ctx.draw_data().vertices().len(), 4);

        assert!(ctx.remove_from_root(id));
        assert!(!ctx.remove_from_root(id));
        ctx.render();
        assert!(ctx.draw_data().vertices().is_empty());
    }
}
