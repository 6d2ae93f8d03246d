//! UI rendering system.
//!
//! Walks the attached tree in pre-order (parents before children, siblings
//! in order) and lets each widget append its quads, so later elements
//! draw over earlier ones. The root itself draws nothing.

use crate::font::Fonts;
use crate::layout;
use crate::tree::{ElementId, ElementTree};
use crate::widget::RenderContext;
use strata_core::{DrawList, Rect, TextureId};

/// Appends the tree's geometry to `list` and closes the last command.
///
/// `list` is not cleared; callers rebuilding a frame clear it first.
pub fn render_tree(tree: &ElementTree, fonts: &Fonts, solid_texture: TextureId, list: &mut DrawList) {
    let root = tree.root();
    if let Some(bounds) = tree.bounds(root) {
        list.set_texture(solid_texture);
        render_children(tree, fonts, solid_texture, root, bounds, list);
    }
    list.finish();
}

fn render_children(
    tree: &ElementTree,
    fonts: &Fonts,
    solid_texture: TextureId,
    parent: ElementId,
    parent_bounds: Rect,
    list: &mut DrawList,
) {
    for id in tree.children(parent) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let bounds = layout::resolve(Some(parent_bounds), node.position(), node.size());
        let ctx = RenderContext { bounds, color: node.render_color(), solid_texture, fonts };
        node.widget().render(&ctx, list);
        render_children(tree, fonts, solid_texture, id, bounds, list);
    }
}
