//! Relative layout resolution.
//!
//! Each element stores its position and size as [`Dim2`] values relative to
//! its parent. Resolution is a pure function of the parent's screen bounds,
//! so callers walking the tree top-down resolve every element exactly once.

use strata_core::{Dim2, Rect, Vec2};

/// Resolves an element's screen bounds.
///
/// `parent` is the parent's screen rect, or `None` for elements without a
/// parent; those resolve against a zero-sized parent at the origin, so
/// only the pixel offsets contribute.
#[must_use]
pub fn resolve(parent: Option<Rect>, position: Dim2, size: Dim2) -> Rect {
    let (origin, extent) = match parent {
        Some(rect) => (rect.tl, rect.size()),
        None => (Vec2::ZERO, Vec2::ZERO),
    };

    let pos = origin + position.offset() + extent * position.scale();
    let size = size.offset() + extent * size.scale();
    Rect::from_pos_size(pos, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Dim;

    fn screen() -> Rect {
        Rect::from_pos_size(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_pixel_offsets() {
        let rect = resolve(Some(screen()), Dim2::px(10.0, 10.0), Dim2::px(400.0, 150.0));
        assert_eq!(rect.tl, Vec2::new(10.0, 10.0));
        assert_eq!(rect.br, Vec2::new(410.0, 160.0));
    }

    #[test]
    fn test_relative_fill() {
        let parent = Rect::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(400.0, 150.0));
        let rect = resolve(Some(parent), Dim2::ZERO, Dim2::FILL);
        assert_eq!(rect, parent);
    }

    #[test]
    fn test_mixed_scale_and_offset() {
        let pos = Dim2::new(Dim::new(0.5, -20.0), Dim::rel(0.1));
        let size = Dim2::new(Dim::px(40.0), Dim::new(0.25, 5.0));
        let rect = resolve(Some(screen()), pos, size);

        assert_eq!(rect.tl, Vec2::new(380.0, 60.0));
        assert_eq!(rect.size(), Vec2::new(40.0, 155.0));
    }

    #[test]
    fn test_parentless_uses_offsets_only() {
        let position = Dim2::new(Dim::new(0.5, 3.0), Dim::px(4.0));
        let rect = resolve(None, position, Dim2::new(Dim::new(1.0, 7.0), Dim::px(8.0)));
        assert_eq!(rect.tl, Vec2::new(3.0, 4.0));
        assert_eq!(rect.size(), Vec2::new(7.0, 8.0));
    }
}
