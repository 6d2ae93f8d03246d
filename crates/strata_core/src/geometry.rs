//! Geometry primitives.
//!
//! Plain value types with componentwise arithmetic. [`Dim`] and [`Dim2`] are
//! the layout primitive: a relative dimension resolves to
//! `scale * parent_extent + offset` pixels.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector in screen pixels (x right, y down).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// The vector (1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// A zero-length or non-finite vector normalizes to [`Vec2::ZERO`] instead
    /// of producing NaN.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if !len.is_finite() || len <= f32::EPSILON {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Returns the vector rotated a quarter turn: `(y, -x)`.
    #[inline]
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Returns true if both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Vec2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Vec2 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Vec2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Vec2 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle stored as top-left / bottom-right corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Vec2,
    /// Bottom-right corner.
    pub br: Vec2,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self::new(Vec2::ZERO, Vec2::ZERO);

    /// Creates a rectangle from its corners.
    #[inline]
    #[must_use]
    pub const fn new(tl: Vec2, br: Vec2) -> Self {
        Self { tl, br }
    }

    /// Creates a rectangle from a position and a size.
    #[inline]
    #[must_use]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos, pos + size)
    }

    /// Returns the width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.br.x - self.tl.x
    }

    /// Returns the height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.br.y - self.tl.y
    }

    /// Returns the size as a vector.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.br - self.tl
    }

    /// Returns true if the point lies inside the rectangle.
    ///
    /// All four edges count as inside.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.tl.x && point.x <= self.br.x && point.y >= self.tl.y && point.y <= self.br.y
    }
}

/// RGBA color with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from a hex value written `0xRRGGBBAA`.
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::rgba(channel(24), channel(16), channel(8), channel(0))
    }

    /// Packs the color into the vertex format: `R | G << 8 | B << 16 | A << 24`.
    ///
    /// Components are clamped to `0..=1` and rounded to the nearest byte.
    #[must_use]
    pub fn to_rgba32(self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        byte(self.r) | (byte(self.g) << 8) | (byte(self.b) << 16) | (byte(self.a) << 24)
    }

    /// Unpacks a color from the vertex format (see [`Color::to_rgba32`]).
    #[must_use]
    pub fn from_rgba32(packed: u32) -> Self {
        let channel = |shift: u32| f32::from(((packed >> shift) & 0xFF) as u8) / 255.0;
        Self::rgba(channel(0), channel(8), channel(16), channel(24))
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One relative dimension: `scale * parent_extent + offset` pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dim {
    /// Fraction of the parent's extent.
    pub scale: f32,
    /// Pixel offset.
    pub offset: f32,
}

impl Dim {
    /// Resolves to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// The full parent extent.
    pub const RELATIVE: Self = Self::new(1.0, 0.0);
    /// One percent of the parent extent.
    pub const PERCENT: Self = Self::new(0.01, 0.0);
    /// One pixel.
    pub const PIXEL: Self = Self::new(0.0, 1.0);

    /// Creates a new relative dimension.
    #[inline]
    #[must_use]
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    /// A pure pixel dimension.
    #[inline]
    #[must_use]
    pub const fn px(offset: f32) -> Self {
        Self::new(0.0, offset)
    }

    /// A pure relative dimension.
    #[inline]
    #[must_use]
    pub const fn rel(scale: f32) -> Self {
        Self::new(scale, 0.0)
    }

    /// Resolves against a parent extent in pixels.
    #[inline]
    #[must_use]
    pub fn resolve(self, parent_extent: f32) -> f32 {
        self.scale * parent_extent + self.offset
    }
}

impl Add for Dim {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.scale + rhs.scale, self.offset + rhs.offset)
    }
}

impl Sub for Dim {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.scale - rhs.scale, self.offset - rhs.offset)
    }
}

impl Mul for Dim {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.scale * rhs.scale, self.offset * rhs.offset)
    }
}

impl Div for Dim {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.scale / rhs.scale, self.offset / rhs.offset)
    }
}

impl AddAssign for Dim {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dim {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Dim {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Dim {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

/// Independent relative dimensions for x and y.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dim2 {
    /// Horizontal dimension.
    pub x: Dim,
    /// Vertical dimension.
    pub y: Dim,
}

impl Dim2 {
    /// Resolves to the zero vector.
    pub const ZERO: Self = Self::new(Dim::ZERO, Dim::ZERO);
    /// Covers the whole parent.
    pub const FILL: Self = Self::new(Dim::RELATIVE, Dim::RELATIVE);

    /// Creates a new pair of dimensions.
    #[inline]
    #[must_use]
    pub const fn new(x: Dim, y: Dim) -> Self {
        Self { x, y }
    }

    /// Pixel offsets only.
    #[inline]
    #[must_use]
    pub const fn px(x: f32, y: f32) -> Self {
        Self::new(Dim::px(x), Dim::px(y))
    }

    /// Parent-relative scales only.
    #[inline]
    #[must_use]
    pub const fn rel(x: f32, y: f32) -> Self {
        Self::new(Dim::rel(x), Dim::rel(y))
    }

    /// The scale components as a vector.
    #[inline]
    #[must_use]
    pub const fn scale(self) -> Vec2 {
        Vec2::new(self.x.scale, self.y.scale)
    }

    /// The offset components as a vector.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> Vec2 {
        Vec2::new(self.x.offset, self.y.offset)
    }
}

impl Add for Dim2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Dim2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Dim2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Dim2 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl AddAssign for Dim2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dim2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Dim2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Dim2 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_length() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        assert_eq!(Vec2::new(f32::NAN, 1.0).normalized(), Vec2::ZERO);

        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0));

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(110.0, 70.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::WHITE.to_rgba32(), 0xFFFF_FFFF);
        assert_eq!(Color::rgba(1.0, 0.0, 0.0, 1.0).to_rgba32(), 0xFF00_00FF);
        assert_eq!(Color::from_rgba32(0xFF00_00FF), Color::rgba(1.0, 0.0, 0.0, 1.0));

        // Out of range components clamp instead of wrapping.
        assert_eq!(Color::rgba(2.0, -1.0, 0.0, 1.0).to_rgba32(), 0xFF00_00FF);
    }

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!(color.g.abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_dim_arithmetic() {
        let a = Dim::new(0.5, 10.0);
        let b = Dim::new(0.25, 5.0);

        assert_eq!(a + b, Dim::new(0.75, 15.0));
        assert_eq!(a - b, Dim::new(0.25, 5.0));
        assert_eq!(a * b, Dim::new(0.125, 50.0));
        assert_eq!(a / b, Dim::new(2.0, 2.0));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);

        assert!((a.resolve(200.0) - 110.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dim2_components() {
        let d = Dim2::new(Dim::new(0.5, 1.0), Dim::new(0.25, 2.0));
        assert_eq!(d.scale(), Vec2::new(0.5, 0.25));
        assert_eq!(d.offset(), Vec2::new(1.0, 2.0));
        assert_eq!(Dim2::FILL * Dim2::rel(0.5, 0.5), Dim2::rel(0.5, 0.5));
    }
}
