//! Client-space rectangles and 2D affine matrices.

use crate::math::{Affine2, Vec2};

/// An axis-aligned rectangle in client (viewport) coordinates.
///
/// Stored as origin plus extent; `right` and `bottom` are derived.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Build a rectangle from its four edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            left,
            width: right - left,
            height: bottom - top,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Grow every edge outward by `amount` pixels.
    pub fn inflate(&self, amount: f32) -> Self {
        Self::from_edges(
            self.left - amount,
            self.top - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            left: self.left + delta.x,
            top: self.top + delta.y,
            ..*self
        }
    }

    /// Equality after rounding each component to the nearest whole pixel.
    ///
    /// Sub-pixel noise from transforms should never register as movement.
    pub fn same_pixels(&self, other: &Rect) -> bool {
        self.top.round() == other.top.round()
            && self.left.round() == other.left.round()
            && self.height.round() == other.height.round()
            && self.width.round() == other.width.round()
    }

    /// Bounding box of this rectangle after `matrix` is applied about `origin`.
    pub fn transformed(&self, matrix: &Matrix2D, origin: Vec2) -> Self {
        let corners = [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right(), self.top),
            Vec2::new(self.left, self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ];
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for corner in corners {
            let mapped = matrix.transform_point(corner - origin) + origin;
            min = min.min(mapped);
            max = max.max(mapped);
        }
        Self::from_edges(min.x, min.y, max.x, max.y)
    }
}

/// A 2D affine transform in CSS `matrix(a, b, c, d, e, f)` order.
///
/// `a`/`d` carry scale, `b`/`c` skew and `e`/`f` translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2D {
    pub const IDENTITY: Matrix2D = Matrix2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(x: f32, y: f32) -> Self {
        Self {
            a: x,
            d: y,
            ..Self::IDENTITY
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn translation_part(&self) -> Vec2 {
        Vec2::new(self.e, self.f)
    }

    fn to_affine(self) -> Affine2 {
        Affine2::from_cols_array(&[self.a, self.b, self.c, self.d, self.e, self.f])
    }

    fn from_affine(affine: Affine2) -> Self {
        let [a, b, c, d, e, f] = affine.to_cols_array();
        Self { a, b, c, d, e, f }
    }

    /// Compose `self` then `other`, matching the CSS list `"self other"`.
    pub fn then(&self, other: &Matrix2D) -> Self {
        Self::from_affine(self.to_affine() * other.to_affine())
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_affine().transform_point2(point)
    }

    /// `None` when the matrix is singular (e.g. `scale(0)`).
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        Some(Self::from_affine(self.to_affine().inverse()))
    }

    /// Component-wise interpolation, used by transform transitions.
    pub fn lerp(&self, to: &Matrix2D, t: f32) -> Self {
        let mix = |from: f32, to: f32| from + (to - from) * t;
        Self {
            a: mix(self.a, to.a),
            b: mix(self.b, to.b),
            c: mix(self.c, to.c),
            d: mix(self.d, to.d),
            e: mix(self.e, to.e),
            f: mix(self.f, to.f),
        }
    }

    /// Serialise as a CSS `matrix()` function.
    pub fn to_css(&self) -> String {
        format!(
            "matrix({},{},{},{},{},{})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(Rect::from_edges(10.0, 20.0, 110.0, 60.0), rect);
    }

    #[test]
    fn test_same_pixels_ignores_subpixel_noise() {
        let a = Rect::new(10.2, 20.4, 100.0, 40.0);
        let b = Rect::new(9.8, 19.6, 100.3, 39.9);
        assert!(a.same_pixels(&b));
        assert!(!a.same_pixels(&a.translate(Vec2::new(0.0, 1.0))));
    }

    #[test]
    fn test_matrix_composition() {
        let m = Matrix2D::translation(10.0, 5.0).then(&Matrix2D::scale(2.0, 2.0));
        // translate(10,5) scale(2): scale first, then translate
        assert_eq!(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 7.0));
        assert_eq!(m.a, 2.0);
        assert_eq!(m.e, 10.0);
    }

    #[test]
    fn test_matrix_inverse() {
        let m = Matrix2D::new(2.0, 0.0, 0.0, 4.0, 6.0, 8.0);
        let inv = m.inverse().unwrap();
        let p = inv.transform_point(m.transform_point(Vec2::new(3.0, -2.0)));
        assert!((p - Vec2::new(3.0, -2.0)).length() < 1e-4);
        assert!(Matrix2D::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_rect_transformed_about_origin() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let scaled = rect.transformed(&Matrix2D::scale(2.0, 2.0), rect.center());
        assert_eq!(scaled, Rect::new(-5.0, -5.0, 20.0, 20.0));
    }
}
