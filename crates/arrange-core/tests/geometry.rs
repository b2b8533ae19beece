//! Geometry helper tests.
//!
//! These pin the rectangle and matrix behaviour that drag hit-testing and
//! FLIP animation rely on.

use arrange_core::geometry::{Matrix2D, Rect};
use arrange_core::math::Vec2;

#[test]
fn test_inflate_for_empty_insert_threshold() {
    let rect = Rect::new(300.0, 50.0, 200.0, 0.0);
    let zone = rect.inflate(5.0);

    assert!(zone.contains(Vec2::new(298.0, 47.0)));
    assert!(zone.contains(Vec2::new(505.0, 55.0)));
    assert!(!zone.contains(Vec2::new(294.0, 50.0)));
}

#[test]
fn test_css_round_trip_text() {
    let m = Matrix2D::new(1.0, 0.0, 0.0, 1.0, 12.5, -3.0);
    assert_eq!(m.to_css(), "matrix(1,0,0,1,12.5,-3)");
}

#[test]
fn test_lerp_translation() {
    let from = Matrix2D::translation(0.0, 40.0);
    let to = Matrix2D::IDENTITY;

    let half = from.lerp(&to, 0.5);
    assert_eq!(half.translation_part(), Vec2::new(0.0, 20.0));
    assert!(from.lerp(&to, 1.0).is_identity());
}

#[test]
fn test_translation_moves_rect() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    let moved = rect.transformed(&Matrix2D::translation(5.0, 7.0), rect.origin());

    assert_eq!(moved, Rect::new(5.0, 7.0, 10.0, 10.0));
    assert!(!moved.same_pixels(&rect));
}
