//! Math types backed by `glam`.
//!
//! Pointer positions, deltas and 2D affine transforms all use the SIMD
//! friendly `glam` types re-exported here so downstream crates never need a
//! direct `glam` dependency.
//!
//! ```
//! use arrange_core::math::Vec2;
//!
//! let tap = Vec2::new(10.0, 25.0);
//! let pointer = Vec2::new(10.0, 60.0);
//! assert_eq!(pointer - tap, Vec2::new(0.0, 35.0));
//! ```

pub use glam::{Affine2, Mat2, Vec2};
