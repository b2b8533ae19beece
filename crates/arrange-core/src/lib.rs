//! Arrange Core
//!
//! Leaf utilities shared by the Arrange crates: fast collections, math
//! re-exports, client-space geometry, logging and profiling bootstrap.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
