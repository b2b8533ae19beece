//! Test utilities for Arrange.
//!
//! - [`ListFixture`] builds documents with side-by-side lists of fixed-size
//!   items, each carrying a `data-id` and matching text.
//! - [`RecordingHooks`] logs every lifecycle event and lets a test choose
//!   the answer to move checks.
//! - [`SharedStore`] is a [`MemoryStore`](arrange::MemoryStore) a test can
//!   keep inspecting after handing it to a container.
//! - [`Pointer`] scripts presses, moves and releases against a system.
//!
//! Handles use `Arc<parking_lot::Mutex<_>>` so clones given to the engine
//! and the copy kept by the test see the same state.
//!
//! # Example
//!
//! ```rust
//! use arrange::{Platform, SortableConfig, SortableOptions, SortableSystem};
//! use arrange_test_utils::{ListFixture, Pointer, RecordingHooks};
//!
//! let fixture = ListFixture::new().list("ul", &["a", "b", "c"]);
//! let (doc, lists) = fixture.build();
//! let mut system = SortableSystem::new(doc, Platform::headless());
//! let hooks = RecordingHooks::new();
//! let id = system
//!     .create(lists[0].element, SortableConfig::new(SortableOptions::new()).with_hooks(hooks.clone()))
//!     .unwrap();
//!
//! Pointer::mouse().fallback_drag(&mut system, lists[0].center(0), lists[0].center(2));
//! assert_eq!(system.to_array(id).unwrap(), ["b", "c", "a"]);
//! assert!(hooks.kinds().contains(&arrange::SortableEventKind::End));
//! ```

pub mod fixture;
pub mod hooks;
pub mod pointer;
pub mod store;

pub use fixture::{ITEM_HEIGHT, LIST_GAP, LIST_WIDTH, List, ListFixture};
pub use hooks::{MoveRecord, RecordingHooks};
pub use pointer::Pointer;
pub use store::SharedStore;

/// Install a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    arrange_core::logging::try_init_with_filter("arrange=debug");
}
