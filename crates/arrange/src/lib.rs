//! Arrange - drag-and-drop reordering of list items.
//!
//! A [`SortableSystem`] owns a headless [`Document`] and any number of
//! registered containers. Pressing an item inside a container and moving
//! the pointer reorders it among its siblings or transfers it to another
//! container whose group accepts it. Displaced siblings slide into place
//! with FLIP animations on the document's virtual clock.
//!
//! Two drag modes exist. Native mode follows the platform's HTML5 drag
//! and drop events. Fallback mode builds a floating ghost that follows the
//! pointer and polls what is under it every 50 ms.
//!
//! # Example
//!
//! ```
//! use arrange::{Platform, SortableOptions, SortableSystem};
//! use arrange_dom::{Document, Style};
//! use arrange_input::{InputEvent, PointerInput};
//!
//! let mut doc = Document::new(200.0, 400.0).unwrap();
//! let list = doc.create_element_with("ul", Style::new().width(100.0)).unwrap();
//! doc.append_child(doc.body(), list).unwrap();
//! for id in ["a", "b", "c"] {
//!     let item = doc.create_element_with("li", Style::new().height(40.0)).unwrap();
//!     doc.set_attribute(item, "data-id", id);
//!     doc.append_child(list, item).unwrap();
//! }
//!
//! let mut system = SortableSystem::new(doc, Platform::headless());
//! let sortable = system.create(list, SortableOptions::new()).unwrap();
//!
//! system.handle_event(InputEvent::PointerDown(PointerInput::mouse(10.0, 20.0)));
//! system.handle_event(InputEvent::PointerMove(PointerInput::mouse(10.0, 60.0)));
//! system.advance(0.0);
//! system.handle_event(InputEvent::PointerMove(PointerInput::mouse(10.0, 110.0)));
//! system.advance(50.0);
//! system.handle_event(InputEvent::PointerUp(PointerInput::mouse(10.0, 110.0)));
//!
//! assert_eq!(system.to_array(sortable).unwrap(), ["b", "c", "a"]);
//! ```

pub mod animation;
mod drag;
mod dragover;
mod drop;
pub mod error;
pub mod events;
pub mod group;
pub mod hooks;
pub mod options;
pub mod order;
pub mod platform;
pub mod scheduler;
pub mod session;
pub mod sortable;
pub mod store;
pub mod swap;
pub mod system;

pub use animation::{ElementAnimation, ElementAnimations};
pub use error::{SortableError, SortableResult};
pub use events::{MoveEvent, MoveVerdict, SortableEvent, SortableEventKind};
pub use group::{GroupContext, GroupOptions, Policy, PullMode};
pub use hooks::{DefaultHooks, DirectionQuery, SortableHooks};
pub use options::{Axis, Direction, Filter, FilterContext, SortableOptions};
pub use order::generate_id;
pub use platform::Platform;
pub use scheduler::{Deferred, Scheduler, TimerKey};
pub use session::{DragSession, DragState, Listeners};
pub use sortable::{SortableConfig, SortableId};
pub use store::{MemoryStore, Store, StoreKey};
pub use system::{HOVER_POLL_MS, SortableSystem};

pub use arrange_dom::{Document, NodeId};
pub use arrange_input::{EventResponse, InputEvent, PointerInput};
