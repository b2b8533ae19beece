//! Arrange Input - platform-neutral input events for the reorder engine.
//!
//! Hosts translate their native mouse, touch, pointer and drag events into
//! [`InputEvent`]s, feed them to the engine, and apply the returned
//! [`EventResponse`] (prevent default, stop propagation, drop effect) to
//! the original platform event.

pub mod event;
pub mod response;
pub mod transfer;

pub use event::{EventBatch, InputEvent, InputSource, MouseButton, PointerInput, PointerKind};
pub use response::{EventResponse, ResponseFlags};
pub use transfer::{DataTransfer, DragEffectAllowed, DropEffect};
