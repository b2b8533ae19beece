//! Strategy hooks a container can override.

use crate::events::{MoveEvent, MoveVerdict, SortableEvent};
use crate::options::Axis;
use crate::sortable::SortableId;
use crate::swap::detect_direction;
use arrange_core::math::Vec2;
use arrange_dom::{Document, NodeId, SelectorList};
use arrange_input::DataTransfer;

/// Context for deciding the sort axis of a container.
pub struct DirectionQuery<'a> {
    pub document: &'a Document,
    pub sortable: SortableId,
    pub container: NodeId,
    /// Element under the pointer, if any.
    pub target: Option<NodeId>,
    pub dragged: NodeId,
    pub pointer: Vec2,
    pub ghost: Option<NodeId>,
    pub(crate) draggable: &'a SelectorList,
}

impl DirectionQuery<'_> {
    /// The axis implied by the container's layout.
    pub fn detect(&self) -> Axis {
        detect_direction(
            self.document,
            self.container,
            self.draggable,
            self.ghost,
            Some(self.dragged),
        )
    }
}

/// Per-container callbacks. Every method has a working default.
pub trait SortableHooks {
    /// Sort axis used when the options leave it on `Auto`.
    fn direction(&self, query: &DirectionQuery<'_>) -> Axis {
        query.detect()
    }

    /// Fill the native drag payload.
    fn set_data(&self, transfer: &mut DataTransfer, dragged_text: &str) {
        transfer.set_data("Text", dragged_text);
    }

    /// Veto or redirect an insertion.
    fn on_move(&self, event: &MoveEvent<'_>) -> MoveVerdict {
        let _ = event;
        MoveVerdict::Allow
    }

    fn on_event(&self, event: &SortableEvent) {
        let _ = event;
    }
}

/// Hooks that keep every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl SortableHooks for DefaultHooks {}
