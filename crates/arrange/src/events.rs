//! Notification records handed to [`SortableHooks`](crate::SortableHooks).

use crate::group::PullMode;
use crate::sortable::SortableId;
use arrange_core::geometry::Rect;
use arrange_core::math::Vec2;
use arrange_dom::{Document, NodeId};

/// Lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortableEventKind {
    /// An item was picked up and marked chosen.
    Choose,
    /// The chosen item was released.
    Unchoose,
    /// The drag started.
    Start,
    /// The stand-in clone was created.
    Clone,
    /// The item moved to a new position during the drag.
    Change,
    /// A press was rejected by the filter.
    Filter,
    /// The item arrived from another container.
    Add,
    /// The item left for another container.
    Remove,
    /// The item changed position within its container.
    Update,
    /// The container's order changed.
    Sort,
    /// The drag ended.
    End,
}

impl SortableEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            SortableEventKind::Choose => "choose",
            SortableEventKind::Unchoose => "unchoose",
            SortableEventKind::Start => "start",
            SortableEventKind::Clone => "clone",
            SortableEventKind::Change => "change",
            SortableEventKind::Filter => "filter",
            SortableEventKind::Add => "add",
            SortableEventKind::Remove => "remove",
            SortableEventKind::Update => "update",
            SortableEventKind::Sort => "sort",
            SortableEventKind::End => "end",
        }
    }
}

/// One lifecycle notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SortableEvent {
    pub kind: SortableEventKind,
    /// Container whose hooks receive the event.
    pub sortable: SortableId,
    pub item: NodeId,
    pub from: NodeId,
    pub to: NodeId,
    pub clone: Option<NodeId>,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    pub old_draggable_index: Option<usize>,
    pub new_draggable_index: Option<usize>,
    /// How the destination container accepted the item, if it was foreign.
    pub pull_mode: Option<PullMode>,
}

/// Proposed insertion, offered to [`SortableHooks::on_move`](crate::SortableHooks::on_move)
/// before the document is touched.
#[derive(Debug, Clone, Copy)]
pub struct MoveEvent<'a> {
    pub document: &'a Document,
    pub from: NodeId,
    pub to: NodeId,
    pub dragged: NodeId,
    pub dragged_rect: Rect,
    /// Element the item would be placed next to; the container itself
    /// when it is empty.
    pub related: NodeId,
    pub related_rect: Rect,
    pub will_insert_after: bool,
    pub pointer: Vec2,
}

/// Answer to a [`MoveEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveVerdict {
    #[default]
    Allow,
    /// Skip this insertion.
    Cancel,
    /// Insert after the related element whatever the pointer says.
    InsertAfter,
    /// Insert before the related element whatever the pointer says.
    InsertBefore,
}
