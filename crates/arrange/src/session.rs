//! The single in-flight drag.

use crate::sortable::SortableId;
use arrange_core::math::Vec2;
use arrange_dom::NodeId;
use bitflags::bitflags;

bitflags! {
    /// Document-level listeners a browser implementation would have bound
    /// for the current session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Listeners: u8 {
        const NONE = 0;
        /// Moves and drag-overs probe for nearby empty containers.
        const NEAREST_EMPTY  = 0b0000_0001;
        /// Releasing the pointer drops.
        const DROP_ON_UP     = 0b0000_0010;
        /// Release or movement may abandon the press-and-hold delay.
        const DELAYED        = 0b0000_0100;
        /// Pointer moves drive the fallback ghost.
        const POINTER_MOVE   = 0b0000_1000;
        /// Native `dragstart` and `dragend` are handled.
        const NATIVE_DRAG    = 0b0001_0000;
        /// Native `drop` on the document drops.
        const DOCUMENT_DROP  = 0b0010_0000;
        /// Native `dragover` outside the container resets hysteresis.
        const OUTSIDE_CHECK  = 0b0100_0000;
    }
}

impl Listeners {
    pub fn is_listening(&self, listeners: Listeners) -> bool {
        self.intersects(listeners)
    }
}

/// Where a drag is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// An item is pressed but the drag has not started.
    PendingStart,
    Dragging,
}

/// Everything that lives exactly as long as one drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Container the item was picked up from.
    pub origin: SortableId,
    pub root: NodeId,
    pub dragged: NodeId,
    /// Current parent of the dragged item.
    pub parent: Option<NodeId>,
    /// Sibling the item was picked up in front of, for reverts.
    pub next: Option<NodeId>,
    /// Foreign container currently holding the item.
    pub put_sortable: Option<SortableId>,
    pub clone: Option<NodeId>,
    pub clone_hidden: bool,
    pub ghost: Option<NodeId>,
    pub ghost_relative_parent: Option<NodeId>,
    pub ghost_relative_parent_initial_scroll: Vec2,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    pub old_draggable_index: Option<usize>,
    pub new_draggable_index: Option<usize>,
    /// Pointer at press.
    pub tap: Vec2,
    /// Press position relative to the item's top left corner.
    pub tap_distance: Vec2,
    /// Latest pointer seen by the fallback move handler.
    pub pointer: Option<Vec2>,
    /// Ghost translation applied so far.
    pub last_delta: Vec2,
    pub touch: bool,
    pub moved: bool,
    /// The chosen class was applied and `Choose` sent.
    pub chosen: bool,
    pub last_target: Option<NodeId>,
    pub last_direction: i8,
    pub past_first_invert_threshold: bool,
    pub circumstantial_invert: bool,
    pub target_move_distance: f32,
    /// Inputs that were checked at press time.
    pub saved_checked: Vec<NodeId>,
    pub listeners: Listeners,
}

impl DragSession {
    pub fn new(origin: SortableId, root: NodeId, dragged: NodeId) -> Self {
        Self {
            origin,
            root,
            dragged,
            parent: Some(root),
            next: None,
            put_sortable: None,
            clone: None,
            clone_hidden: false,
            ghost: None,
            ghost_relative_parent: None,
            ghost_relative_parent_initial_scroll: Vec2::ZERO,
            old_index: None,
            new_index: None,
            old_draggable_index: None,
            new_draggable_index: None,
            tap: Vec2::ZERO,
            tap_distance: Vec2::ZERO,
            pointer: None,
            last_delta: Vec2::ZERO,
            touch: false,
            moved: false,
            chosen: false,
            last_target: None,
            last_direction: 0,
            past_first_invert_threshold: false,
            circumstantial_invert: false,
            target_move_distance: 0.0,
            saved_checked: Vec::new(),
            listeners: Listeners::NONE,
        }
    }
}
