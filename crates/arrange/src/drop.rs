//! Ending a drag: commit, notify and tear the session down.

use crate::error::DomResultExt;
use crate::events::SortableEventKind;
use crate::group::PullMode;
use crate::scheduler::TimerKey;
use crate::session::Listeners;
use crate::sortable::SortableId;
use crate::system::SortableSystem;
use arrange_dom::NodeId;
use arrange_input::{EventResponse, PointerInput};

impl SortableSystem {
    /// Release, native drop, drag end or abort.
    ///
    /// Cleanup always runs. Events and persistence are skipped when the
    /// drag was canceled.
    pub(crate) fn on_drop(&mut self, input: Option<&PointerInput>, response: &mut EventResponse) {
        let Some(session) = self.session.as_ref() else {
            self.nulling();
            return;
        };
        let (origin, root, dragged, moved, chosen) = (
            session.origin,
            session.root,
            session.dragged,
            session.moved,
            session.chosen,
        );
        let (ghost, clone, put_sortable, old_index, old_draggable_index) = (
            session.ghost,
            session.clone,
            session.put_sortable,
            session.old_index,
            session.old_draggable_index,
        );
        let Some(sortable) = self.sortables.get(&origin) else {
            self.nulling();
            return;
        };
        let drop_bubble = sortable.options.drop_bubble;
        let chosen_class = sortable.options.chosen_class.clone();
        let new_index = self.index_of(dragged, None);
        let new_draggable_index = self.index_of(dragged, Some(&sortable.selectors.draggable));
        let parent = self.document.parent(dragged);

        self.awaiting_drag_started = false;
        for key in [
            TimerKey::HoverLoop,
            TimerKey::DelayedDragStart,
            TimerKey::CloneTick,
            TimerKey::DragStarted,
        ] {
            self.scheduler.cancel(key);
        }
        if let Some(session) = self.session.as_mut() {
            session.circumstantial_invert = false;
            session.past_first_invert_threshold = false;
            session.listeners = Listeners::NONE;
            session.new_index = new_index;
            session.new_draggable_index = new_draggable_index;
        }
        self.set_css(dragged, "transform", "");

        if let Some(input) = input {
            if moved {
                if input.cancelable {
                    response.prevent_default();
                }
                if !drop_bubble {
                    response.stop_propagation();
                }
            }
        }

        if let Some(ghost) = ghost {
            self.animations.forget(ghost);
            self.document.destroy(ghost).or_trace("remove ghost");
        }
        let put_mode = put_sortable
            .and_then(|p| self.sortables.get(&p))
            .and_then(|s| s.last_put_mode);
        let clone_stays = put_sortable.is_some() && put_mode == Some(PullMode::Clone);
        if let Some(clone) = clone {
            if parent == Some(root) || !clone_stays {
                self.animations.forget(clone);
                self.document.destroy(clone).or_trace("remove clone");
            }
        }

        self.document.set_draggable(dragged, false);
        self.set_css(dragged, "will-change", "");
        if moved {
            let ghost_class = put_sortable
                .or(Some(origin))
                .and_then(|p| self.sortables.get(&p))
                .map(|s| s.options.ghost_class.clone());
            if let Some(ghost_class) = ghost_class {
                self.toggle_class(dragged, &ghost_class, false);
            }
        }
        self.toggle_class(dragged, &chosen_class, false);

        if !self.canceled {
            self.commit(origin, parent, chosen, old_index, old_draggable_index);
        }
        self.nulling();
    }

    fn commit(
        &mut self,
        origin: SortableId,
        parent: Option<NodeId>,
        chosen: bool,
        old_index: Option<usize>,
        old_draggable_index: Option<usize>,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let (root, put_sortable, new_index) = (session.root, session.put_sortable, session.new_index);

        if chosen {
            if let Some(mut event) =
                self.session_event(SortableEventKind::Unchoose, origin, None, parent)
            {
                event.new_index = None;
                event.new_draggable_index = None;
                self.notify(&event);
            }
        }

        if parent != Some(root) {
            if new_index.is_some() {
                let destination = parent.and_then(|p| self.get(p));
                if let Some(destination) = destination {
                    self.emit(SortableEventKind::Add, destination, None, parent);
                }
                self.emit(SortableEventKind::Remove, origin, None, parent);
                if let Some(destination) = destination {
                    self.emit(SortableEventKind::Sort, destination, None, parent);
                }
                self.emit(SortableEventKind::Sort, origin, None, parent);
            }
            if let Some(put) = put_sortable {
                if let Err(err) = self.save(put) {
                    tracing::warn!("Could not save order of {:?}: {}", put, err);
                }
            }
        } else if new_index != old_index && new_index.is_some() {
            self.emit(SortableEventKind::Update, origin, None, parent);
            self.emit(SortableEventKind::Sort, origin, None, parent);
        }

        if self.active.is_some() {
            if new_index.is_none() {
                if let Some(session) = self.session.as_mut() {
                    session.new_index = old_index;
                    session.new_draggable_index = old_draggable_index;
                }
            }
            self.emit(SortableEventKind::End, origin, None, parent);
            if let Err(err) = self.save(origin) {
                tracing::warn!("Could not save order of {:?}: {}", origin, err);
            }
        }
    }

    /// Forget the session and restore checkbox state lost while moving
    /// the item.
    pub(crate) fn nulling(&mut self) {
        if let Some(session) = self.session.take() {
            for input in session.saved_checked {
                if self.document.exists(input) {
                    self.document.set_checked(input, true);
                }
            }
            tracing::debug!("Drag session of {:?} cleared", session.dragged);
        }
        self.active = None;
        self.awaiting_drag_started = false;
    }
}
