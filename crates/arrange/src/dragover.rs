//! Hover handling: decide whether and where the dragged item goes.
//!
//! Every path ends in [`SortableSystem::completed`], which runs the
//! post-insertion bookkeeping (clone visibility, ghost class hand-over,
//! animation) and reports that the container handled the hover.

use crate::error::DomResultExt;
use crate::events::{MoveEvent, MoveVerdict, SortableEventKind};
use crate::group::GroupContext;
use crate::hooks::DirectionQuery;
use crate::options::Direction;
use crate::scheduler::Deferred;
use crate::sortable::SortableId;
use crate::swap::{
    SwapInput, drag_in_row_column, ghost_is_first, ghost_is_last, insert_direction,
    swap_direction,
};
use crate::system::{SILENCE_MS, SortableSystem};
use arrange_core::geometry::Rect;
use arrange_core::math::Vec2;
use arrange_dom::NodeId;
use arrange_dom::query::{child_at, closest, last_matching_child};
use arrange_input::EventResponse;

/// A hover over a container, real or emulated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OverEvent {
    pub position: Vec2,
    /// Element the hover was reported on.
    pub target: NodeId,
    /// Synthesized by the hover poll or the empty-container probe.
    pub emulated: bool,
    pub cancelable: bool,
}

/// Values fixed for the duration of one hover.
#[derive(Debug, Clone, Copy)]
struct OverContext {
    id: SortableId,
    el: NodeId,
    root: NodeId,
    dragged: NodeId,
    /// Draggable under the pointer, or the container itself.
    target: Option<NodeId>,
    event: OverEvent,
    is_owner: bool,
    active: Option<SortableId>,
    from_sortable: Option<SortableId>,
    dragover_bubble: bool,
}

fn side(rect: Rect, vertical: bool) -> f32 {
    if vertical { rect.top } else { rect.left }
}

impl SortableSystem {
    /// Returns true when the container handled the hover.
    pub(crate) fn on_drag_over(
        &mut self,
        id: SortableId,
        event: OverEvent,
        response: &mut EventResponse,
    ) -> bool {
        arrange_core::profiling::profile_function!();
        if self.silent {
            return false;
        }
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let Some(sortable) = self.sortables.get(&id) else {
            return false;
        };

        if !event.emulated && event.cancelable {
            response.prevent_default();
        }

        let el = sortable.element;
        let target = closest(
            &self.document,
            event.target,
            Some(&sortable.selectors.draggable),
            Some(el),
            true,
        );
        let mut ctx = OverContext {
            id,
            el,
            root: session.root,
            dragged: session.dragged,
            target,
            event,
            is_owner: session.origin == id,
            active: self.active,
            from_sortable: session.put_sortable.or(self.active),
            dragover_bubble: sortable.options.dragover_bubble,
        };

        if self.canceled {
            return false;
        }

        let diagonal = target.is_some_and(|t| self.animations.is_animating_diagonally(t));
        if self.document.contains(ctx.dragged, event.target)
            || diagonal
            || sortable.ignore_while_animating == target
        {
            return self.completed(&ctx, false, response);
        }

        self.ignore_next_click = false;

        let Some((revert, vertical)) = self.hover_permission(&ctx) else {
            return false;
        };
        let drag_rect = self.document.client_rect(ctx.dragged);
        if self.canceled {
            return false;
        }

        if revert {
            self.revert(&ctx);
            return self.completed(&ctx, true, response);
        }

        let Some(sortable) = self.sortables.get(&id) else {
            return false;
        };
        let ghost = self.ghost();
        let last = last_matching_child(
            &self.document,
            el,
            Some(&sortable.selectors.draggable),
            ghost,
        );
        let first = child_at(
            &self.document,
            el,
            0,
            &sortable.selectors.draggable,
            ghost,
            None,
        );
        let pointer = event.position;

        let past_last = last.is_none_or(|last| {
            ghost_is_last(pointer, self.document.client_rect(last), vertical)
                && !self.animations.is_animated(last)
        });

        if past_last {
            if last == Some(ctx.dragged) {
                return self.completed(&ctx, false, response);
            }
            if last.is_some() && event.target == el {
                ctx.target = last;
            }
            let target_rect = ctx.target.map(|t| self.document.client_rect(t));
            let verdict = self.on_move(&ctx, drag_rect, target_rect, ctx.target.is_some());
            if verdict != MoveVerdict::Cancel {
                self.capture_hover(&ctx);
                let reference = last.and_then(|last| self.document.next_sibling(last));
                self.document
                    .insert_before(el, ctx.dragged, reference)
                    .or_trace("append dragged");
                self.set_session_parent(Some(el));
                self.changed(id);
                return self.completed(&ctx, true, response);
            }
        } else if let Some(first) =
            first.filter(|&first| ghost_is_first(pointer, self.document.client_rect(first), vertical))
        {
            if first == ctx.dragged {
                return self.completed(&ctx, false, response);
            }
            ctx.target = Some(first);
            let target_rect = self.document.client_rect(first);
            let verdict = self.on_move(&ctx, drag_rect, Some(target_rect), false);
            if verdict != MoveVerdict::Cancel {
                self.capture_hover(&ctx);
                self.document
                    .insert_before(el, ctx.dragged, Some(first))
                    .or_trace("prepend dragged");
                self.set_session_parent(Some(el));
                self.changed(id);
                return self.completed(&ctx, true, response);
            }
        } else if let Some(target) =
            ctx.target.filter(|&t| self.document.parent(t) == Some(el))
        {
            if let Some(handled) = self.swap(&ctx, target, drag_rect, vertical, response) {
                return handled;
            }
        }

        if self.document.contains(el, ctx.dragged) {
            return self.completed(&ctx, false, response);
        }
        false
    }

    /// Whether the container accepts the item, with the revert flag and the
    /// sort axis when it does.
    fn hover_permission(&mut self, ctx: &OverContext) -> Option<(bool, bool)> {
        let active = ctx.active?;
        let session = self.session.as_ref()?;
        let sortable = self.sortables.get(&ctx.id)?;
        if sortable.options.disabled {
            return None;
        }

        let mut revert = false;
        let allowed = if ctx.is_owner {
            revert = !sortable.options.sort && session.parent != Some(ctx.root);
            sortable.options.sort || revert
        } else if session.put_sortable == Some(ctx.id) {
            true
        } else {
            let origin = self.sortables.get(&session.origin)?;
            let group_ctx = GroupContext {
                to: ctx.id,
                from: active,
                dragged: ctx.dragged,
                to_group: sortable.group_name(),
                from_group: origin.group_name(),
            };
            let mode = origin.group.check_pull(&group_ctx);
            let put = mode.is_allowed() && sortable.group.check_put(&group_ctx);
            if let Some(sortable) = self.sortables.get_mut(&ctx.id) {
                sortable.last_put_mode = Some(mode);
            }
            put
        };
        if !allowed {
            return None;
        }

        let sortable = self.sortables.get(&ctx.id)?;
        let vertical = match sortable.options.direction {
            Direction::Vertical => true,
            Direction::Horizontal => false,
            Direction::Auto => sortable
                .hooks
                .direction(&DirectionQuery {
                    document: &self.document,
                    sortable: ctx.id,
                    container: ctx.el,
                    target: ctx.target,
                    dragged: ctx.dragged,
                    pointer: ctx.event.position,
                    ghost: self.ghost(),
                    draggable: &sortable.selectors.draggable,
                })
                .is_vertical(),
        };
        Some((revert, vertical))
    }

    /// Put the item back where it was picked up.
    fn revert(&mut self, ctx: &OverContext) {
        self.set_session_parent(Some(ctx.root));
        self.capture_hover(ctx);
        self.hide_clone(ctx.id);
        if self.canceled {
            return;
        }
        let next = self
            .session
            .as_ref()
            .and_then(|s| s.next)
            .filter(|&next| self.document.parent(next) == Some(ctx.root));
        self.document
            .insert_before(ctx.root, ctx.dragged, next)
            .or_trace("revert dragged");
        tracing::debug!("Reverted {:?} into {:?}", ctx.dragged, ctx.root);
    }

    /// Swap with a sibling under the pointer. `None` when no insertion
    /// happened and the caller should fall through.
    fn swap(
        &mut self,
        ctx: &OverContext,
        target: NodeId,
        drag_rect: Rect,
        vertical: bool,
        response: &mut EventResponse,
    ) -> Option<bool> {
        let sortable = self.sortables.get(&ctx.id)?;
        let (swap_threshold, inverted_threshold, invert_option) = (
            sortable.options.swap_threshold,
            sortable.options.inverted_threshold(),
            sortable.options.invert_swap,
        );
        let target_rect = self.document.client_rect(target);
        let different_level = self.document.parent(ctx.dragged) != Some(ctx.el);
        let different_row_col = !drag_in_row_column(
            self.animations.target_rect(ctx.dragged).unwrap_or(drag_rect),
            self.animations.target_rect(target).unwrap_or(target_rect),
            vertical,
        );
        let drag_index = self.index_of(ctx.dragged, None);
        let direction_hint = insert_direction(drag_index, self.index_of(target, None));

        let session = self.session.as_mut()?;
        let mut target_before_first_swap = None;
        if session.last_target != Some(target) {
            target_before_first_swap = Some(side(target_rect, vertical));
            session.past_first_invert_threshold = false;
            session.circumstantial_invert = (!different_row_col && invert_option) || different_level;
        }

        let decision = swap_direction(&SwapInput {
            pointer: if vertical {
                ctx.event.position.y
            } else {
                ctx.event.position.x
            },
            target_rect,
            vertical,
            swap_threshold: if different_row_col { 1.0 } else { swap_threshold },
            inverted_swap_threshold: inverted_threshold,
            invert_swap: session.circumstantial_invert,
            is_last_target: session.last_target == Some(target),
            target_move_distance: session.target_move_distance,
            past_first_invert_threshold: session.past_first_invert_threshold,
            last_direction: session.last_direction,
            insert_direction: direction_hint,
        });
        session.past_first_invert_threshold = decision.past_first_invert_threshold;
        let direction = decision.direction;

        let mut sibling = None;
        if direction != 0 {
            let siblings = session
                .parent
                .map(|p| self.document.children(p))
                .unwrap_or_default();
            let mut index = drag_index.map_or(-1, |i| i as isize);
            loop {
                index -= isize::from(direction);
                sibling = usize::try_from(index)
                    .ok()
                    .and_then(|i| siblings.get(i).copied());
                let skip = sibling.is_some_and(|s| {
                    Some(s) == session.ghost
                        || self
                            .document
                            .style(s)
                            .is_some_and(|style| style.display == arrange_dom::Display::None)
                });
                if !skip {
                    break;
                }
            }
        }
        if direction == 0 || sibling == Some(target) {
            return Some(self.completed(ctx, false, response));
        }

        session.last_target = Some(target);
        session.last_direction = direction;
        let circumstantial = session.circumstantial_invert;

        let mut after = direction == 1;
        let next_sibling = self.document.next_sibling(target);
        match self.on_move(ctx, drag_rect, Some(target_rect), after) {
            MoveVerdict::Cancel => return None,
            MoveVerdict::InsertAfter => after = true,
            MoveVerdict::InsertBefore => after = false,
            MoveVerdict::Allow => {}
        }

        self.silent = true;
        self.scheduler.schedule(SILENCE_MS, Deferred::Unsilence);
        self.capture_hover(ctx);

        if after && next_sibling.is_none() {
            self.document
                .append_child(ctx.el, ctx.dragged)
                .or_trace("swap dragged");
        } else if let Some(parent) = self.document.parent(target) {
            let reference = if after { next_sibling } else { Some(target) };
            self.document
                .insert_before(parent, ctx.dragged, reference)
                .or_trace("swap dragged");
        }
        let parent = self.document.parent(ctx.dragged);
        self.set_session_parent(parent);

        if let Some(before) = target_before_first_swap.filter(|_| !circumstantial) {
            let moved = (before - side(self.document.client_rect(target), vertical)).abs();
            if let Some(session) = self.session.as_mut() {
                session.target_move_distance = moved;
            }
        }
        tracing::trace!(
            "Swapped {:?} {} {:?} (direction {})",
            ctx.dragged,
            if after { "after" } else { "before" },
            target,
            direction
        );
        self.changed(ctx.id);
        Some(self.completed(ctx, true, response))
    }

    fn set_session_parent(&mut self, parent: Option<NodeId>) {
        if let Some(session) = self.session.as_mut() {
            session.parent = parent;
        }
    }

    /// Snapshot positions in this container and the one the item is
    /// leaving.
    fn capture_hover(&mut self, ctx: &OverContext) {
        self.capture(ctx.id);
        if let Some(from) = ctx.from_sortable.filter(|&from| from != ctx.id) {
            self.capture(from);
        }
    }

    /// Record the item's new index and announce the change.
    fn changed(&mut self, id: SortableId) {
        let Some(dragged) = self.dragged() else {
            return;
        };
        let Some(sortable) = self.sortables.get(&id) else {
            return;
        };
        let new_index = self.index_of(dragged, None);
        let new_draggable_index = self.index_of(dragged, Some(&sortable.selectors.draggable));
        let el = sortable.element;
        if let Some(session) = self.session.as_mut() {
            session.new_index = new_index;
            session.new_draggable_index = new_draggable_index;
        }
        self.emit(SortableEventKind::Change, id, None, Some(el));
    }

    /// Ask the origin container's hooks about a proposed insertion.
    fn on_move(
        &self,
        ctx: &OverContext,
        dragged_rect: Rect,
        target_rect: Option<Rect>,
        will_insert_after: bool,
    ) -> MoveVerdict {
        let Some(origin) = self.session.as_ref().and_then(|s| self.sortables.get(&s.origin)) else {
            return MoveVerdict::Allow;
        };
        let event = MoveEvent {
            document: &self.document,
            from: ctx.root,
            to: ctx.el,
            dragged: ctx.dragged,
            dragged_rect,
            related: ctx.target.unwrap_or(ctx.el),
            related_rect: target_rect.unwrap_or_else(|| self.document.client_rect(ctx.el)),
            will_insert_after,
            pointer: ctx.event.position,
        };
        let verdict = origin.hooks.on_move(&event);
        tracing::trace!("Move {:?} -> {:?}: {:?}", ctx.dragged, event.related, verdict);
        verdict
    }

    /// Shared tail of every hover path. Always reports the hover handled.
    fn completed(&mut self, ctx: &OverContext, insertion: bool, response: &mut EventResponse) -> bool {
        if insertion {
            self.after_insertion(ctx);
        }

        let reset_target = ctx.target.is_some_and(|t| {
            (t == ctx.dragged || t == ctx.el) && !self.animations.is_animated(t)
        });
        if reset_target {
            if let Some(session) = self.session.as_mut() {
                session.last_target = None;
            }
        }

        if !ctx.dragover_bubble && !ctx.event.emulated {
            self.outside_check(ctx.event.target);
            if !insertion {
                self.nearest_empty_insert(ctx.event.position);
            }
            response.stop_propagation();
        }
        true
    }

    fn after_insertion(&mut self, ctx: &OverContext) {
        if let Some(active) = ctx.active {
            if ctx.is_owner {
                self.hide_clone(active);
            } else {
                self.show_clone(active, ctx.id);
            }
        }

        let Some(put_sortable) = self.session.as_ref().map(|s| s.put_sortable) else {
            return;
        };
        if ctx.from_sortable != Some(ctx.id) {
            let previous = put_sortable
                .or(ctx.active)
                .and_then(|p| self.sortables.get(&p))
                .map(|s| s.options.ghost_class.clone());
            let current = self
                .sortables
                .get(&ctx.id)
                .map(|s| s.options.ghost_class.clone());
            if let Some(previous) = previous {
                self.toggle_class(ctx.dragged, &previous, false);
            }
            if let Some(current) = current {
                self.toggle_class(ctx.dragged, &current, true);
            }
        }

        let put_sortable = if put_sortable != Some(ctx.id) && Some(ctx.id) != ctx.active {
            Some(ctx.id)
        } else if Some(ctx.id) == ctx.active {
            None
        } else {
            put_sortable
        };
        if let Some(session) = self.session.as_mut() {
            session.put_sortable = put_sortable;
        }

        if ctx.from_sortable == Some(ctx.id) {
            if let Some(sortable) = self.sortables.get_mut(&ctx.id) {
                sortable.ignore_while_animating = ctx.target;
            }
        }
        if self.animate_all(ctx.id, true) {
            if let Some(sortable) = self.sortables.get_mut(&ctx.id) {
                sortable.ignore_while_animating = None;
            }
        }
        if let Some(from) = ctx.from_sortable.filter(|&from| from != ctx.id) {
            self.animate_all(from, false);
            if let Some(sortable) = self.sortables.get_mut(&from) {
                sortable.ignore_while_animating = None;
            }
        }
    }
}
