//! Press, drag start and the fallback ghost.

use crate::dragover::OverEvent;
use crate::error::DomResultExt;
use crate::events::{SortableEvent, SortableEventKind};
use crate::group::PullMode;
use crate::options::{Filter, FilterContext};
use crate::scheduler::{Deferred, TimerKey};
use crate::session::{DragSession, Listeners};
use crate::sortable::SortableId;
use crate::system::{HOVER_POLL_MS, SortableSystem};
use crate::swap::within_insert_threshold;
use arrange_core::geometry::Matrix2D;
use arrange_core::math::Vec2;
use arrange_dom::query::{
    RectOptions, bounding_rect, closest, current_transform_matrix, last_matching_child,
    relative_scroll_offset, window_scrolling_element,
};
use arrange_dom::{NodeId, Position};
use arrange_input::{
    DataTransfer, DragEffectAllowed, EventResponse, InputSource, MouseButton, PointerInput,
};

impl SortableSystem {
    /// A press inside container `id`.
    pub(crate) fn on_tap_start(
        &mut self,
        id: SortableId,
        input: &PointerInput,
        original_target: NodeId,
        response: &mut EventResponse,
    ) {
        if !input.cancelable || self.session.is_some() {
            return;
        }
        let Some(sortable) = self.sortables.get(&id) else {
            return;
        };
        let el = sortable.element;

        let pressed_primary = matches!(input.source, InputSource::Touch)
            || input.button == MouseButton::Left;
        if !pressed_primary || sortable.options.disabled {
            return;
        }
        if self.document.is_content_editable(original_target) {
            return;
        }

        let item = closest(
            &self.document,
            original_target,
            Some(&sortable.selectors.draggable),
            Some(el),
            false,
        );
        if item.is_some_and(|item| self.animations.is_animated(item)) {
            return;
        }

        if let Some(matched) = self.filtered(id, input, item, original_target) {
            let (old_index, old_draggable_index) = match item {
                Some(item) => (
                    self.index_of(item, None),
                    self.index_of(item, Some(&sortable.selectors.draggable)),
                ),
                None => (None, None),
            };
            tracing::debug!("Press on {:?} filtered by {:?}", original_target, id);
            let event = SortableEvent {
                kind: SortableEventKind::Filter,
                sortable: id,
                item: matched,
                from: el,
                to: el,
                clone: None,
                old_index,
                new_index: None,
                old_draggable_index,
                new_draggable_index: None,
                pull_mode: None,
            };
            self.notify(&event);
            if sortable.options.prevent_on_filter && input.cancelable {
                response.prevent_default();
            }
            return;
        }

        if let Some(handle) = &sortable.selectors.handle {
            if closest(&self.document, original_target, Some(handle), Some(el), false).is_none() {
                return;
            }
        }

        if let Some(item) = item {
            self.prepare_drag_start(id, input, item);
        }
    }

    /// The element a press was filtered on, if the filter rejects it.
    fn filtered(
        &self,
        id: SortableId,
        input: &PointerInput,
        item: Option<NodeId>,
        original_target: NodeId,
    ) -> Option<NodeId> {
        let sortable = self.sortables.get(&id)?;
        match &sortable.options.filter {
            None => None,
            Some(Filter::Predicate(predicate)) => {
                let ctx = FilterContext {
                    document: &self.document,
                    sortable: id,
                    container: sortable.element,
                    target: item,
                    original_target,
                    input,
                };
                predicate(&ctx).then_some(item.unwrap_or(original_target))
            }
            Some(Filter::Selector(_)) => sortable.selectors.filter.iter().find_map(|criteria| {
                closest(
                    &self.document,
                    original_target,
                    Some(criteria),
                    Some(sortable.element),
                    false,
                )
            }),
        }
    }

    fn prepare_drag_start(&mut self, id: SortableId, input: &PointerInput, item: NodeId) {
        let Some(sortable) = self.sortables.get(&id) else {
            return;
        };
        let el = sortable.element;
        if self.document.parent(item) != Some(el) {
            return;
        }
        self.canceled = false;

        let rect = self.document.client_rect(item);
        let mut session = DragSession::new(id, el, item);
        session.next = self.document.next_sibling(item);
        session.tap = input.position;
        session.tap_distance = input.position - rect.origin();
        session.touch = input.is_touch();
        session.old_index = self.index_of(item, None);
        session.old_draggable_index = self.index_of(item, Some(&sortable.selectors.draggable));
        session.saved_checked = self
            .document
            .descendants(el)
            .into_iter()
            .filter(|&node| self.document.tag(node) == Some("input") && self.document.checked(node))
            .collect();
        session.listeners = Listeners::NEAREST_EMPTY | Listeners::DROP_ON_UP;

        let delayed = sortable.options.delay > 0
            && (!sortable.options.delay_on_touch_only || session.touch);
        let delay = f64::from(sortable.options.delay);
        let ignored: Vec<NodeId> = if sortable.selectors.ignore.is_empty() {
            Vec::new()
        } else {
            self.document
                .descendants(item)
                .into_iter()
                .filter(|&node| sortable.selectors.ignore.matches(&self.document, node, Some(item)))
                .collect()
        };

        tracing::debug!(
            "Pressed {:?} in {:?} at index {:?}",
            item,
            id,
            session.old_index
        );
        self.session = Some(session);
        if let Some(sortable) = self.sortables.get_mut(&id) {
            sortable.last_pointer = input.position;
        }

        self.set_css(item, "will-change", "all");
        for node in ignored {
            self.document.set_draggable(node, false);
        }

        if delayed {
            if self.canceled {
                self.on_drop(None, &mut EventResponse::ignored());
                return;
            }
            if let Some(session) = self.session.as_mut() {
                session.listeners |= Listeners::DELAYED;
            }
            self.scheduler.schedule(delay, Deferred::DelayedDragStart);
        } else {
            self.drag_start_now(id);
        }
    }

    /// The press is confirmed: bind drag listeners and mark the item chosen.
    pub(crate) fn drag_start_now(&mut self, id: SortableId) {
        if self.canceled {
            self.on_drop(None, &mut EventResponse::ignored());
            return;
        }
        let Some(native) = self.sortables.get(&id).map(|s| s.native) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.listeners.remove(Listeners::DELAYED);
        self.scheduler.cancel(TimerKey::DelayedDragStart);
        let dragged = session.dragged;

        if native {
            self.document.set_draggable(dragged, true);
        }
        self.trigger_drag_start(id);

        let chosen_class = self
            .sortables
            .get(&id)
            .map(|s| s.options.chosen_class.clone())
            .unwrap_or_default();
        self.toggle_class(dragged, &chosen_class, true);
        if let Some(session) = self.session.as_mut() {
            session.chosen = true;
        }
        self.emit(SortableEventKind::Choose, id, None, None);
    }

    fn trigger_drag_start(&mut self, id: SortableId) {
        let native = self.sortables.get(&id).is_some_and(|s| s.native);
        if let Some(session) = self.session.as_mut() {
            session.listeners |= if !native || session.touch {
                Listeners::POINTER_MOVE
            } else {
                Listeners::NATIVE_DRAG
            };
        }
        self.document.clear_selection().or_trace("clear selection");
    }

    /// Movement during the press-and-hold delay.
    pub(crate) fn delayed_drag_move(&mut self, input: &PointerInput) {
        let Some(origin) = self.session.as_ref().map(|s| s.origin) else {
            return;
        };
        let Some(sortable) = self.sortables.get(&origin) else {
            return;
        };
        let ratio = if sortable.native {
            self.platform.device_pixel_ratio.max(1.0)
        } else {
            1.0
        };
        let threshold = (sortable.touch_start_threshold as f32 / ratio).floor();
        let delta = (input.position - sortable.last_pointer).abs();
        if delta.x.max(delta.y) >= threshold {
            tracing::trace!("Moved {:?} during delay, start abandoned", delta);
            self.disable_delayed_drag();
        }
    }

    pub(crate) fn disable_delayed_drag(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.listeners.remove(Listeners::DELAYED);
        let dragged = session.dragged;
        self.document.set_draggable(dragged, false);
        self.scheduler.cancel(TimerKey::DelayedDragStart);
    }

    /// Fallback pointer move: start the drag once past the tolerance and
    /// move the ghost along.
    pub(crate) fn on_pointer_drag_move(&mut self, input: &PointerInput, response: &mut EventResponse) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(sortable) = self.sortables.get(&session.origin) else {
            return;
        };
        let offset = sortable.options.fallback_offset;
        let tolerance = sortable.options.fallback_tolerance as f32;
        let last_pointer = sortable.last_pointer;

        let ghost_matrix = session
            .ghost
            .and_then(|ghost| current_transform_matrix(&self.document, ghost, true));
        let scale = ghost_matrix
            .map(|m| Vec2::new(m.a, m.d))
            .filter(|s| s.x != 0.0 && s.y != 0.0)
            .unwrap_or(Vec2::ONE);
        let scroll = match session.ghost_relative_parent {
            Some(parent) if self.platform.position_ghost_absolutely => {
                relative_scroll_offset(&self.document, parent)
                    - session.ghost_relative_parent_initial_scroll
            }
            _ => Vec2::ZERO,
        };
        let delta = (input.position - session.tap + offset) / scale + scroll / scale;

        if self.active.is_none() && !self.awaiting_drag_started {
            let moved = (input.position - last_pointer).abs();
            if tolerance > 0.0 && moved.x.max(moved.y) < tolerance {
                return;
            }
            self.on_drag_start(Some(input), true, response);
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(ghost) = session.ghost {
            let matrix = match ghost_matrix {
                Some(mut m) => {
                    m.e += delta.x - session.last_delta.x;
                    m.f += delta.y - session.last_delta.y;
                    m
                }
                None => Matrix2D::translation(delta.x, delta.y),
            };
            session.last_delta = delta;
            session.pointer = Some(input.position);
            self.document
                .set_transform(ghost, Some(matrix))
                .or_trace("move ghost");
        }

        if input.cancelable {
            response.prevent_default();
        }
    }

    /// Drag start, native or fallback.
    pub(crate) fn on_drag_start(
        &mut self,
        input: Option<&PointerInput>,
        fallback: bool,
        response: &mut EventResponse,
    ) {
        if self.canceled {
            self.on_drop(None, response);
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let (origin, dragged) = (session.origin, session.dragged);
        let Some(sortable) = self.sortables.get(&origin) else {
            return;
        };
        let chosen_class = sortable.options.chosen_class.clone();
        let drag_class = sortable.options.drag_class.clone();

        match self.document.clone_subtree(dragged) {
            Ok(clone) => {
                self.document.remove_attribute(clone, "id");
                self.document.set_draggable(clone, false);
                self.set_css(clone, "will-change", "");
                if let Some(session) = self.session.as_mut() {
                    session.clone = Some(clone);
                }
                self.hide_clone(origin);
                self.toggle_class(clone, &chosen_class, false);
                self.emit(SortableEventKind::Clone, origin, None, None);
            }
            Err(err) => tracing::warn!("Could not clone dragged item: {}", err),
        }
        self.scheduler.schedule(0.0, Deferred::CloneTick);

        if !fallback {
            self.toggle_class(dragged, &drag_class, true);
        }

        if fallback {
            self.ignore_next_click = true;
            self.scheduler
                .schedule_repeating(HOVER_POLL_MS, Deferred::EmulateDragOver);
        } else {
            if let Some(session) = self.session.as_mut() {
                session.listeners.remove(Listeners::DROP_ON_UP);
                session.listeners |= Listeners::DOCUMENT_DROP;
            }
            if input.is_some() {
                let mut transfer = DataTransfer::new();
                transfer.effect_allowed = DragEffectAllowed::Move;
                let text = self.document.text_content(dragged);
                if let Some(sortable) = self.sortables.get(&origin) {
                    sortable.hooks.set_data(&mut transfer, &text);
                }
                response.data_transfer = Some(transfer);
            }
            self.set_css(dragged, "transform", "translateZ(0)");
        }

        self.awaiting_drag_started = true;
        self.scheduler
            .schedule(0.0, Deferred::DragStarted { fallback });
        if let Some(session) = self.session.as_mut() {
            session.moved = true;
        }
        tracing::debug!("Drag of {:?} starting (fallback: {})", dragged, fallback);
    }

    /// Deferred half of the clone setup.
    pub(crate) fn clone_tick(&mut self) {
        if self.canceled {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let (origin, root, dragged, clone) =
            (session.origin, session.root, session.dragged, session.clone);
        let keep_clone = self
            .sortables
            .get(&origin)
            .is_some_and(|s| !s.options.remove_clone_on_hide);
        if let Some(clone) = clone {
            if keep_clone && self.document.parent(dragged) == Some(root) {
                self.document
                    .insert_before(root, clone, Some(dragged))
                    .or_trace("insert clone");
            }
        }
        self.hide_clone(origin);
    }

    /// Hide the clone; `id` decides whether it also leaves the document.
    pub(crate) fn hide_clone(&mut self, id: SortableId) {
        let remove = self
            .sortables
            .get(&id)
            .is_some_and(|s| s.options.remove_clone_on_hide);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.clone_hidden || self.canceled {
            return;
        }
        let Some(clone) = session.clone else {
            return;
        };
        session.clone_hidden = true;
        self.set_css(clone, "display", "none");
        if remove && self.document.parent(clone).is_some() {
            self.document.detach(clone).or_trace("detach clone");
        }
    }

    /// Show the clone in the origin list while `put` holds the item as a
    /// copy.
    pub(crate) fn show_clone(&mut self, active: SortableId, put: SortableId) {
        let put_mode = self.sortables.get(&put).and_then(|s| s.last_put_mode);
        if put_mode != Some(PullMode::Clone) {
            self.hide_clone(active);
            return;
        }
        let revert_clone = self
            .sortables
            .get(&active)
            .is_some_and(|s| s.group.revert_clone);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.clone_hidden || self.canceled {
            return;
        }
        let Some(clone) = session.clone else {
            return;
        };
        let (root, dragged, next) = (session.root, session.dragged, session.next);
        session.clone_hidden = false;

        let reference = if self.document.parent(dragged) == Some(root) && !revert_clone {
            Some(dragged)
        } else {
            next.filter(|&next| self.document.parent(next) == Some(root))
        };
        self.document
            .insert_before(root, clone, reference)
            .or_trace("show clone");
        self.set_css(clone, "display", "");
    }

    /// The drag is confirmed: apply the ghost class and, in fallback mode,
    /// build the floating ghost.
    pub(crate) fn drag_started(&mut self, fallback: bool) {
        self.awaiting_drag_started = false;
        if self.session.is_none() {
            self.nulling();
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let origin = session.origin;
        let dragged = session.dragged;
        let Some(sortable) = self.sortables.get(&origin) else {
            return;
        };
        if sortable.native {
            session.listeners |= Listeners::OUTSIDE_CHECK;
        }
        let drag_class = sortable.options.drag_class.clone();
        let ghost_class = sortable.options.ghost_class.clone();

        if !fallback {
            self.toggle_class(dragged, &drag_class, false);
        }
        self.toggle_class(dragged, &ghost_class, true);
        self.active = Some(origin);
        tracing::debug!("Drag of {:?} started from {:?}", dragged, origin);
        self.emit(SortableEventKind::Start, origin, None, None);

        if fallback {
            self.append_ghost();
        }
    }

    fn append_ghost(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.ghost.is_some() {
            return;
        }
        let (origin, root, dragged, tap_distance) =
            (session.origin, session.root, session.dragged, session.tap_distance);
        let Some(sortable) = self.sortables.get(&origin) else {
            return;
        };
        let options = &sortable.options;
        let classes = (
            options.ghost_class.clone(),
            options.fallback_class.clone(),
            options.drag_class.clone(),
        );
        let container = if options.fallback_on_body {
            self.document.body()
        } else {
            root
        };
        let absolute = self.platform.position_ghost_absolutely;

        let mut rect = bounding_rect(
            &self.document,
            dragged,
            RectOptions {
                relative_to_containing_block: true,
                relative_to_non_static_parent: absolute,
                undo_scale: true,
                container: Some(container),
            },
        );

        let mut relative_parent = None;
        if absolute {
            let mut parent = Some(container);
            while let Some(node) = parent {
                let positioned = self
                    .document
                    .style(node)
                    .is_some_and(|s| s.position != Position::Static || s.transform.is_some());
                if positioned {
                    break;
                }
                parent = self.document.parent(node);
            }
            let scroller = window_scrolling_element(&self.document);
            let parent = match parent {
                Some(node) if node != scroller => {
                    let scroll = self.document.scroll_offset(node);
                    rect.top += scroll.y;
                    rect.left += scroll.x;
                    node
                }
                _ => scroller,
            };
            relative_parent = Some(parent);
        }

        let ghost = match self.document.clone_subtree(dragged) {
            Ok(ghost) => ghost,
            Err(err) => {
                tracing::warn!("Could not build drag ghost: {}", err);
                return;
            }
        };
        self.toggle_class(ghost, &classes.0, false);
        self.toggle_class(ghost, &classes.1, true);
        self.toggle_class(ghost, &classes.2, true);

        let styles = [
            ("transition", String::new()),
            ("transform", String::new()),
            ("box-sizing", "border-box".to_string()),
            ("margin", "0".to_string()),
            ("top", format!("{}px", rect.top)),
            ("left", format!("{}px", rect.left)),
            ("width", format!("{}px", rect.width)),
            ("height", format!("{}px", rect.height)),
            ("opacity", "0.8".to_string()),
            ("position", if absolute { "absolute" } else { "fixed" }.to_string()),
            ("z-index", "100000".to_string()),
            ("pointer-events", "none".to_string()),
        ];
        for (property, value) in &styles {
            self.set_css(ghost, property, value);
        }
        self.document
            .append_child(container, ghost)
            .or_trace("append ghost");

        let (width, height) = (rect.width.trunc(), rect.height.trunc());
        if width > 0.0 && height > 0.0 {
            let origin = format!(
                "{}% {}%",
                tap_distance.x / width * 100.0,
                tap_distance.y / height * 100.0
            );
            self.set_css(ghost, "transform-origin", &origin);
        }

        let initial_scroll = relative_parent
            .map(|parent| relative_scroll_offset(&self.document, parent))
            .unwrap_or(Vec2::ZERO);
        if let Some(session) = self.session.as_mut() {
            session.ghost = Some(ghost);
            session.ghost_relative_parent = relative_parent;
            session.ghost_relative_parent_initial_scroll = initial_scroll;
        }
        tracing::trace!("Ghost {:?} appended to {:?} at {:?}", ghost, container, rect);
    }

    /// Fallback hover poll: hit-test under the last pointer position and
    /// feed the result through the containers on the path.
    pub(crate) fn emulate_drag_over(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(pointer) = session.pointer else {
            return;
        };
        let (origin, ghost) = (session.origin, session.ghost);
        let bubble = match self.sortables.get_mut(&origin) {
            Some(sortable) => {
                sortable.last_pointer = pointer;
                sortable.options.dragover_bubble
            }
            None => false,
        };

        let hide_ghost = !self.platform.css_pointer_events;
        if let Some(ghost) = ghost.filter(|_| hide_ghost) {
            self.set_css(ghost, "display", "none");
        }

        let hit = self.document.element_from_point(pointer);
        if let Some(hit) = hit {
            self.outside_check(hit);
        }

        let mut target = hit;
        let mut parent = hit;
        while let (Some(node), Some(current)) = (parent, target) {
            if self.session.is_none() {
                break;
            }
            if let Some(&id) = self.by_element.get(&node) {
                let over = OverEvent {
                    position: pointer,
                    target: current,
                    emulated: true,
                    cancelable: false,
                };
                let handled = self.on_drag_over(id, over, &mut EventResponse::ignored());
                if handled && !bubble {
                    break;
                }
            }
            target = Some(node);
            parent = self.document.parent(node);
        }

        if let Some(ghost) = ghost.filter(|_| hide_ghost) {
            self.set_css(ghost, "display", "");
        }
    }

    /// Offer the item to the first registered container that is empty and
    /// within its insert threshold of `position`.
    pub(crate) fn nearest_empty_insert(&mut self, position: Vec2) {
        let Some(ghost) = self.session.as_ref().map(|s| s.ghost) else {
            return;
        };
        let nearest = self.sortables.values().find_map(|sortable| {
            let threshold = sortable.options.empty_insert_threshold;
            if threshold <= 0.0
                || last_matching_child(&self.document, sortable.element, None, ghost).is_some()
            {
                return None;
            }
            let rect = self.document.client_rect(sortable.element);
            within_insert_threshold(position, rect, threshold)
                .then_some((sortable.id, sortable.element))
        });
        if let Some((id, element)) = nearest {
            tracing::trace!("Nearest empty container {:?}", id);
            let over = OverEvent {
                position,
                target: element,
                emulated: true,
                cancelable: false,
            };
            self.on_drag_over(id, over, &mut EventResponse::ignored());
        }
    }
}
