//! The coordinator that owns the document, every registered container and
//! the single drag session.
//!
//! Hosts feed platform input through [`SortableSystem::handle_event`] and
//! drive timers with [`SortableSystem::advance`]. Event routing mirrors
//! the listeners a browser implementation binds: presses bubble through
//! registered containers, moves and releases go to the document-level
//! handlers of the current session, native drag-overs bubble through
//! containers in native mode.

use crate::animation::{AnimationContext, ElementAnimations};
use crate::error::{DomResultExt, SortableError, SortableResult};
use crate::events::{SortableEvent, SortableEventKind};
use crate::options::SortableOptions;
use crate::order::generate_id;
use crate::platform::Platform;
use crate::scheduler::{Deferred, Scheduler};
use crate::session::{DragSession, DragState, Listeners};
use crate::sortable::{Sortable, SortableConfig, SortableId};
use arrange_core::alloc::HashMap;
use arrange_core::profiling::{profile_function, profile_scope};
use arrange_dom::query::closest;
use arrange_dom::{Document, NodeId, SelectorList};
use arrange_input::{DropEffect, EventBatch, EventResponse, InputEvent, PointerInput};
use indexmap::IndexMap;

/// Interval of the fallback hover poll.
pub const HOVER_POLL_MS: f64 = 50.0;
/// Window after an insertion during which drag-overs are ignored.
pub(crate) const SILENCE_MS: f64 = 30.0;

/// Drag-and-drop reordering for every registered container of one
/// document.
pub struct SortableSystem {
    pub(crate) document: Document,
    pub(crate) platform: Platform,
    pub(crate) scheduler: Scheduler,
    /// Registration order matters for empty-container detection.
    pub(crate) sortables: IndexMap<SortableId, Sortable>,
    pub(crate) by_element: HashMap<NodeId, SortableId>,
    next_id: usize,
    pub(crate) animations: ElementAnimations,
    pub(crate) session: Option<DragSession>,
    /// Container that started the current drag, once it has started.
    pub(crate) active: Option<SortableId>,
    pub(crate) awaiting_drag_started: bool,
    pub(crate) ignore_next_click: bool,
    pub(crate) silent: bool,
    pub(crate) canceled: bool,
}

impl SortableSystem {
    pub fn new(document: Document, platform: Platform) -> Self {
        Self {
            document,
            platform,
            scheduler: Scheduler::new(),
            sortables: IndexMap::new(),
            by_element: HashMap::new(),
            next_id: 0,
            animations: ElementAnimations::default(),
            session: None,
            active: None,
            awaiting_drag_started: false,
            ignore_next_click: false,
            silent: false,
            canceled: false,
        }
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Make `element` a sortable container.
    ///
    /// A stored order, if the config carries a store that has one, is
    /// applied right away without animation.
    pub fn create(
        &mut self,
        element: NodeId,
        config: impl Into<SortableConfig>,
    ) -> SortableResult<SortableId> {
        let Some(tag) = self.document.tag(element).map(str::to_string) else {
            return Err(SortableError::NotAnElement(element));
        };
        if let Some(&existing) = self.by_element.get(&element) {
            return Err(SortableError::AlreadyRegistered { element, existing });
        }

        let id = SortableId(self.next_id);
        self.next_id += 1;
        let sortable = Sortable::new(id, element, &tag, config.into(), &self.platform);
        tracing::debug!(
            "Registered sortable {:?} on <{}> {:?} (native: {})",
            id,
            tag,
            element,
            sortable.native
        );
        self.sortables.insert(id, sortable);
        self.by_element.insert(element, id);

        let stored = self.sortables.get_mut(&id).and_then(|s| {
            let mut store = s.store.take();
            let order = store.as_mut().and_then(|store| store.get(&s.store_key()));
            s.store = store;
            order
        });
        if let Some(order) = stored {
            self.sort(id, &order, false)?;
        }
        Ok(id)
    }

    /// Container registered on `element`, if any.
    pub fn get(&self, element: NodeId) -> Option<SortableId> {
        self.by_element.get(&element).copied()
    }

    /// Unregister a container, aborting a drag it owns.
    pub fn destroy(&mut self, id: SortableId) -> SortableResult<()> {
        let element = self.sortable(id)?.element;
        for node in self.document.descendants(element) {
            if self.document.draggable(node).is_some() {
                self.document.remove_attribute(node, "draggable");
            }
        }

        let owns_drag = self
            .session
            .as_ref()
            .is_some_and(|s| s.origin == id || self.active == Some(id));
        if owns_drag {
            self.on_drop(None, &mut EventResponse::ignored());
        }
        if let Some(session) = self.session.as_mut() {
            if session.put_sortable == Some(id) {
                session.put_sortable = None;
            }
        }

        self.scheduler.cancel(crate::scheduler::TimerKey::Settled(id));
        self.sortables.shift_remove(&id);
        self.by_element.remove(&element);
        tracing::debug!("Destroyed sortable {:?}", id);
        Ok(())
    }

    pub fn options(&self, id: SortableId) -> SortableResult<&SortableOptions> {
        Ok(&self.sortable(id)?.options)
    }

    /// Change options in place; the group and selectors are recompiled.
    pub fn update_options(
        &mut self,
        id: SortableId,
        f: impl FnOnce(&mut SortableOptions),
    ) -> SortableResult<()> {
        let sortable = self
            .sortables
            .get_mut(&id)
            .ok_or(SortableError::UnknownSortable(id))?;
        let tag = self
            .document
            .tag(sortable.element)
            .ok_or(SortableError::NotAnElement(sortable.element))?
            .to_string();
        f(&mut sortable.options);
        sortable.prepare(&tag, &self.platform);
        Ok(())
    }

    pub(crate) fn sortable(&self, id: SortableId) -> SortableResult<&Sortable> {
        self.sortables
            .get(&id)
            .ok_or(SortableError::UnknownSortable(id))
    }

    // ------------------------------------------------------------------
    // Order
    // ------------------------------------------------------------------

    /// Ids of the container's items in document order.
    pub fn to_array(&self, id: SortableId) -> SortableResult<Vec<String>> {
        let sortable = self.sortable(id)?;
        let el = sortable.element;
        Ok(self
            .document
            .children(el)
            .iter()
            .copied()
            .filter(|&child| {
                closest(
                    &self.document,
                    child,
                    Some(&sortable.selectors.draggable),
                    Some(el),
                    false,
                )
                .is_some()
            })
            .map(|child| self.item_id(child, &sortable.options.data_id_attr))
            .collect())
    }

    fn item_id(&self, node: NodeId, attr: &str) -> String {
        match self.document.attribute(node, attr) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_id(&self.document, node),
        }
    }

    /// Reorder items to follow `order`. Unknown ids are skipped; items not
    /// named keep their place in front.
    pub fn sort<S: AsRef<str>>(
        &mut self,
        id: SortableId,
        order: &[S],
        animate: bool,
    ) -> SortableResult<()> {
        let sortable = self.sortable(id)?;
        let el = sortable.element;
        let mut items: HashMap<String, NodeId> = HashMap::new();
        for &child in self.document.children(el) {
            if closest(
                &self.document,
                child,
                Some(&sortable.selectors.draggable),
                Some(el),
                false,
            )
            .is_some()
            {
                items.insert(self.item_id(child, &sortable.options.data_id_attr), child);
            }
        }

        if animate {
            self.capture(id);
        }
        for item in order {
            if let Some(&node) = items.get(item.as_ref()) {
                self.document.append_child(el, node)?;
            }
        }
        if animate {
            self.animate_all(id, false);
        }
        Ok(())
    }

    /// Hand the container's current order to its store.
    pub fn save(&mut self, id: SortableId) -> SortableResult<()> {
        let order = self.to_array(id)?;
        let sortable = self
            .sortables
            .get_mut(&id)
            .ok_or(SortableError::UnknownSortable(id))?;
        let mut store = sortable.store.take();
        if let Some(store) = store.as_mut() {
            store.set(&sortable.store_key(), &order);
        }
        sortable.store = store;
        Ok(())
    }

    /// Nearest ancestor of `node` inside the container matching `selector`,
    /// or the item selector when `None`.
    pub fn closest(
        &self,
        id: SortableId,
        node: NodeId,
        selector: Option<&str>,
    ) -> SortableResult<Option<NodeId>> {
        let sortable = self.sortable(id)?;
        let custom = selector.map(SelectorList::compile_lossy);
        let selector = custom.as_ref().unwrap_or(&sortable.selectors.draggable);
        Ok(closest(
            &self.document,
            node,
            Some(selector),
            Some(sortable.element),
            false,
        ))
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route one input event. The response says what the host should do
    /// to the platform event.
    pub fn handle_event(&mut self, event: InputEvent) -> EventResponse {
        profile_function!();
        let mut response = EventResponse::ignored();
        let input = *event.pointer();
        let target = input
            .target
            .or_else(|| self.document.element_from_point(input.position));
        tracing::trace!("{} at {:?} on {:?}", event.name(), input.position, target);

        match event {
            InputEvent::PointerDown(_) => {
                if let Some(target) = target {
                    self.on_pointer_down(&input, target, &mut response);
                }
            }
            InputEvent::PointerMove(_) => self.on_pointer_move(&input, &mut response),
            InputEvent::PointerUp(_) | InputEvent::PointerCancel(_) => {
                self.on_pointer_up(&input, &mut response)
            }
            InputEvent::DragStart(_) => {
                let starts = self.session.as_ref().is_some_and(|s| {
                    s.listeners.is_listening(Listeners::NATIVE_DRAG)
                        && target.is_some_and(|t| self.document.contains(s.root, t))
                });
                if starts {
                    response.mark_handled();
                    self.on_drag_start(Some(&input), false, &mut response);
                }
            }
            InputEvent::DragEnter(_) => {
                if let Some(target) = target {
                    self.on_native_drag_over(&input, target, false, &mut response);
                }
            }
            InputEvent::DragOver(_) => {
                if let Some(target) = target {
                    self.on_native_drag_over(&input, target, true, &mut response);
                }
            }
            InputEvent::Drop(_) => {
                if self.is_listening(Listeners::DOCUMENT_DROP) {
                    response.mark_handled();
                    self.on_drop(Some(&input), &mut response);
                }
            }
            InputEvent::DragEnd(_) => {
                if self.is_listening(Listeners::NATIVE_DRAG) {
                    response.mark_handled();
                    self.on_drop(Some(&input), &mut response);
                }
            }
            InputEvent::Click(_) => {
                if self.ignore_next_click {
                    response.suppress_click();
                    response.stop_propagation();
                    self.ignore_next_click = false;
                }
            }
        }
        response
    }

    /// Handle every event of a host frame in order.
    pub fn handle_batch(&mut self, batch: &mut EventBatch) -> Vec<EventResponse> {
        arrange_core::profiling::new_frame();
        profile_scope!("handle_batch");
        batch.dispatch(|event| self.handle_event(event))
    }

    pub(crate) fn is_listening(&self, listeners: Listeners) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.listeners.is_listening(listeners))
    }

    /// Presses bubble from the target through every registered ancestor.
    fn on_pointer_down(&mut self, input: &PointerInput, target: NodeId, response: &mut EventResponse) {
        let mut containers = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(&id) = self.by_element.get(&node) {
                containers.push(id);
            }
            current = self.document.parent(node);
        }
        for id in containers {
            response.mark_handled();
            self.on_tap_start(id, input, target, response);
        }
    }

    fn on_pointer_move(&mut self, input: &PointerInput, response: &mut EventResponse) {
        if input.is_touch()
            && (self.active.is_some() || self.awaiting_drag_started)
            && input.cancelable
        {
            response.prevent_default();
        }
        if self.is_listening(Listeners::NEAREST_EMPTY) {
            self.nearest_empty_insert(input.position);
        }
        if self.is_listening(Listeners::DELAYED) {
            self.delayed_drag_move(input);
        }
        if self.is_listening(Listeners::POINTER_MOVE) {
            response.mark_handled();
            self.on_pointer_drag_move(input, response);
        }
    }

    fn on_pointer_up(&mut self, input: &PointerInput, response: &mut EventResponse) {
        if self.is_listening(Listeners::DROP_ON_UP) {
            response.mark_handled();
            self.on_drop(Some(input), response);
        }
        if self.is_listening(Listeners::DELAYED) {
            self.disable_delayed_drag();
        }
    }

    /// Native `dragenter`/`dragover`: bubble through native containers,
    /// then reach the document unless propagation stopped.
    fn on_native_drag_over(
        &mut self,
        input: &PointerInput,
        target: NodeId,
        is_dragover: bool,
        response: &mut EventResponse,
    ) {
        if self.session.is_none() {
            return;
        }
        let mut containers = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(&id) = self.by_element.get(&node) {
                if self.sortables.get(&id).is_some_and(|s| s.native) {
                    containers.push(id);
                }
            }
            current = self.document.parent(node);
        }

        let over = crate::dragover::OverEvent {
            position: input.position,
            target,
            emulated: false,
            cancelable: input.cancelable,
        };
        for id in containers {
            if self.session.is_none() {
                break;
            }
            response.mark_handled();
            self.on_drag_over(id, over, response);
            response.drop_effect = Some(DropEffect::Move);
            if input.cancelable {
                response.prevent_default();
            }
            if response.propagation_stopped() {
                return;
            }
        }

        if is_dragover {
            if self.is_listening(Listeners::NEAREST_EMPTY) {
                self.nearest_empty_insert(input.position);
            }
            if self.is_listening(Listeners::OUTSIDE_CHECK) {
                self.outside_check(target);
            }
        }
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Move the virtual clock forward, firing due timers in order.
    pub fn advance(&mut self, ms: f64) {
        let until = self.scheduler.now() + ms.max(0.0);
        while let Some(action) = self.scheduler.pop_due(until) {
            self.document.set_time(self.scheduler.now());
            self.run_deferred(action);
        }
        self.scheduler.set_now(until);
        self.document.set_time(until);
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn run_deferred(&mut self, action: Deferred) {
        tracing::trace!("Timer fired: {:?}", action);
        match action {
            Deferred::DelayedDragStart => {
                if let Some(origin) = self.session.as_ref().map(|s| s.origin) {
                    self.drag_start_now(origin);
                }
            }
            Deferred::CloneTick => self.clone_tick(),
            Deferred::DragStarted { fallback } => self.drag_started(fallback),
            Deferred::EmulateDragOver => self.emulate_drag_over(),
            Deferred::Unsilence => self.silent = false,
            Deferred::AnimationReset(node) => self.animations.reset(node),
            Deferred::TransitionEnd(node) => self.animations.end(&mut self.document, node),
            Deferred::Settled {
                sortable,
                clear_ignore,
            } => {
                if clear_ignore {
                    if let Some(sortable) = self.sortables.get_mut(&sortable) {
                        sortable.ignore_while_animating = None;
                    }
                }
            }
        }
    }

    /// Abort the current gesture. Pending starts and drag-overs short
    /// circuit and the session is cleared without committing.
    pub fn cancel(&mut self) {
        self.canceled = true;
        if self.session.is_some() {
            tracing::debug!("Drag canceled");
            self.on_drop(None, &mut EventResponse::ignored());
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> DragState {
        match (&self.session, self.active) {
            (None, _) => DragState::Idle,
            (Some(_), Some(_)) => DragState::Dragging,
            (Some(_), None) => DragState::PendingStart,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn active(&self) -> Option<SortableId> {
        self.active
    }

    pub fn is_awaiting_drag_start(&self) -> bool {
        self.awaiting_drag_started
    }

    pub fn dragged(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.dragged)
    }

    pub fn ghost(&self) -> Option<NodeId> {
        self.session.as_ref().and_then(|s| s.ghost)
    }

    pub fn clone_element(&self) -> Option<NodeId> {
        self.session.as_ref().and_then(|s| s.clone)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn animations(&self) -> &ElementAnimations {
        &self.animations
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    /// Index of `node` among its siblings, ignoring the clone.
    pub(crate) fn index_of(&self, node: NodeId, selector: Option<&SelectorList>) -> Option<usize> {
        let clone = self.clone_element().map(|c| [c]);
        let exclude = clone.as_ref().map_or(&[][..], |c| &c[..]);
        arrange_dom::query::matching_child_index(&self.document, node, selector, exclude)
    }

    pub(crate) fn capture(&mut self, id: SortableId) {
        let ghost = self.ghost();
        let Some(sortable) = self.sortables.get_mut(&id) else {
            return;
        };
        let mut ctx = AnimationContext {
            document: &mut self.document,
            scheduler: &mut self.scheduler,
            elements: &mut self.animations,
            ghost,
        };
        let (element, duration) = (sortable.element, sortable.options.animation);
        sortable.animation.capture(&mut ctx, element, duration);
    }

    /// Returns true when nothing is animating.
    pub(crate) fn animate_all(&mut self, id: SortableId, clear_ignore: bool) -> bool {
        let ghost = self.ghost();
        let Some(sortable) = self.sortables.get_mut(&id) else {
            return true;
        };
        let mut ctx = AnimationContext {
            document: &mut self.document,
            scheduler: &mut self.scheduler,
            elements: &mut self.animations,
            ghost,
        };
        let settings = sortable.animation_settings();
        let element = sortable.element;
        sortable.animation.animate_all(
            &mut ctx,
            id,
            element,
            settings,
            Deferred::Settled {
                sortable: id,
                clear_ignore,
            },
        )
    }

    /// Event record for the current session.
    pub(crate) fn session_event(
        &self,
        kind: SortableEventKind,
        receiver: SortableId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) -> Option<SortableEvent> {
        let session = self.session.as_ref()?;
        let pull_mode = session
            .put_sortable
            .and_then(|p| self.sortables.get(&p))
            .and_then(|s| s.last_put_mode);
        Some(SortableEvent {
            kind,
            sortable: receiver,
            item: session.dragged,
            from: from.unwrap_or(session.root),
            to: to.unwrap_or(session.root),
            clone: session.clone,
            old_index: session.old_index,
            new_index: session.new_index,
            old_draggable_index: session.old_draggable_index,
            new_draggable_index: session.new_draggable_index,
            pull_mode,
        })
    }

    pub(crate) fn notify(&self, event: &SortableEvent) {
        let Some(sortable) = self.sortables.get(&event.sortable) else {
            return;
        };
        tracing::debug!(
            "{} on {:?}: item {:?}, index {:?} -> {:?}",
            event.kind.name(),
            event.sortable,
            event.item,
            event.old_index,
            event.new_index
        );
        sortable.hooks.on_event(event);
    }

    pub(crate) fn emit(
        &self,
        kind: SortableEventKind,
        receiver: SortableId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) {
        if let Some(event) = self.session_event(kind, receiver, from, to) {
            self.notify(&event);
        }
    }

    /// Reset hysteresis when `target` is outside the container currently
    /// holding the dragged item.
    pub(crate) fn outside_check(&mut self, target: NodeId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(parent) = self.document.parent(session.dragged) else {
            return;
        };
        let Some(el) = self
            .by_element
            .get(&parent)
            .and_then(|id| self.sortables.get(id))
            .map(|s| s.element)
        else {
            return;
        };
        if !self.document.contains(el, target) {
            session.last_target = None;
        }
    }

    pub(crate) fn toggle_class(&mut self, node: NodeId, classes: &str, state: bool) {
        if self.document.exists(node) {
            self.document.toggle_class(node, classes, state);
        }
    }

    pub(crate) fn set_css(&mut self, node: NodeId, property: &str, value: &str) {
        if self.document.exists(node) {
            self.document
                .set_css(node, property, value)
                .or_trace(property);
        }
    }
}
