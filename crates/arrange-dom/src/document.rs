//! Document tree with Taffy layout integration.
//!
//! Every structural or layout-affecting mutation recomputes layout before
//! returning, so geometry queries never observe a stale box. That mirrors
//! the forced reflow a browser performs when script reads layout.

use crate::dirty::DirtyFlags;
use crate::element::Element;
use crate::error::{DomError, DomResult};
use crate::style::{Display, PointerEvents, Position, Style};
use crate::transition::{ActiveTransition, Transition};
use arrange_core::alloc::HashSet;
use arrange_core::geometry::{Matrix2D, Rect};
use arrange_core::math::Vec2;
use arrange_core::profiling::profile_function;
use indexmap::IndexMap;
use taffy::{AvailableSpace, Size, TaffyTree};

/// Node identifier in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A node in the document.
#[derive(Debug)]
pub struct DomNode {
    pub element: Element,
    pub style: Style,
    pub(crate) taffy_node: taffy::NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Border box in client coordinates, ignoring transforms.
    pub(crate) layout: Rect,
    pub(crate) scroll: Vec2,
    pub(crate) dirty: DirtyFlags,
    pub(crate) transition: Option<ActiveTransition>,
}

/// A headless element tree standing in for a browser document.
pub struct Document {
    taffy: TaffyTree<()>,
    nodes: IndexMap<NodeId, DomNode>,
    body: NodeId,
    next_id: usize,
    viewport: Vec2,
    now_ms: f64,
    /// Set of nodes with pending dirty flags.
    dirty_nodes: HashSet<NodeId>,
    resets_checked_on_move: bool,
    selection_fails: bool,
    selection_clears: usize,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("viewport", &self.viewport)
            .field("now_ms", &self.now_ms)
            .finish()
    }
}

impl Document {
    /// Create a document whose body fills a `width` x `height` viewport.
    pub fn new(width: f32, height: f32) -> DomResult<Self> {
        let mut taffy = TaffyTree::new();
        let body_style = Style::new().size(width, height);
        let taffy_node = taffy.new_leaf(body_style.to_taffy(false))?;

        let body = NodeId(0);
        let mut nodes = IndexMap::new();
        nodes.insert(
            body,
            DomNode {
                element: Element::new("body"),
                style: body_style,
                taffy_node,
                parent: None,
                children: Vec::new(),
                layout: Rect::new(0.0, 0.0, width, height),
                scroll: Vec2::ZERO,
                dirty: DirtyFlags::NONE,
                transition: None,
            },
        );

        let mut doc = Self {
            taffy,
            nodes,
            body,
            next_id: 1,
            viewport: Vec2::new(width, height),
            now_ms: 0.0,
            dirty_nodes: HashSet::new(),
            resets_checked_on_move: false,
            selection_fails: false,
            selection_clears: 0,
        };
        doc.relayout()?;
        Ok(doc)
    }

    /// The root element; also the window's scrolling element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Current document time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Advance the document clock. Transitions are evaluated against it.
    pub fn set_time(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Emulate engines that reset `checked` on inputs moved in the tree.
    pub fn set_resets_checked_on_move(&mut self, resets: bool) {
        self.resets_checked_on_move = resets;
    }

    /// Make [`Document::clear_selection`] fail, as some platforms do.
    pub fn set_selection_fails(&mut self, fails: bool) {
        self.selection_fails = fails;
    }

    /// Number of successful selection clears so far.
    pub fn selection_clears(&self) -> usize {
        self.selection_clears
    }

    pub fn clear_selection(&mut self) -> DomResult<()> {
        if self.selection_fails {
            return Err(DomError::Selection);
        }
        self.selection_clears += 1;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Node lifecycle
    // ------------------------------------------------------------------

    /// Create a detached element with default style.
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        self.create_element_with(tag, Style::default())
    }

    /// Create a detached element with the given style.
    pub fn create_element_with(&mut self, tag: &str, style: Style) -> DomResult<NodeId> {
        self.insert_node(Element::new(tag), style)
    }

    fn insert_node(&mut self, element: Element, style: Style) -> DomResult<NodeId> {
        let taffy_node = self.taffy.new_leaf(style.to_taffy(false))?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            DomNode {
                element,
                style,
                taffy_node,
                parent: None,
                children: Vec::new(),
                layout: Rect::default(),
                scroll: Vec2::ZERO,
                dirty: DirtyFlags::NONE,
                transition: None,
            },
        );
        self.mark_dirty(id, DirtyFlags::LAYOUT | DirtyFlags::STYLE);
        Ok(id)
    }

    /// Deep-copy `node` and its subtree into a new detached tree.
    ///
    /// Running transitions and scroll offsets are not copied.
    pub fn clone_subtree(&mut self, node: NodeId) -> DomResult<NodeId> {
        let (element, style, children) = {
            let n = self.node(node)?;
            (n.element.clone(), n.style.clone(), n.children.clone())
        };
        let copy = self.insert_node(element, style)?;
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.attach(copy, child_copy, None)?;
        }
        self.sync_style(copy)?;
        Ok(copy)
    }

    /// Remove `node` and its whole subtree from the document for good.
    pub fn destroy(&mut self, node: NodeId) -> DomResult<()> {
        if node == self.body {
            return Err(DomError::BodyImmutable);
        }
        self.detach(node)?;
        let mut doomed = vec![node];
        doomed.extend(self.descendants(node));
        for id in doomed {
            if let Some(n) = self.nodes.shift_remove(&id) {
                self.taffy.remove(n.taffy_node)?;
            }
            self.dirty_nodes.remove(&id);
        }
        Ok(())
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn get(&self, node: NodeId) -> Option<&DomNode> {
        self.nodes.get(&node)
    }

    fn node(&self, node: NodeId) -> DomResult<&DomNode> {
        self.nodes.get(&node).ok_or(DomError::NodeNotFound(node))
    }

    fn node_mut(&mut self, node: NodeId) -> DomResult<&mut DomNode> {
        self.nodes.get_mut(&node).ok_or(DomError::NodeNotFound(node))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `node` among all of its parent's children.
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == node)?;
        siblings.get(index + 1).copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == node)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All descendants in pre-order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or at the end.
    ///
    /// Moving a node that is already attached detaches it first, like the
    /// DOM does. Inserting a node before itself is a no-op.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        profile_function!();
        if child == self.body {
            return Err(DomError::BodyImmutable);
        }
        self.node(parent)?;
        self.node(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        let was_attached = self.parent(child).is_some();
        self.detach_silently(child)?;
        self.attach(parent, child, reference)?;

        if was_attached && self.resets_checked_on_move {
            let mut moved = vec![child];
            moved.extend(self.descendants(child));
            for id in moved {
                if let Some(n) = self.nodes.get_mut(&id) {
                    if n.element.is_input() {
                        n.element.checked = false;
                    }
                }
            }
        }

        self.relayout()
    }

    /// Remove `node` from its parent, keeping it alive for re-insertion.
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        if node == self.body {
            return Err(DomError::BodyImmutable);
        }
        if self.parent(node).is_none() {
            return Ok(());
        }
        self.detach_silently(node)?;
        self.relayout()
    }

    /// Remove `child` from `parent`, like `removeChild`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    fn detach_silently(&mut self, node: NodeId) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != node);
        self.node_mut(node)?.parent = None;
        self.sync_children(parent)?;
        self.sync_style(parent)?;
        self.mark_dirty(parent, DirtyFlags::CHILDREN_ORDER);
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        let parent_node = self.node_mut(parent)?;
        let index = reference
            .and_then(|r| parent_node.children.iter().position(|&c| c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.sync_children(parent)?;
        self.sync_style(parent)?;
        self.mark_dirty(parent, DirtyFlags::CHILDREN_ORDER);
        self.mark_dirty(child, DirtyFlags::LAYOUT);
        Ok(())
    }

    fn sync_children(&mut self, parent: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let parent_taffy = parent_node.taffy_node;
        let taffy_children: Vec<taffy::NodeId> = parent_node
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| n.taffy_node))
            .collect();
        self.taffy.set_children(parent_taffy, &taffy_children)?;
        Ok(())
    }

    /// Push the node's style into taffy. Block containers whose in-flow
    /// children all flow inline are laid out as a wrapping row.
    pub(crate) fn sync_style(&mut self, node: NodeId) -> DomResult<()> {
        let n = self.node(node)?;
        let mut in_flow = n
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|c| c.style.display != Display::None && !c.style.is_out_of_flow())
            .peekable();
        let inline_children = in_flow.peek().is_some() && in_flow.all(|c| c.style.flows_inline());
        let layout = n.style.to_taffy(inline_children);
        let taffy_node = n.taffy_node;
        self.taffy.set_style(taffy_node, layout)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node).map(|n| &n.element)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.toggle_class(node, class, true);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.toggle_class(node, class, false);
    }

    /// Add or remove every space-separated class in `classes`.
    pub fn toggle_class(&mut self, node: NodeId, classes: &str, state: bool) {
        let Some(n) = self.nodes.get_mut(&node) else {
            return;
        };
        let mut changed = false;
        for class in classes.split_whitespace() {
            changed |= if state {
                n.element.add_class(class)
            } else {
                n.element.remove_class(class)
            };
        }
        if changed {
            self.mark_dirty(node, DirtyFlags::CLASSES);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attribute(name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.attributes.insert(name.to_string(), value.to_string());
            self.mark_dirty(node, DirtyFlags::CLASSES);
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            if n.element.attributes.shift_remove(name).is_some() {
                self.mark_dirty(node, DirtyFlags::CLASSES);
            }
        }
    }

    pub fn set_draggable(&mut self, node: NodeId, draggable: bool) {
        self.set_attribute(node, "draggable", if draggable { "true" } else { "false" });
    }

    pub fn draggable(&self, node: NodeId) -> Option<bool> {
        self.element(node).and_then(|e| e.draggable())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.text = text.to_string();
            self.mark_dirty(node, DirtyFlags::STYLE);
        }
    }

    /// Concatenated text of `node` and all of its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(e) = self.element(node) {
            out.push_str(&e.text);
        }
        for id in self.descendants(node) {
            if let Some(e) = self.element(id) {
                out.push_str(&e.text);
            }
        }
        out
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.checked)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.checked = checked;
            self.mark_dirty(node, DirtyFlags::STYLE);
        }
    }

    pub fn set_content_editable(&mut self, node: NodeId, editable: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.content_editable = editable;
        }
    }

    /// Editable itself or through an ancestor, like `isContentEditable`.
    pub fn is_content_editable(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.element(id).is_some_and(|e| e.content_editable) {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Style and geometry
    // ------------------------------------------------------------------

    pub fn style(&self, node: NodeId) -> Option<&Style> {
        self.nodes.get(&node).map(|n| &n.style)
    }

    /// Replace the style of `node` and recompute layout.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> DomResult<()> {
        self.update_style(node, |s| *s = style)
    }

    /// Mutate the style of `node` in place and recompute layout.
    pub fn update_style(&mut self, node: NodeId, f: impl FnOnce(&mut Style)) -> DomResult<()> {
        let n = self.node_mut(node)?;
        let before = n.style.clone();
        f(&mut n.style);
        let after = n.style.clone();
        if before == after {
            return Ok(());
        }

        let mut flags = DirtyFlags::STYLE;
        if before.display != after.display || before.opacity != after.opacity {
            flags |= DirtyFlags::VISIBILITY;
        }
        if before.transition != after.transition
            && !after.transition.as_ref().is_some_and(Transition::covers_transform)
        {
            n.transition = None;
        }
        if before.transform != after.transform || before.transition != after.transition {
            flags |= DirtyFlags::TRANSFORM;
        }
        self.mark_dirty(node, flags | DirtyFlags::LAYOUT);

        self.sync_style(node)?;
        if let Some(parent) = self.parent(node) {
            self.sync_style(parent)?;
        }
        self.relayout()
    }

    /// Set the transform of `node`, starting a transition when one covers it.
    pub fn set_transform(&mut self, node: NodeId, transform: Option<Matrix2D>) -> DomResult<()> {
        let now = self.now_ms;
        let current = self.computed_transform(node);
        let n = self.node_mut(node)?;
        let target = transform.unwrap_or(Matrix2D::IDENTITY);
        n.transition = match &n.style.transition {
            Some(t) if t.covers_transform() && current != target => Some(ActiveTransition {
                from: current,
                to: target,
                start_ms: now,
                duration_ms: t.duration_ms,
                easing: t.easing,
            }),
            _ => None,
        };
        n.style.transform = transform;
        self.mark_dirty(node, DirtyFlags::TRANSFORM);
        Ok(())
    }

    /// Set the `transition` declaration. Clearing it ends any running
    /// transform transition at its target value.
    pub fn set_transition(&mut self, node: NodeId, transition: Option<Transition>) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if !transition.as_ref().is_some_and(Transition::covers_transform) {
            n.transition = None;
        }
        n.style.transition = transition;
        self.mark_dirty(node, DirtyFlags::TRANSFORM);
        Ok(())
    }

    /// The transform currently visible on `node` (not its ancestors).
    pub fn computed_transform(&self, node: NodeId) -> Matrix2D {
        let Some(n) = self.nodes.get(&node) else {
            return Matrix2D::IDENTITY;
        };
        match &n.transition {
            Some(active) if !active.is_finished(self.now_ms) => active.value_at(self.now_ms),
            _ => n.style.transform.unwrap_or(Matrix2D::IDENTITY),
        }
    }

    /// True while a transform transition on `node` is still running.
    pub fn is_transitioning(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .and_then(|n| n.transition.as_ref())
            .is_some_and(|t| !t.is_finished(self.now_ms))
    }

    fn transform_origin(&self, node: NodeId) -> Vec2 {
        let Some(n) = self.nodes.get(&node) else {
            return Vec2::ZERO;
        };
        let fraction = n.style.transform_origin.unwrap_or(Vec2::splat(0.5));
        n.layout.origin() + n.layout.size() * fraction
    }

    /// Border box ignoring transforms, in client coordinates.
    pub fn layout_rect(&self, node: NodeId) -> Rect {
        self.nodes.get(&node).map(|n| n.layout).unwrap_or_default()
    }

    /// Border box as painted, like `getBoundingClientRect`.
    ///
    /// Applies the node's own transform and those of its ancestors; fixed
    /// boxes only honour their own.
    pub fn client_rect(&self, node: NodeId) -> Rect {
        let Some(n) = self.nodes.get(&node) else {
            return Rect::default();
        };
        let fixed = n.style.position == Position::Fixed;
        let mut rect = n.layout;
        let mut current = Some(node);
        while let Some(id) = current {
            let matrix = self.computed_transform(id);
            if !matrix.is_identity() {
                rect = rect.transformed(&matrix, self.transform_origin(id));
            }
            if fixed {
                break;
            }
            current = self.parent(id);
        }
        rect
    }

    pub fn scroll_offset(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|n| n.scroll).unwrap_or(Vec2::ZERO)
    }

    pub fn set_scroll(&mut self, node: NodeId, offset: Vec2) -> DomResult<()> {
        self.node_mut(node)?.scroll = offset;
        self.mark_dirty(node, DirtyFlags::LAYOUT);
        self.relayout()
    }

    /// Topmost element under `point`, skipping hidden and
    /// `pointer-events: none` subtrees.
    pub fn element_from_point(&self, point: Vec2) -> Option<NodeId> {
        profile_function!();
        self.hit_test(self.body, point)
    }

    fn hit_test(&self, node: NodeId, point: Vec2) -> Option<NodeId> {
        let n = self.nodes.get(&node)?;
        if n.style.display == Display::None || n.style.pointer_events == PointerEvents::None {
            return None;
        }
        for &child in n.children.iter().rev() {
            if let Some(hit) = self.hit_test(child, point) {
                return Some(hit);
            }
        }
        self.client_rect(node).contains(point).then_some(node)
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn relayout(&mut self) -> DomResult<()> {
        profile_function!();
        let body_taffy = self.node(self.body)?.taffy_node;
        self.taffy.compute_layout(
            body_taffy,
            Size {
                width: AvailableSpace::Definite(self.viewport.x),
                height: AvailableSpace::Definite(self.viewport.y),
            },
        )?;

        let attached: HashSet<NodeId> = self.descendants(self.body).into_iter().collect();
        for (id, node) in self.nodes.iter_mut() {
            if *id != self.body && !attached.contains(id) {
                node.layout = Rect::default();
            }
        }

        let mut stack = vec![self.body];
        while let Some(parent) = stack.pop() {
            let (origin, scroll, children) = {
                let p = self.node(parent)?;
                (p.layout.origin(), p.scroll, p.children.clone())
            };
            for child in children {
                let n = self.node(child)?;
                let computed = self.taffy.layout(n.taffy_node)?;
                let size = Vec2::new(computed.size.width, computed.size.height);
                let rect = if n.style.position == Position::Fixed {
                    Rect::new(
                        n.style.left.px().unwrap_or(0.0),
                        n.style.top.px().unwrap_or(0.0),
                        size.x,
                        size.y,
                    )
                } else {
                    let location = Vec2::new(computed.location.x, computed.location.y);
                    let position = origin + location - scroll;
                    Rect::new(position.x, position.y, size.x, size.y)
                };
                let n = self.node_mut(child)?;
                let moved = !n.layout.same_pixels(&rect);
                n.layout = rect;
                if moved {
                    self.mark_dirty(child, DirtyFlags::LAYOUT);
                }
                stack.push(child);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    pub(crate) fn mark_dirty(&mut self, node: NodeId, flags: DirtyFlags) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.dirty |= flags;
            self.dirty_nodes.insert(node);
        }
    }

    /// Drain pending dirty flags, in node creation order.
    pub fn take_dirty(&mut self) -> Vec<(NodeId, DirtyFlags)> {
        let mut out: Vec<(NodeId, DirtyFlags)> = self
            .nodes
            .iter_mut()
            .filter(|(_, n)| !n.dirty.is_empty())
            .map(|(id, n)| (*id, std::mem::take(&mut n.dirty)))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        self.dirty_nodes.clear();
        out
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_doc() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new(800.0, 600.0).unwrap();
        let list = doc.create_element_with("ul", Style::new().width(200.0)).unwrap();
        doc.append_child(doc.body(), list).unwrap();
        let items: Vec<NodeId> = (0..3)
            .map(|_| {
                let li = doc.create_element_with("li", Style::new().height(40.0)).unwrap();
                doc.append_child(list, li).unwrap();
                li
            })
            .collect();
        (doc, list, items)
    }

    #[test]
    fn test_debug_summarises_document() {
        let (doc, _, _) = list_doc();
        let printed = format!("{:?}", doc);
        assert!(printed.starts_with("Document"));
        assert!(printed.contains("nodes: 5"));
    }

    #[test]
    fn test_block_children_stack_vertically() {
        let (doc, list, items) = list_doc();
        assert_eq!(doc.layout_rect(list), Rect::new(0.0, 0.0, 200.0, 120.0));
        assert_eq!(doc.layout_rect(items[1]), Rect::new(0.0, 40.0, 200.0, 40.0));
        assert_eq!(doc.layout_rect(items[2]).top, 80.0);
    }

    #[test]
    fn test_move_reorders_and_relayouts() {
        let (mut doc, list, items) = list_doc();
        doc.append_child(list, items[0]).unwrap();
        assert_eq!(doc.children(list), &[items[1], items[2], items[0]]);
        assert_eq!(doc.layout_rect(items[0]).top, 80.0);
        assert_eq!(doc.layout_rect(items[1]).top, 0.0);
    }

    #[test]
    fn test_insert_before_self_is_noop() {
        let (mut doc, list, items) = list_doc();
        doc.insert_before(list, items[1], Some(items[1])).unwrap();
        assert_eq!(doc.children(list), items.as_slice());
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut doc, list, items) = list_doc();
        let err = doc.append_child(items[0], list).unwrap_err();
        assert_eq!(
            err,
            DomError::HierarchyCycle {
                parent: items[0],
                child: list
            }
        );
    }

    #[test]
    fn test_transform_moves_client_rect() {
        let (mut doc, _, items) = list_doc();
        doc.set_transform(items[0], Some(Matrix2D::translation(0.0, 10.0)))
            .unwrap();
        assert_eq!(doc.client_rect(items[0]).top, 10.0);
        assert_eq!(doc.layout_rect(items[0]).top, 0.0);
    }

    #[test]
    fn test_transition_interpolates_on_clock() {
        let (mut doc, _, items) = list_doc();
        let li = items[0];
        doc.set_transform(li, Some(Matrix2D::translation(0.0, 40.0))).unwrap();
        doc.set_transition(li, Transition::parse("transform 100ms linear"))
            .unwrap();
        doc.set_transform(li, Some(Matrix2D::IDENTITY)).unwrap();

        assert_eq!(doc.computed_transform(li).f, 40.0);
        doc.set_time(50.0);
        assert_eq!(doc.computed_transform(li).f, 20.0);
        assert!(doc.is_transitioning(li));
        doc.set_time(100.0);
        assert!(doc.computed_transform(li).is_identity());
        assert!(!doc.is_transitioning(li));
    }

    #[test]
    fn test_element_from_point_prefers_deepest() {
        let (doc, list, items) = list_doc();
        assert_eq!(doc.element_from_point(Vec2::new(10.0, 50.0)), Some(items[1]));
        assert_eq!(doc.element_from_point(Vec2::new(500.0, 50.0)), Some(doc.body()));
        assert_ne!(doc.element_from_point(Vec2::new(10.0, 50.0)), Some(list));
    }

    #[test]
    fn test_checked_reset_quirk() {
        let (mut doc, list, items) = list_doc();
        let input = doc.create_element("input").unwrap();
        doc.append_child(items[0], input).unwrap();
        doc.set_checked(input, true);
        doc.set_resets_checked_on_move(true);
        doc.append_child(list, items[0]).unwrap();
        assert!(!doc.checked(input));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let (mut doc, list, items) = list_doc();
        doc.destroy(list).unwrap();
        assert!(!doc.exists(list));
        assert!(items.iter().all(|&i| !doc.exists(i)));
        assert_eq!(doc.destroy(doc.body()), Err(DomError::BodyImmutable));
    }
}
