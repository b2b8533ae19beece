//! Per-container configuration.

use crate::group::GroupOptions;
use crate::sortable::SortableId;
use arrange_core::math::Vec2;
use arrange_dom::{Document, Easing, NodeId, SelectorList};
use arrange_input::PointerInput;
use std::rc::Rc;

/// Sort axis as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ask [`SortableHooks::direction`](crate::SortableHooks::direction),
    /// which detects the axis from layout by default.
    #[default]
    Auto,
    Vertical,
    Horizontal,
}

/// Resolved sort axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Axis::Vertical)
    }
}

/// What a filter predicate gets to see.
pub struct FilterContext<'a> {
    pub document: &'a Document,
    pub sortable: SortableId,
    pub container: NodeId,
    /// Nearest draggable ancestor of the pressed element, if any.
    pub target: Option<NodeId>,
    /// The element actually pressed.
    pub original_target: NodeId,
    pub input: &'a PointerInput,
}

pub type FilterFn = Rc<dyn Fn(&FilterContext<'_>) -> bool>;

/// Elements that must not start a drag.
#[derive(Clone)]
pub enum Filter {
    /// Comma-separated selectors, each tested against the pressed
    /// element's ancestors within the container.
    Selector(String),
    Predicate(FilterFn),
}

impl Filter {
    pub fn predicate(f: impl Fn(&FilterContext<'_>) -> bool + 'static) -> Self {
        Filter::Predicate(Rc::new(f))
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Selector(selector) => write!(f, "Selector({:?})", selector),
            Filter::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl From<&str> for Filter {
    fn from(selector: &str) -> Self {
        Filter::Selector(selector.to_string())
    }
}

/// Options for one sortable container.
#[derive(Debug, Clone)]
pub struct SortableOptions {
    pub group: Option<GroupOptions>,
    /// Allow reordering inside the container.
    pub sort: bool,
    pub disabled: bool,
    /// Drag only starts from elements matching this selector.
    pub handle: Option<String>,
    /// Items that can be dragged. `None` means `">li"` for lists and
    /// `">*"` otherwise.
    pub draggable: Option<String>,
    /// Fraction of the target's length, centered, that triggers a swap.
    pub swap_threshold: f32,
    pub invert_swap: bool,
    /// Falls back to `swap_threshold`.
    pub inverted_swap_threshold: Option<f32>,
    pub remove_clone_on_hide: bool,
    pub direction: Direction,
    pub ghost_class: String,
    pub chosen_class: String,
    pub drag_class: String,
    /// Descendants of the dragged item that lose native draggability.
    pub ignore: String,
    pub filter: Option<Filter>,
    pub prevent_on_filter: bool,
    /// Reorder animation in milliseconds, 0 disables.
    pub animation: u32,
    pub easing: Option<Easing>,
    pub drop_bubble: bool,
    pub dragover_bubble: bool,
    pub data_id_attr: String,
    /// Press-and-hold time before a drag starts, in milliseconds.
    pub delay: u32,
    pub delay_on_touch_only: bool,
    /// Pixels a pointer may move during `delay` before the press is
    /// abandoned. `None` uses the device pixel ratio.
    pub touch_start_threshold: Option<u32>,
    pub force_fallback: bool,
    pub fallback_class: String,
    pub fallback_on_body: bool,
    /// Pixels the pointer must travel before a fallback drag starts.
    pub fallback_tolerance: u32,
    pub fallback_offset: Vec2,
    /// `None` uses the platform capability.
    pub support_pointer: Option<bool>,
    /// Distance in pixels around an empty container that still counts as
    /// hovering it.
    pub empty_insert_threshold: f32,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            group: None,
            sort: true,
            disabled: false,
            handle: None,
            draggable: None,
            swap_threshold: 1.0,
            invert_swap: false,
            inverted_swap_threshold: None,
            remove_clone_on_hide: true,
            direction: Direction::Auto,
            ghost_class: "sortable-ghost".to_string(),
            chosen_class: "sortable-chosen".to_string(),
            drag_class: "sortable-drag".to_string(),
            ignore: "a, img".to_string(),
            filter: None,
            prevent_on_filter: true,
            animation: 0,
            easing: None,
            drop_bubble: false,
            dragover_bubble: false,
            data_id_attr: "data-id".to_string(),
            delay: 0,
            delay_on_touch_only: false,
            touch_start_threshold: None,
            force_fallback: false,
            fallback_class: "sortable-fallback".to_string(),
            fallback_on_body: false,
            fallback_tolerance: 0,
            fallback_offset: Vec2::ZERO,
            support_pointer: None,
            empty_insert_threshold: 5.0,
        }
    }
}

impl SortableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, group: impl Into<GroupOptions>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn handle(mut self, selector: &str) -> Self {
        self.handle = Some(selector.to_string());
        self
    }

    pub fn draggable(mut self, selector: &str) -> Self {
        self.draggable = Some(selector.to_string());
        self
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn swap_threshold(mut self, threshold: f32) -> Self {
        self.swap_threshold = threshold;
        self
    }

    pub fn invert_swap(mut self, invert: bool) -> Self {
        self.invert_swap = invert;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn animation(mut self, ms: u32) -> Self {
        self.animation = ms;
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.delay = ms;
        self
    }

    pub fn force_fallback(mut self, force: bool) -> Self {
        self.force_fallback = force;
        self
    }

    pub fn fallback_tolerance(mut self, px: u32) -> Self {
        self.fallback_tolerance = px;
        self
    }

    pub fn empty_insert_threshold(mut self, px: f32) -> Self {
        self.empty_insert_threshold = px;
        self
    }

    /// Item selector in effect for a container with this tag.
    pub fn draggable_for(&self, tag: &str) -> String {
        match &self.draggable {
            Some(selector) => selector.clone(),
            None if matches!(tag, "ul" | "ol") => ">li".to_string(),
            None => ">*".to_string(),
        }
    }

    pub fn inverted_threshold(&self) -> f32 {
        self.inverted_swap_threshold.unwrap_or(self.swap_threshold)
    }

    pub(crate) fn compile(&self, tag: &str) -> CompiledSelectors {
        let filter = match &self.filter {
            Some(Filter::Selector(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|criteria| !criteria.is_empty())
                .map(SelectorList::compile_lossy)
                .collect(),
            _ => Vec::new(),
        };
        CompiledSelectors {
            draggable: SelectorList::compile_lossy(&self.draggable_for(tag)),
            handle: self.handle.as_deref().map(SelectorList::compile_lossy),
            ignore: SelectorList::compile_lossy(&self.ignore),
            filter,
        }
    }
}

/// Selector options parsed once per registration or update.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledSelectors {
    pub draggable: SelectorList,
    pub handle: Option<SelectorList>,
    pub ignore: SelectorList,
    pub filter: Vec<SelectorList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SortableOptions::default();
        assert!(options.sort);
        assert_eq!(options.swap_threshold, 1.0);
        assert_eq!(options.inverted_threshold(), 1.0);
        assert_eq!(options.data_id_attr, "data-id");
        assert_eq!(options.empty_insert_threshold, 5.0);
        assert_eq!(options.animation, 0);
    }

    #[test]
    fn test_draggable_depends_on_tag() {
        let options = SortableOptions::default();
        assert_eq!(options.draggable_for("ul"), ">li");
        assert_eq!(options.draggable_for("ol"), ">li");
        assert_eq!(options.draggable_for("div"), ">*");
        assert_eq!(options.draggable(".item").draggable_for("ul"), ".item");
    }

    #[test]
    fn test_filter_selectors_split_on_commas() {
        let compiled = SortableOptions::new().filter(".locked, .pinned").compile("ul");
        assert_eq!(compiled.filter.len(), 2);
        assert!(compiled.handle.is_none());
    }
}
