//! Geometry and tree queries the reorder engine builds on.

use crate::document::{Document, NodeId};
use crate::selector::SelectorList;
use crate::style::{Display, Position};
use arrange_core::geometry::{Matrix2D, Rect};
use arrange_core::math::Vec2;

/// How [`bounding_rect`] should adjust the client rectangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectOptions {
    /// Make the rect relative to the nearest transformed ancestor.
    pub relative_to_containing_block: bool,
    /// Also treat non-static ancestors as the containing block.
    pub relative_to_non_static_parent: bool,
    /// Divide out the accumulated scale of `container` (or the element).
    pub undo_scale: bool,
    /// Where to start the ancestor search; defaults to the parent.
    pub container: Option<NodeId>,
}

/// Client rect of `el`, optionally relative to a containing block and
/// with ancestor scale undone.
pub fn bounding_rect(doc: &Document, el: NodeId, options: RectOptions) -> Rect {
    let mut rect = doc.client_rect(el);
    if el == doc.body() {
        return rect;
    }

    let mut container = options.container.or_else(|| doc.parent(el));
    if options.relative_to_containing_block || options.relative_to_non_static_parent {
        while let Some(id) = container {
            let transformed = doc.style(id).is_some_and(|s| s.transform.is_some());
            let non_static = options.relative_to_non_static_parent
                && doc.style(id).is_some_and(|s| s.position != Position::Static);
            if transformed || non_static {
                let container_rect = doc.client_rect(id);
                let border = doc.style(id).map(|s| s.border).unwrap_or_default();
                rect.top -= container_rect.top + border.top;
                rect.left -= container_rect.left + border.left;
                break;
            }
            container = doc.parent(id);
        }
    }

    if options.undo_scale {
        if let Some(m) = current_transform_matrix(doc, container.unwrap_or(el), false) {
            if m.a != 0.0 && m.d != 0.0 {
                rect.top /= m.d;
                rect.left /= m.a;
                rect.width /= m.a;
                rect.height /= m.d;
            }
        }
    }
    rect
}

/// Accumulated transform of `el` and (unless `self_only`) its ancestors.
///
/// `None` when no element on the path declares a transform.
pub fn current_transform_matrix(doc: &Document, el: NodeId, self_only: bool) -> Option<Matrix2D> {
    let mut applied: Option<Matrix2D> = None;
    let mut current = Some(el);
    while let Some(id) = current {
        if doc.style(id).is_some_and(|s| s.transform.is_some()) {
            let own = doc.computed_transform(id);
            applied = Some(match applied {
                Some(inner) => own.then(&inner),
                None => own,
            });
        }
        if self_only {
            break;
        }
        current = doc.parent(id);
    }
    applied
}

/// Index of `el` among its siblings, counting only those that match
/// `selector` (if any) and are not in `exclude`.
///
/// `None` when `el` is detached or missing.
pub fn matching_child_index(
    doc: &Document,
    el: NodeId,
    selector: Option<&SelectorList>,
    exclude: &[NodeId],
) -> Option<usize> {
    let parent = doc.parent(el)?;
    let position = doc.index_in_parent(el)?;
    let count = doc.children(parent)[..position]
        .iter()
        .filter(|&&sibling| {
            doc.tag(sibling) != Some("template")
                && !exclude.contains(&sibling)
                && selector.is_none_or(|s| s.matches(doc, sibling, Some(parent)))
        })
        .count();
    Some(count)
}

/// Nearest inclusive ancestor of `node` matching `selector`, stopping at
/// `scope`. Anchored selectors require the candidate's parent to be `scope`.
pub fn closest(
    doc: &Document,
    node: NodeId,
    selector: Option<&SelectorList>,
    scope: Option<NodeId>,
    include_scope: bool,
) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if selector.is_some_and(|s| s.matches(doc, id, scope))
            || (include_scope && Some(id) == scope)
        {
            return Some(id);
        }
        if Some(id) == scope {
            break;
        }
        current = doc.parent(id);
    }
    None
}

fn is_hidden(doc: &Document, node: NodeId) -> bool {
    doc.style(node).is_none_or(|s| s.display == Display::None)
}

/// The `n`th visible child of `el` matching `draggable`, skipping the
/// ghost and, when given, the dragged element.
pub fn child_at(
    doc: &Document,
    el: NodeId,
    n: usize,
    draggable: &SelectorList,
    ghost: Option<NodeId>,
    skip_dragged: Option<NodeId>,
) -> Option<NodeId> {
    doc.children(el)
        .iter()
        .copied()
        .filter(|&child| {
            !is_hidden(doc, child)
                && Some(child) != ghost
                && Some(child) != skip_dragged
                && closest(doc, child, Some(draggable), Some(el), false).is_some()
        })
        .nth(n)
}

/// Last child of `el` that is visible, not the ghost, and matches
/// `selector` if one is given.
pub fn last_matching_child(
    doc: &Document,
    el: NodeId,
    selector: Option<&SelectorList>,
    ghost: Option<NodeId>,
) -> Option<NodeId> {
    doc.children(el).iter().rev().copied().find(|&child| {
        Some(child) != ghost
            && !is_hidden(doc, child)
            && selector.is_none_or(|s| s.matches(doc, child, Some(el)))
    })
}

/// Scroll offset of `el` and its ancestors up to the window scroller,
/// scaled by each element's accumulated transform.
pub fn relative_scroll_offset(doc: &Document, el: NodeId) -> Vec2 {
    let scroller = window_scrolling_element(doc);
    let mut offset = Vec2::ZERO;
    let mut current = Some(el);
    while let Some(id) = current {
        let scale = current_transform_matrix(doc, id, false)
            .map(|m| Vec2::new(m.a, m.d))
            .unwrap_or(Vec2::ONE);
        offset += doc.scroll_offset(id) * scale;
        if id == scroller {
            break;
        }
        current = doc.parent(id);
    }
    offset
}

/// The element that scrolls the viewport.
pub fn window_scrolling_element(doc: &Document) -> NodeId {
    doc.body()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    fn list(doc: &mut Document, n: usize) -> (NodeId, Vec<NodeId>) {
        let ul = doc.create_element_with("ul", Style::new().width(100.0)).unwrap();
        doc.append_child(doc.body(), ul).unwrap();
        let items = (0..n)
            .map(|_| {
                let li = doc.create_element_with("li", Style::new().height(20.0)).unwrap();
                doc.append_child(ul, li).unwrap();
                li
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn test_index_skips_excluded() {
        let mut doc = Document::new(200.0, 200.0).unwrap();
        let (_, items) = list(&mut doc, 4);
        assert_eq!(matching_child_index(&doc, items[3], None, &[]), Some(3));
        assert_eq!(matching_child_index(&doc, items[3], None, &[items[1]]), Some(2));
        let odd = SelectorList::parse(".odd").unwrap();
        doc.add_class(items[1], "odd");
        assert_eq!(matching_child_index(&doc, items[3], Some(&odd), &[]), Some(1));
    }

    #[test]
    fn test_closest_with_scope() {
        let mut doc = Document::new(200.0, 200.0).unwrap();
        let (ul, items) = list(&mut doc, 2);
        let span = doc.create_element("span").unwrap();
        doc.append_child(items[0], span).unwrap();

        let anchored = SelectorList::parse(">*").unwrap();
        assert_eq!(closest(&doc, span, Some(&anchored), Some(ul), false), Some(items[0]));
        assert_eq!(closest(&doc, span, None, Some(ul), true), Some(ul));
        assert_eq!(closest(&doc, span, Some(&anchored), None, false), None);
    }

    #[test]
    fn test_child_at_skips_hidden_and_ghost() {
        let mut doc = Document::new(200.0, 200.0).unwrap();
        let (ul, items) = list(&mut doc, 4);
        doc.set_css(items[0], "display", "none").unwrap();
        let all = SelectorList::parse(">*").unwrap();
        assert_eq!(child_at(&doc, ul, 0, &all, Some(items[1]), None), Some(items[2]));
        assert_eq!(child_at(&doc, ul, 1, &all, None, Some(items[2])), Some(items[3]));
        assert_eq!(
            last_matching_child(&doc, ul, None, Some(items[3])),
            Some(items[2])
        );
    }

    #[test]
    fn test_rect_relative_to_transformed_container() {
        let mut doc = Document::new(400.0, 400.0).unwrap();
        let (ul, items) = list(&mut doc, 2);
        doc.set_css(ul, "transform", "translate(50px, 10px) scale(2)").unwrap();

        let matrix = current_transform_matrix(&doc, items[1], false).unwrap();
        assert_eq!(matrix.a, 2.0);
        assert!(current_transform_matrix(&doc, items[1], true).is_none());

        let rect = bounding_rect(
            &doc,
            items[1],
            RectOptions {
                relative_to_containing_block: true,
                undo_scale: true,
                ..Default::default()
            },
        );
        assert_eq!(rect.top, 20.0);
        assert_eq!(rect.width, 100.0);
    }

    #[test]
    fn test_scroll_offset_accumulates() {
        let mut doc = Document::new(200.0, 200.0).unwrap();
        let (ul, items) = list(&mut doc, 1);
        doc.set_scroll(ul, Vec2::new(0.0, 15.0)).unwrap();
        doc.set_scroll(doc.body(), Vec2::new(0.0, 5.0)).unwrap();
        assert_eq!(relative_scroll_offset(&doc, items[0]), Vec2::new(0.0, 20.0));
    }
}
