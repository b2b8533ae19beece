//! Swap decisions and the geometry helpers around them.
//!
//! Everything here is a pure function of rectangles and pointer
//! coordinates, apart from [`detect_direction`] which reads styles.

use crate::options::Axis;
use arrange_core::geometry::Rect;
use arrange_core::math::Vec2;
use arrange_dom::query::child_at;
use arrange_dom::{Clear, Display, Document, Float, NodeId, SelectorList};

/// Pixels beyond the first/last item that still count as "past" it.
const SPACER: f32 = 10.0;

/// Inputs to [`swap_direction`].
#[derive(Debug, Clone, Copy)]
pub struct SwapInput {
    /// Pointer coordinate on the sort axis.
    pub pointer: f32,
    pub target_rect: Rect,
    pub vertical: bool,
    pub swap_threshold: f32,
    pub inverted_swap_threshold: f32,
    pub invert_swap: bool,
    /// The target is the same element as on the previous swap.
    pub is_last_target: bool,
    /// How far the target moved on its first swap.
    pub target_move_distance: f32,
    pub past_first_invert_threshold: bool,
    /// Direction of the previous swap, 0 if none.
    pub last_direction: i8,
    /// 1 when the dragged element precedes the target, -1 otherwise.
    pub insert_direction: i8,
}

/// Result of [`swap_direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapDecision {
    /// -1 inserts before the target, 1 after, 0 leaves things alone.
    pub direction: i8,
    pub past_first_invert_threshold: bool,
}

/// Decide whether the pointer over `target_rect` should swap the dragged
/// element with it.
///
/// When the pointer stays over a target that just moved out from under
/// it, the area the target vacated is dead until the pointer crosses the
/// inverted threshold on the far side. This keeps the two elements from
/// trading places back and forth while the target is still animating.
pub fn swap_direction(input: &SwapInput) -> SwapDecision {
    let SwapInput {
        pointer,
        target_rect,
        vertical,
        swap_threshold,
        inverted_swap_threshold,
        mut invert_swap,
        is_last_target,
        target_move_distance,
        mut past_first_invert_threshold,
        last_direction,
        insert_direction,
    } = *input;

    let (length, s1) = if vertical {
        (target_rect.height, target_rect.top)
    } else {
        (target_rect.width, target_rect.left)
    };
    let s2 = s1 + length;
    let decide = |direction: i8, past: bool| SwapDecision {
        direction,
        past_first_invert_threshold: past,
    };

    if !invert_swap {
        if is_last_target && target_move_distance < length * swap_threshold {
            if !past_first_invert_threshold {
                let crossed = if last_direction == 1 {
                    pointer > s1 + length * inverted_swap_threshold / 2.0
                } else {
                    pointer < s2 - length * inverted_swap_threshold / 2.0
                };
                if crossed {
                    past_first_invert_threshold = true;
                }
            }

            if !past_first_invert_threshold {
                let in_shadow = if last_direction == 1 {
                    pointer < s1 + target_move_distance
                } else {
                    pointer > s2 - target_move_distance
                };
                if in_shadow {
                    return decide(-last_direction, past_first_invert_threshold);
                }
            } else {
                invert_swap = true;
            }
        } else {
            let band = length * (1.0 - swap_threshold) / 2.0;
            if pointer > s1 + band && pointer < s2 - band {
                return decide(insert_direction, past_first_invert_threshold);
            }
        }
    }

    if invert_swap {
        let band = length * inverted_swap_threshold / 2.0;
        if pointer < s1 + band || pointer > s2 - band {
            let direction = if pointer > s1 + length / 2.0 { 1 } else { -1 };
            return decide(direction, past_first_invert_threshold);
        }
    }

    decide(0, past_first_invert_threshold)
}

/// 1 when `drag_index` precedes `target_index`, -1 otherwise.
pub fn insert_direction(drag_index: Option<usize>, target_index: Option<usize>) -> i8 {
    match (drag_index, target_index) {
        (Some(drag), Some(target)) if drag < target => 1,
        _ => -1,
    }
}

/// Is the pointer before the first item, so the dragged element belongs
/// at the start?
pub fn ghost_is_first(pointer: Vec2, first: Rect, vertical: bool) -> bool {
    if vertical {
        pointer.x < first.left - SPACER || (pointer.y < first.top && pointer.x < first.right())
    } else {
        pointer.y < first.top - SPACER || (pointer.y < first.bottom() && pointer.x < first.left)
    }
}

/// Is the pointer past the last item, so the dragged element belongs at
/// the end?
pub fn ghost_is_last(pointer: Vec2, last: Rect, vertical: bool) -> bool {
    if vertical {
        pointer.x > last.right() + SPACER
            || (pointer.x <= last.right() && pointer.y > last.bottom() && pointer.x >= last.left)
    } else {
        (pointer.x > last.right() && pointer.y > last.top)
            || (pointer.x <= last.right() && pointer.y > last.bottom() + SPACER)
    }
}

/// Do both rectangles sit in the same row (horizontal) or column
/// (vertical)? Compares the edges and center on the cross axis.
pub fn drag_in_row_column(drag: Rect, target: Rect, vertical: bool) -> bool {
    let (d1, d2, dl) = if vertical {
        (drag.left, drag.right(), drag.width)
    } else {
        (drag.top, drag.bottom(), drag.height)
    };
    let (t1, t2, tl) = if vertical {
        (target.left, target.right(), target.width)
    } else {
        (target.top, target.bottom(), target.height)
    };
    d1 == t1 || d2 == t2 || d1 + dl / 2.0 == t1 + tl / 2.0
}

/// Whether `pointer` is within `threshold` pixels of `rect` on both axes.
pub fn within_insert_threshold(pointer: Vec2, rect: Rect, threshold: f32) -> bool {
    let inside_x = pointer.x >= rect.left - threshold && pointer.x <= rect.right() + threshold;
    let inside_y = pointer.y >= rect.top - threshold && pointer.y <= rect.bottom() + threshold;
    inside_x && inside_y
}

/// Guess the sort axis of `el` from its display mode and the layout of
/// its first two items.
pub fn detect_direction(
    doc: &Document,
    el: NodeId,
    draggable: &SelectorList,
    ghost: Option<NodeId>,
    dragged: Option<NodeId>,
) -> Axis {
    let Some(style) = doc.style(el) else {
        return Axis::Vertical;
    };
    let width = doc.layout_rect(el).width
        - style.padding.left
        - style.padding.right
        - style.border.left
        - style.border.right;

    match style.display {
        Display::Flex => {
            return if style.flex_direction.is_column() {
                Axis::Vertical
            } else {
                Axis::Horizontal
            };
        }
        Display::Grid => {
            return if style.grid_columns <= 1 {
                Axis::Vertical
            } else {
                Axis::Horizontal
            };
        }
        _ => {}
    }

    let first = child_at(doc, el, 0, draggable, ghost, dragged);
    let second = child_at(doc, el, 1, draggable, ghost, dragged);
    let outer_width = |child: NodeId| {
        let margin = doc.style(child).map(|s| s.margin).unwrap_or_default();
        margin.left + margin.right + doc.client_rect(child).width
    };

    let Some(first) = first else {
        return Axis::Horizontal;
    };
    let first_style = doc.style(first).cloned().unwrap_or_default();
    if first_style.float != Float::None {
        let touching = if first_style.float == Float::Left {
            Clear::Left
        } else {
            Clear::Right
        };
        let cleared = second
            .and_then(|s| doc.style(s))
            .is_some_and(|s| s.clear == Clear::Both || s.clear == touching);
        return if cleared { Axis::Vertical } else { Axis::Horizontal };
    }

    let first_width = outer_width(first);
    let stacked = matches!(
        first_style.display,
        Display::Block | Display::Flex | Display::Table | Display::Grid
    ) || (first_width >= width && style.float == Float::None)
        || second.is_some_and(|second| {
            style.float == Float::None && first_width + outer_width(second) > width
        });
    if stacked { Axis::Vertical } else { Axis::Horizontal }
}
