//! FLIP animation of container children.
//!
//! Before a DOM mutation the engine captures every visible child's rect
//! ("first"); afterwards it measures them again ("last"), translates each
//! moved child back to where it was ("invert") and transitions the
//! transform to zero ("play").
//!
//! # Example
//!
//! ```ignore
//! manager.capture(&mut ctx, list, 150);
//! doc.insert_before(list, dragged, Some(target))?;
//! let settled_now = manager.animate_all(&mut ctx, id, list, settings, on_settled);
//! ```

use crate::error::DomResultExt;
use crate::scheduler::{Deferred, Scheduler, TimerKey};
use crate::sortable::SortableId;
use arrange_core::alloc::HashMap;
use arrange_core::geometry::{Matrix2D, Rect};
use arrange_dom::query::current_transform_matrix;
use arrange_dom::{Display, Document, Easing, NodeId};

/// Animation bookkeeping attached to one element.
#[derive(Debug, Clone, Default)]
pub struct ElementAnimation {
    pub from_rect: Option<Rect>,
    pub to_rect: Option<Rect>,
    pub prev_from_rect: Option<Rect>,
    pub prev_to_rect: Option<Rect>,
    /// Duration of the running animation in ms, 0 when idle.
    pub this_animation_duration: f64,
    /// A settle transition is in flight.
    pub animated: bool,
    pub animating_x: bool,
    pub animating_y: bool,
}

/// Per-element animation state for the whole document.
#[derive(Debug, Default)]
pub struct ElementAnimations {
    elements: HashMap<NodeId, ElementAnimation>,
}

impl ElementAnimations {
    pub fn get(&self, node: NodeId) -> Option<&ElementAnimation> {
        self.elements.get(&node)
    }

    fn entry(&mut self, node: NodeId) -> &mut ElementAnimation {
        self.elements.entry(node).or_default()
    }

    pub fn is_animated(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|a| a.animated)
    }

    /// Moving on both axes at once.
    pub fn is_animating_diagonally(&self, node: NodeId) -> bool {
        self.get(node)
            .is_some_and(|a| a.animated && a.animating_x && a.animating_y)
    }

    /// Where the element is headed, while it animates.
    pub fn target_rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node).filter(|a| a.animated).and_then(|a| a.to_rect)
    }

    pub(crate) fn reset(&mut self, node: NodeId) {
        if let Some(entry) = self.elements.get_mut(&node) {
            entry.this_animation_duration = 0.0;
            entry.prev_from_rect = None;
            entry.from_rect = None;
            entry.prev_to_rect = None;
        }
    }

    /// Finish the settle transition of `node`.
    pub(crate) fn end(&mut self, doc: &mut Document, node: NodeId) {
        if doc.exists(node) {
            doc.set_css(node, "transition", "").or_trace("clear transition");
            doc.set_css(node, "transform", "").or_trace("clear transform");
        }
        if let Some(entry) = self.elements.get_mut(&node) {
            entry.animated = false;
            entry.animating_x = false;
            entry.animating_y = false;
        }
    }

    pub(crate) fn forget(&mut self, node: NodeId) {
        self.elements.remove(&node);
    }
}

/// Borrowed engine state the animation manager works on.
pub struct AnimationContext<'a> {
    pub document: &'a mut Document,
    pub scheduler: &'a mut Scheduler,
    pub elements: &'a mut ElementAnimations,
    pub ghost: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationSettings {
    pub duration_ms: u32,
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, Copy)]
struct AnimationState {
    target: NodeId,
    rect: Rect,
}

/// Captured child rects of one container.
#[derive(Debug, Default)]
pub struct AnimationStateManager {
    states: Vec<AnimationState>,
}

impl AnimationStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every visible child of `container` except the ghost.
    pub fn capture(&mut self, ctx: &mut AnimationContext<'_>, container: NodeId, duration_ms: u32) {
        self.states.clear();
        if duration_ms == 0 {
            return;
        }

        let children = ctx.document.children(container).to_vec();
        for child in children {
            let hidden = ctx
                .document
                .style(child)
                .is_none_or(|s| s.display == Display::None);
            if hidden || Some(child) == ctx.ghost {
                continue;
            }
            let rect = ctx.document.client_rect(child);
            let mut from_rect = rect;
            let entry = ctx.elements.entry(child);
            if entry.this_animation_duration > 0.0 {
                if let Some(matrix) = current_transform_matrix(ctx.document, child, true) {
                    from_rect.top -= matrix.f;
                    from_rect.left -= matrix.e;
                }
            }
            entry.from_rect = Some(from_rect);
            self.states.push(AnimationState {
                target: child,
                rect,
            });
        }
    }

    /// Animate every captured child from its captured rect to where it is
    /// now.
    ///
    /// Returns true when nothing animates and `on_settled` should run
    /// right away; otherwise `on_settled` is scheduled for when the
    /// longest animation ends.
    pub fn animate_all(
        &mut self,
        ctx: &mut AnimationContext<'_>,
        sortable: SortableId,
        container: NodeId,
        settings: AnimationSettings,
        on_settled: Deferred,
    ) -> bool {
        arrange_core::profiling::profile_function!();
        ctx.scheduler.cancel(TimerKey::Settled(sortable));
        if settings.duration_ms == 0 {
            self.states.clear();
            return true;
        }

        let duration = f64::from(settings.duration_ms);
        let mut animating = false;
        let mut animation_time = 0.0f64;

        for state in std::mem::take(&mut self.states) {
            let target = state.target;
            if !ctx.document.exists(target) {
                continue;
            }
            let animating_rect = state.rect;
            let mut to_rect = ctx.document.client_rect(target);
            if let Some(matrix) = current_transform_matrix(ctx.document, target, true) {
                to_rect.top -= matrix.f;
                to_rect.left -= matrix.e;
            }

            let entry = ctx.elements.entry(target);
            entry.to_rect = Some(to_rect);
            let from_rect = entry.from_rect.unwrap_or(animating_rect);
            let mut time = 0.0;

            if entry.this_animation_duration > 0.0 {
                if let (Some(prev_from), Some(prev_to)) = (entry.prev_from_rect, entry.prev_to_rect) {
                    // Returning along the line it just travelled: finish
                    // in proportion to the distance already covered.
                    if prev_from.same_pixels(&to_rect)
                        && !from_rect.same_pixels(&to_rect)
                        && same_slope(animating_rect, from_rect, to_rect)
                    {
                        time = real_time(animating_rect, prev_from, prev_to, duration);
                    }
                }
            }

            if !to_rect.same_pixels(&from_rect) {
                entry.prev_from_rect = Some(from_rect);
                entry.prev_to_rect = Some(to_rect);
                if time == 0.0 {
                    time = duration;
                }
                animate(ctx, container, target, animating_rect, to_rect, time, settings.easing);
            }

            if time > 0.0 {
                animating = true;
                animation_time = animation_time.max(time);
                ctx.scheduler.schedule(time, Deferred::AnimationReset(target));
                ctx.elements.entry(target).this_animation_duration = time;
            }
        }

        if !animating {
            return true;
        }
        ctx.scheduler.schedule(animation_time, on_settled);
        false
    }
}

fn same_slope(animating: Rect, from: Rect, to: Rect) -> bool {
    (animating.top - to.top) / (animating.left - to.left) == (from.top - to.top) / (from.left - to.left)
}

/// Time left for an element that is part way back from `to` to `from`.
pub fn real_time(animating: Rect, from: Rect, to: Rect, duration_ms: f64) -> f64 {
    let travelled = f64::from((from.top - animating.top).hypot(from.left - animating.left));
    let total = f64::from((from.top - to.top).hypot(from.left - to.left));
    if total == 0.0 {
        return duration_ms;
    }
    travelled / total * duration_ms
}

/// Translate `target` back to `current_rect`, then transition to its
/// natural position over `duration_ms`.
pub fn animate(
    ctx: &mut AnimationContext<'_>,
    container: NodeId,
    target: NodeId,
    current_rect: Rect,
    to_rect: Rect,
    duration_ms: f64,
    easing: Option<Easing>,
) {
    if duration_ms <= 0.0 {
        return;
    }
    let doc = &mut *ctx.document;
    doc.set_css(target, "transition", "").or_trace("reset transition");
    doc.set_css(target, "transform", "").or_trace("reset transform");

    let (scale_x, scale_y) = current_transform_matrix(doc, container, false)
        .map(|m| (m.a, m.d))
        .filter(|(a, d)| *a != 0.0 && *d != 0.0)
        .unwrap_or((1.0, 1.0));
    let translate_x = (current_rect.left - to_rect.left) / scale_x;
    let translate_y = (current_rect.top - to_rect.top) / scale_y;

    let entry = ctx.elements.entry(target);
    entry.animating_x = translate_x != 0.0;
    entry.animating_y = translate_y != 0.0;

    doc.set_transform(target, Some(Matrix2D::translation(translate_x, translate_y)))
        .or_trace("invert transform");
    let easing = easing.map(|e| format!(" {}", e.to_css())).unwrap_or_default();
    doc.set_css(
        target,
        "transition",
        &format!("transform {}ms{}", duration_ms, easing),
    )
    .or_trace("set transition");
    doc.set_transform(target, Some(Matrix2D::IDENTITY))
        .or_trace("play transform");

    entry.animated = true;
    ctx.scheduler.schedule(duration_ms, Deferred::TransitionEnd(target));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_time_is_proportional() {
        let from = Rect::new(0.0, 0.0, 10.0, 10.0);
        let to = Rect::new(0.0, 100.0, 10.0, 10.0);
        let halfway = Rect::new(0.0, 50.0, 10.0, 10.0);
        assert_eq!(real_time(halfway, from, to, 200.0), 100.0);
        assert_eq!(real_time(halfway, from, from, 200.0), 200.0);
    }

    #[test]
    fn test_reset_keeps_target_rect() {
        let mut elements = ElementAnimations::default();
        let node = NodeId(4);
        {
            let entry = elements.entry(node);
            entry.to_rect = Some(Rect::new(0.0, 40.0, 10.0, 10.0));
            entry.from_rect = Some(Rect::default());
            entry.this_animation_duration = 150.0;
            entry.animated = true;
        }
        elements.reset(node);
        let entry = elements.get(node).unwrap();
        assert_eq!(entry.this_animation_duration, 0.0);
        assert!(entry.from_rect.is_none());
        assert_eq!(elements.target_rect(node), Some(Rect::new(0.0, 40.0, 10.0, 10.0)));
    }
}
