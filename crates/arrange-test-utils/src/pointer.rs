//! Scripted pointer gestures.

use arrange::{HOVER_POLL_MS, SortableSystem};
use arrange_core::math::Vec2;
use arrange_input::{EventResponse, InputEvent, InputSource, PointerInput};

/// A pointer device that sends events to a [`SortableSystem`].
#[derive(Debug, Clone, Copy)]
pub struct Pointer {
    source: InputSource,
}

impl Pointer {
    pub fn mouse() -> Self {
        Self {
            source: InputSource::Mouse,
        }
    }

    pub fn touch() -> Self {
        Self {
            source: InputSource::Touch,
        }
    }

    pub fn input(&self, at: Vec2) -> PointerInput {
        PointerInput::new(self.source, at.x, at.y)
    }

    pub fn press(&self, system: &mut SortableSystem, at: Vec2) -> EventResponse {
        system.handle_event(InputEvent::PointerDown(self.input(at)))
    }

    pub fn move_to(&self, system: &mut SortableSystem, at: Vec2) -> EventResponse {
        system.handle_event(InputEvent::PointerMove(self.input(at)))
    }

    pub fn release(&self, system: &mut SortableSystem, at: Vec2) -> EventResponse {
        system.handle_event(InputEvent::PointerUp(self.input(at)))
    }

    /// Move to `at` and let one hover poll run.
    pub fn hover(&self, system: &mut SortableSystem, at: Vec2) -> EventResponse {
        let response = self.move_to(system, at);
        system.advance(HOVER_POLL_MS);
        response
    }

    /// Press at `from` and start a fallback drag, leaving the item picked up.
    pub fn pick(&self, system: &mut SortableSystem, from: Vec2) {
        self.press(system, from);
        self.move_to(system, from + Vec2::new(0.0, 1.0));
        system.advance(0.0);
    }

    /// A complete fallback drag: pick the item at `from`, hover `to` for
    /// one poll and release there. Returns the release response.
    pub fn fallback_drag(&self, system: &mut SortableSystem, from: Vec2, to: Vec2) -> EventResponse {
        self.pick(system, from);
        self.hover(system, to);
        self.release(system, to)
    }
}
