use arrange_core::math::Vec2;
use arrange_dom::NodeId;

/// Device behind a `pointer*` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Which listener family delivered the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
    Pointer(PointerKind),
}

impl InputSource {
    /// True for touch events and touch pointers.
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            InputSource::Touch | InputSource::Pointer(PointerKind::Touch)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

impl MouseButton {
    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }
}

/// Position and routing data shared by every input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub source: InputSource,
    /// Client coordinates.
    pub position: Vec2,
    pub button: MouseButton,
    /// Element the event was dispatched to; hit-tested when `None`.
    pub target: Option<NodeId>,
    pub cancelable: bool,
}

impl PointerInput {
    pub fn new(source: InputSource, x: f32, y: f32) -> Self {
        Self {
            source,
            position: Vec2::new(x, y),
            button: MouseButton::Left,
            target: None,
            cancelable: true,
        }
    }

    pub fn mouse(x: f32, y: f32) -> Self {
        Self::new(InputSource::Mouse, x, y)
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self::new(InputSource::Touch, x, y)
    }

    pub fn pointer(kind: PointerKind, x: f32, y: f32) -> Self {
        Self::new(InputSource::Pointer(kind), x, y)
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }

    pub fn is_touch(&self) -> bool {
        self.source.is_touch()
    }
}

/// An input event delivered to the reorder engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// `mousedown`, `touchstart` or `pointerdown`.
    PointerDown(PointerInput),
    /// `mousemove`, `touchmove` or `pointermove`.
    PointerMove(PointerInput),
    /// `mouseup`, `touchend` or `pointerup`.
    PointerUp(PointerInput),
    /// `touchcancel` or `pointercancel`.
    PointerCancel(PointerInput),
    DragStart(PointerInput),
    DragEnter(PointerInput),
    DragOver(PointerInput),
    Drop(PointerInput),
    DragEnd(PointerInput),
    Click(PointerInput),
}

impl InputEvent {
    pub fn pointer(&self) -> &PointerInput {
        match self {
            InputEvent::PointerDown(p)
            | InputEvent::PointerMove(p)
            | InputEvent::PointerUp(p)
            | InputEvent::PointerCancel(p)
            | InputEvent::DragStart(p)
            | InputEvent::DragEnter(p)
            | InputEvent::DragOver(p)
            | InputEvent::Drop(p)
            | InputEvent::DragEnd(p)
            | InputEvent::Click(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::PointerDown(_) => "pointerdown",
            InputEvent::PointerMove(_) => "pointermove",
            InputEvent::PointerUp(_) => "pointerup",
            InputEvent::PointerCancel(_) => "pointercancel",
            InputEvent::DragStart(_) => "dragstart",
            InputEvent::DragEnter(_) => "dragenter",
            InputEvent::DragOver(_) => "dragover",
            InputEvent::Drop(_) => "drop",
            InputEvent::DragEnd(_) => "dragend",
            InputEvent::Click(_) => "click",
        }
    }

    /// Native drag-and-drop events, as opposed to pointer events.
    pub fn is_native_drag(&self) -> bool {
        matches!(
            self,
            InputEvent::DragStart(_)
                | InputEvent::DragEnter(_)
                | InputEvent::DragOver(_)
                | InputEvent::Drop(_)
                | InputEvent::DragEnd(_)
        )
    }
}

/// Events collected during one host frame, handled in order.
#[derive(Debug, Clone, Default)]
pub struct EventBatch {
    events: Vec<InputEvent>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Call `handler` for every event, emptying the batch.
    pub fn dispatch<H, R>(&mut self, handler: H) -> Vec<R>
    where
        H: FnMut(InputEvent) -> R,
    {
        self.events.drain(..).map(handler).collect()
    }
}

impl From<Vec<InputEvent>> for EventBatch {
    fn from(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_classification() {
        assert!(PointerInput::touch(0.0, 0.0).is_touch());
        assert!(PointerInput::pointer(PointerKind::Touch, 0.0, 0.0).is_touch());
        assert!(!PointerInput::pointer(PointerKind::Pen, 0.0, 0.0).is_touch());
        assert!(!PointerInput::mouse(0.0, 0.0).is_touch());
    }

    #[test]
    fn test_batch_dispatch_drains_in_order() {
        let mut batch = EventBatch::new();
        batch.push(InputEvent::PointerDown(PointerInput::mouse(1.0, 1.0)));
        batch.push(InputEvent::PointerUp(PointerInput::mouse(2.0, 2.0)));
        let names = batch.dispatch(|event| event.name());
        assert_eq!(names, vec!["pointerdown", "pointerup"]);
        assert!(batch.is_empty());
    }
}
