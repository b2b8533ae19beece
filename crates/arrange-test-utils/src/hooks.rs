//! Hooks that record what the engine told them.

use std::sync::Arc;

use arrange::{MoveEvent, MoveVerdict, SortableEvent, SortableEventKind, SortableHooks, SortableId};
use arrange_dom::NodeId;
use parking_lot::Mutex;

/// A move check as seen by [`RecordingHooks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub dragged: NodeId,
    pub related: NodeId,
    pub will_insert_after: bool,
}

#[derive(Default)]
struct Recorded {
    events: Vec<SortableEvent>,
    moves: Vec<MoveRecord>,
    verdict: MoveVerdict,
}

/// Shared event log.
///
/// Give one clone to each container under test and keep one to assert on;
/// they all write to the same log.
#[derive(Clone, Default)]
pub struct RecordingHooks {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SortableEvent> {
        self.inner.lock().events.clone()
    }

    pub fn kinds(&self) -> Vec<SortableEventKind> {
        self.inner.lock().events.iter().map(|e| e.kind).collect()
    }

    /// Kinds received by one container.
    pub fn kinds_for(&self, sortable: SortableId) -> Vec<SortableEventKind> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| e.sortable == sortable)
            .map(|e| e.kind)
            .collect()
    }

    /// Most recent event of `kind`.
    pub fn last(&self, kind: SortableEventKind) -> Option<SortableEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .cloned()
    }

    pub fn count(&self, kind: SortableEventKind) -> usize {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    pub fn moves(&self) -> Vec<MoveRecord> {
        self.inner.lock().moves.clone()
    }

    /// Answer every following move check with `verdict`.
    pub fn set_move_verdict(&self, verdict: MoveVerdict) {
        self.inner.lock().verdict = verdict;
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.events.clear();
        inner.moves.clear();
    }
}

impl SortableHooks for RecordingHooks {
    fn on_move(&self, event: &MoveEvent<'_>) -> MoveVerdict {
        let mut inner = self.inner.lock();
        inner.moves.push(MoveRecord {
            from: event.from,
            to: event.to,
            dragged: event.dragged,
            related: event.related,
            will_insert_after: event.will_insert_after,
        });
        inner.verdict
    }

    fn on_event(&self, event: &SortableEvent) {
        self.inner.lock().events.push(event.clone());
    }
}
