//! Virtual-time timers for deferred engine work.
//!
//! Nothing here runs on its own: [`SortableSystem::advance`] pops due
//! actions in deadline order (ties broken by scheduling order) and
//! executes them.
//!
//! [`SortableSystem::advance`]: crate::SortableSystem::advance

use crate::sortable::SortableId;
use arrange_dom::NodeId;

/// Work the engine schedules for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// The press-and-hold delay elapsed.
    DelayedDragStart,
    /// Insert the hidden clone next to the dragged item.
    CloneTick,
    /// Confirm that a drag started.
    DragStarted { fallback: bool },
    /// Fallback hover poll, repeats while dragging.
    EmulateDragOver,
    /// End the post-insertion silence window.
    Unsilence,
    /// Forget the animation bookkeeping of an element.
    AnimationReset(NodeId),
    /// Strip the transition styles once an element settled.
    TransitionEnd(NodeId),
    /// Every animation of a container finished.
    Settled {
        sortable: SortableId,
        clear_ignore: bool,
    },
}

/// Identity of a timer; scheduling replaces any pending timer with the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    DelayedDragStart,
    CloneTick,
    DragStarted,
    HoverLoop,
    Unsilence,
    AnimationReset(NodeId),
    TransitionEnd(NodeId),
    Settled(SortableId),
}

impl Deferred {
    pub fn key(&self) -> TimerKey {
        match *self {
            Deferred::DelayedDragStart => TimerKey::DelayedDragStart,
            Deferred::CloneTick => TimerKey::CloneTick,
            Deferred::DragStarted { .. } => TimerKey::DragStarted,
            Deferred::EmulateDragOver => TimerKey::HoverLoop,
            Deferred::Unsilence => TimerKey::Unsilence,
            Deferred::AnimationReset(node) => TimerKey::AnimationReset(node),
            Deferred::TransitionEnd(node) => TimerKey::TransitionEnd(node),
            Deferred::Settled { sortable, .. } => TimerKey::Settled(sortable),
        }
    }
}

#[derive(Debug, Clone)]
struct Timer {
    deadline: f64,
    seq: u64,
    action: Deferred,
    interval: Option<f64>,
}

/// Timer queue on a virtual millisecond clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `action` once, `after_ms` from now.
    pub fn schedule(&mut self, after_ms: f64, action: Deferred) {
        self.push(after_ms.max(0.0), action, None);
    }

    /// Run `action` every `interval_ms`, first after one interval.
    pub fn schedule_repeating(&mut self, interval_ms: f64, action: Deferred) {
        let interval = interval_ms.max(1.0);
        self.push(interval, action, Some(interval));
    }

    fn push(&mut self, after_ms: f64, action: Deferred, interval: Option<f64>) {
        self.cancel(action.key());
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            deadline: self.now + after_ms,
            seq,
            action,
            interval,
        });
    }

    /// Returns true if a timer was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.action.key() != key);
        before != self.timers.len()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.timers.iter().any(|t| t.action.key() == key)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.iter().map(|t| t.deadline).reduce(f64::min)
    }

    /// Remove and return the earliest action due at or before `until`,
    /// moving the clock to its deadline. Repeating timers are re-armed.
    pub(crate) fn pop_due(&mut self, until: f64) -> Option<Deferred> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;

        let timer = self.timers.remove(index);
        self.now = self.now.max(timer.deadline);
        if let Some(interval) = timer.interval {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.timers.push(Timer {
                deadline: timer.deadline + interval,
                seq,
                ..timer.clone()
            });
        }
        Some(timer.action)
    }

    pub(crate) fn set_now(&mut self, now: f64) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, until: f64) -> Vec<(f64, Deferred)> {
        let mut fired = Vec::new();
        while let Some(action) = scheduler.pop_due(until) {
            fired.push((scheduler.now(), action));
        }
        scheduler.set_now(until);
        fired
    }

    #[test]
    fn test_zero_delay_fires_in_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, Deferred::CloneTick);
        scheduler.schedule(0.0, Deferred::DragStarted { fallback: true });
        let fired = drain(&mut scheduler, 0.0);
        assert_eq!(
            fired,
            vec![
                (0.0, Deferred::CloneTick),
                (0.0, Deferred::DragStarted { fallback: true })
            ]
        );
    }

    #[test]
    fn test_deadline_order_and_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(30.0, Deferred::Unsilence);
        scheduler.schedule(10.0, Deferred::DelayedDragStart);
        let fired = drain(&mut scheduler, 20.0);
        assert_eq!(fired, vec![(10.0, Deferred::DelayedDragStart)]);
        assert_eq!(scheduler.now(), 20.0);
        assert!(scheduler.is_pending(TimerKey::Unsilence));
    }

    #[test]
    fn test_keyed_timer_replaces_previous() {
        let mut scheduler = Scheduler::new();
        let node = NodeId(3);
        scheduler.schedule(100.0, Deferred::TransitionEnd(node));
        scheduler.schedule(50.0, Deferred::TransitionEnd(node));
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.next_deadline(), Some(50.0));
        assert!(scheduler.cancel(TimerKey::TransitionEnd(node)));
        assert!(!scheduler.cancel(TimerKey::TransitionEnd(node)));
    }

    #[test]
    fn test_repeating_timer_rearms() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(50.0, Deferred::EmulateDragOver);
        let fired = drain(&mut scheduler, 120.0);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[1].0, 100.0);
        assert_eq!(scheduler.next_deadline(), Some(150.0));
    }
}
