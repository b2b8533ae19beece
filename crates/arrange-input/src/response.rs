//! What the engine did with an event.

use crate::transfer::{DataTransfer, DropEffect};
use bitflags::bitflags;

bitflags! {
    /// Side effects a browser listener would have had on the event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResponseFlags: u8 {
        /// `preventDefault()` was called.
        const DEFAULT_PREVENTED   = 0b0000_0001;
        /// `stopPropagation()` was called.
        const PROPAGATION_STOPPED = 0b0000_0010;
        /// A `Click` was swallowed after a drag.
        const CLICK_SUPPRESSED    = 0b0000_0100;
        /// The event was routed to at least one container.
        const HANDLED             = 0b0000_1000;
    }
}

/// Returned from every event handed to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    pub flags: ResponseFlags,
    /// Set on native `dragover` while a drag is active.
    pub drop_effect: Option<DropEffect>,
    /// Filled on native `dragstart`.
    pub data_transfer: Option<DataTransfer>,
}

impl EventResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn default_prevented(&self) -> bool {
        self.flags.contains(ResponseFlags::DEFAULT_PREVENTED)
    }

    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(ResponseFlags::PROPAGATION_STOPPED)
    }

    pub fn click_suppressed(&self) -> bool {
        self.flags.contains(ResponseFlags::CLICK_SUPPRESSED)
    }

    pub fn is_handled(&self) -> bool {
        self.flags.contains(ResponseFlags::HANDLED)
    }

    pub fn prevent_default(&mut self) {
        self.flags |= ResponseFlags::DEFAULT_PREVENTED;
    }

    pub fn stop_propagation(&mut self) {
        self.flags |= ResponseFlags::PROPAGATION_STOPPED;
    }

    pub fn mark_handled(&mut self) {
        self.flags |= ResponseFlags::HANDLED;
    }

    pub fn suppress_click(&mut self) {
        self.flags |= ResponseFlags::CLICK_SUPPRESSED | ResponseFlags::DEFAULT_PREVENTED;
    }
}
