//! Capabilities of the host the engine runs in.

/// What the host supports. Replaces user-agent sniffing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    /// HTML5 drag and drop is available.
    pub native_drag: bool,
    /// `pointer*` events are delivered.
    pub pointer_events: bool,
    /// `pointer-events: none` is honoured by hit testing.
    pub css_pointer_events: bool,
    pub device_pixel_ratio: f32,
    /// Position the ghost with `absolute` inside its container instead of
    /// `fixed` in the viewport.
    pub position_ghost_absolutely: bool,
}

impl Default for Platform {
    fn default() -> Self {
        Self::headless()
    }
}

impl Platform {
    /// Pointer and touch only; every drag uses the fallback ghost.
    pub fn headless() -> Self {
        Self {
            native_drag: false,
            pointer_events: true,
            css_pointer_events: true,
            device_pixel_ratio: 1.0,
            position_ghost_absolutely: false,
        }
    }

    /// A desktop browser with native drag and drop.
    pub fn desktop() -> Self {
        Self {
            native_drag: true,
            ..Self::headless()
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_css_pointer_events(mut self, supported: bool) -> Self {
        self.css_pointer_events = supported;
        self
    }

    pub fn with_ghost_positioned_absolutely(mut self, absolute: bool) -> Self {
        self.position_ghost_absolutely = absolute;
        self
    }

    /// Default press-move tolerance: the device pixel ratio, at least 1.
    pub fn touch_start_threshold(&self) -> u32 {
        (self.device_pixel_ratio.floor() as u32).max(1)
    }
}
