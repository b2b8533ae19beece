//! Per-node change tracking for hosts that repaint incrementally.

use bitflags::bitflags;

bitflags! {
    /// What changed on a node since the host last drained it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        const NONE           = 0b0000_0000;

        /// Box position or size changed.
        const LAYOUT         = 0b0000_0001;

        /// Children were added, removed, or reordered.
        const CHILDREN_ORDER = 0b0000_0010;

        /// Transform or transition changed.
        const TRANSFORM      = 0b0000_0100;

        /// `display` or `opacity` changed.
        const VISIBILITY     = 0b0000_1000;

        /// Class list or attributes changed.
        const CLASSES        = 0b0001_0000;

        /// Any other style property.
        const STYLE          = 0b0010_0000;
    }
}

impl DirtyFlags {
    /// True if the node needs geometry re-uploaded, not just repainted.
    #[inline]
    pub fn needs_geometry(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN_ORDER | Self::TRANSFORM)
    }

    /// True if only paint-level properties changed.
    #[inline]
    pub fn is_paint_only(&self) -> bool {
        !self.is_empty() && !self.needs_geometry()
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_flags() {
        assert!(DirtyFlags::LAYOUT.needs_geometry());
        assert!(DirtyFlags::TRANSFORM.needs_geometry());
        assert!(!DirtyFlags::CLASSES.needs_geometry());
    }

    #[test]
    fn test_paint_only() {
        assert!(DirtyFlags::CLASSES.is_paint_only());
        assert!((DirtyFlags::VISIBILITY | DirtyFlags::STYLE).is_paint_only());
        assert!(!(DirtyFlags::CLASSES | DirtyFlags::CHILDREN_ORDER).is_paint_only());
        assert!(!DirtyFlags::NONE.is_paint_only());
    }
}
