//! Native drag payload.

use indexmap::IndexMap;

/// Operations the drag source allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragEffectAllowed {
    None,
    Copy,
    CopyLink,
    CopyMove,
    Link,
    LinkMove,
    Move,
    All,
    #[default]
    Uninitialized,
}

/// Effect a drop target reports for the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

/// Data carried by a native drag, keyed by format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTransfer {
    data: IndexMap<String, String>,
    pub effect_allowed: DragEffectAllowed,
    pub drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, format: &str, data: &str) {
        self.data.insert(format.to_string(), data.to_string());
    }

    /// Empty string when the format is absent, like the DOM API.
    pub fn get_data(&self, format: &str) -> String {
        self.data.get(format).cloned().unwrap_or_default()
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    /// Formats in insertion order.
    pub fn types(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_roundtrip_keeps_order() {
        let mut transfer = DataTransfer::new();
        transfer.set_data("Text", "Item A");
        transfer.set_data("text/uri-list", "https://example.com");
        assert_eq!(transfer.get_data("Text"), "Item A");
        assert_eq!(transfer.get_data("missing"), "");
        assert_eq!(transfer.types(), vec!["Text", "text/uri-list"]);
    }
}
