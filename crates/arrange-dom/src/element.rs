//! Non-layout element data: tag, classes, attributes, text and form state.

use indexmap::IndexMap;

/// The element half of a document node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: IndexMap<String, String>,
    /// Own text, not including descendants.
    pub text: String,
    /// Checked state for checkbox/radio inputs.
    pub checked: bool,
    pub content_editable: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Space-joined class list, the `className` of the element.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Returns true if the class list changed.
    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Returns true if the class list changed.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    /// `draggable` attribute as a tri-state: unset, `"true"`, `"false"`.
    pub fn draggable(&self) -> Option<bool> {
        self.attribute("draggable").map(|v| v == "true")
    }

    pub fn is_input(&self) -> bool {
        self.tag == "input"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_lowercased() {
        assert_eq!(Element::new("LI").tag, "li");
    }

    #[test]
    fn test_class_list() {
        let mut el = Element::new("div");
        assert!(el.add_class("item"));
        assert!(!el.add_class("item"));
        assert!(el.add_class("sortable-chosen"));
        assert_eq!(el.class_name(), "item sortable-chosen");
        assert!(el.remove_class("item"));
        assert!(!el.remove_class("item"));
    }

    #[test]
    fn test_draggable_tristate() {
        let mut el = Element::new("li");
        assert_eq!(el.draggable(), None);
        el.attributes.insert("draggable".into(), "false".into());
        assert_eq!(el.draggable(), Some(false));
    }
}
