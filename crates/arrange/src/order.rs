//! Fallback item ids for serialization.

use arrange_dom::{Document, NodeId};

/// Content hash used as an item id when the item has no id attribute.
///
/// Sums the UTF-16 code units of the upper-case tag, class list, `src`,
/// `href` and text content, and renders the sum in base 36.
pub fn generate_id(document: &Document, node: NodeId) -> String {
    let Some(element) = document.element(node) else {
        return "0".to_string();
    };
    let mut source = element.tag.to_ascii_uppercase();
    source.push_str(&element.class_name());
    for attribute in ["src", "href"] {
        if let Some(value) = element.attribute(attribute) {
            source.push_str(value);
        }
    }
    source.push_str(&document.text_content(node));

    let sum: u64 = source.encode_utf16().map(u64::from).sum();
    to_base36(sum)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1295), "zz");
    }

    #[test]
    fn test_generate_id_sums_tag_classes_and_text() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let li = doc.create_element("li").unwrap();
        doc.add_class(li, "a");
        doc.set_text(li, "b");
        // "LI" + "a" + "b" = 76 + 73 + 97 + 98
        assert_eq!(generate_id(&doc, li), to_base36(344));
    }

    #[test]
    fn test_generate_id_depends_on_content() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let first = doc.create_element("li").unwrap();
        let second = doc.create_element("li").unwrap();
        doc.set_text(first, "alpha");
        doc.set_text(second, "beta");
        assert_ne!(generate_id(&doc, first), generate_id(&doc, second));
        doc.set_attribute(second, "href", "#x");
        let with_href = generate_id(&doc, second);
        doc.remove_attribute(second, "href");
        assert_ne!(with_href, generate_id(&doc, second));
    }
}
