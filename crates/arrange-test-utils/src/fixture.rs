//! Documents with side-by-side lists of fixed-size items.

use arrange_core::geometry::Rect;
use arrange_core::math::Vec2;
use arrange_dom::{Document, FlexDirection, NodeId, Style};

/// Height of every generated item.
pub const ITEM_HEIGHT: f32 = 40.0;
/// Width of a vertical list.
pub const LIST_WIDTH: f32 = 100.0;
/// Horizontal space between neighbouring lists.
pub const LIST_GAP: f32 = 40.0;

const ROW_ITEM_WIDTH: f32 = 50.0;

#[derive(Debug, Clone)]
enum ListKind {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone)]
struct ListSpec {
    tag: String,
    ids: Vec<String>,
    kind: ListKind,
}

/// Builder for a [`Document`] holding one or more lists.
///
/// Lists are laid out left to right in a flex row, [`LIST_GAP`] apart.
/// Items of `ul`/`ol` lists are `li` elements, everything else gets `div`
/// items. Each item has its id both as `data-id` and as text.
#[derive(Debug, Clone)]
pub struct ListFixture {
    viewport: Vec2,
    lists: Vec<ListSpec>,
}

impl Default for ListFixture {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(800.0, 600.0),
            lists: Vec::new(),
        }
    }
}

impl ListFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Vec2::new(width, height);
        self
    }

    /// Add a vertical list.
    pub fn list(mut self, tag: &str, ids: &[&str]) -> Self {
        self.lists.push(ListSpec {
            tag: tag.to_string(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
            kind: ListKind::Vertical,
        });
        self
    }

    /// Add a flex row of 50 px wide items.
    pub fn row(mut self, tag: &str, ids: &[&str]) -> Self {
        self.lists.push(ListSpec {
            tag: tag.to_string(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
            kind: ListKind::Horizontal,
        });
        self
    }

    /// Build the document and return handles to the lists in the order
    /// they were added.
    ///
    /// # Panics
    ///
    /// Panics if the document rejects a node, which only happens on a
    /// broken layout tree.
    pub fn build(self) -> (Document, Vec<List>) {
        let mut doc = Document::new(self.viewport.x, self.viewport.y).expect("document");
        let wrapper = doc
            .create_element_with("div", Style::new().flex(FlexDirection::Row).gap(LIST_GAP))
            .expect("wrapper");
        doc.append_child(doc.body(), wrapper).expect("append wrapper");

        let mut built = Vec::with_capacity(self.lists.len());
        for spec in &self.lists {
            let item_tag = match spec.tag.as_str() {
                "ul" | "ol" => "li",
                _ => "div",
            };
            let (list_style, item_style) = match spec.kind {
                ListKind::Vertical => (
                    Style::new().width(LIST_WIDTH),
                    Style::new().height(ITEM_HEIGHT),
                ),
                ListKind::Horizontal => (
                    Style::new()
                        .flex(FlexDirection::Row)
                        .width(ROW_ITEM_WIDTH * spec.ids.len().max(1) as f32),
                    Style::new().size(ROW_ITEM_WIDTH, ITEM_HEIGHT),
                ),
            };
            let element = doc
                .create_element_with(&spec.tag, list_style)
                .expect("list");
            doc.append_child(wrapper, element).expect("append list");

            let mut items = Vec::with_capacity(spec.ids.len());
            for id in &spec.ids {
                let item = doc
                    .create_element_with(item_tag, item_style.clone())
                    .expect("item");
                doc.set_attribute(item, "data-id", id);
                doc.set_text(item, id);
                doc.append_child(element, item).expect("append item");
                items.push(item);
            }
            built.push(List {
                element,
                items,
                rect: Rect::default(),
                item_rects: Vec::new(),
            });
        }

        // Siblings added later can still move earlier lists, so measure last.
        for list in &mut built {
            list.rect = doc.layout_rect(list.element);
            list.item_rects = list.items.iter().map(|&i| doc.layout_rect(i)).collect();
        }
        (doc, built)
    }
}

/// One list produced by [`ListFixture::build`].
#[derive(Debug, Clone)]
pub struct List {
    pub element: NodeId,
    /// Items in their initial order.
    pub items: Vec<NodeId>,
    /// Layout of the list when it was built.
    pub rect: Rect,
    item_rects: Vec<Rect>,
}

impl List {
    /// Centre of the `index`-th item as initially laid out.
    pub fn center(&self, index: usize) -> Vec2 {
        self.item_rects
            .get(index)
            .map(Rect::center)
            .unwrap_or_else(|| self.rect.center())
    }

    /// A point `offset` pixels from the top of the item, horizontally
    /// centred.
    pub fn point_in(&self, index: usize, offset: f32) -> Vec2 {
        let rect = self.item_rects.get(index).copied().unwrap_or(self.rect);
        Vec2::new(rect.left + rect.width / 2.0, rect.top + offset)
    }

    pub fn item(&self, index: usize) -> NodeId {
        self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_sit_side_by_side() {
        let (doc, lists) = ListFixture::new()
            .list("ul", &["a", "b", "c"])
            .list("ul", &["x"])
            .build();
        assert_eq!(lists[0].rect.left, 0.0);
        assert_eq!(lists[1].rect.left, LIST_WIDTH + LIST_GAP);
        assert_eq!(lists[0].center(1), Vec2::new(LIST_WIDTH / 2.0, ITEM_HEIGHT * 1.5));
        assert_eq!(doc.attribute(lists[0].item(2), "data-id"), Some("c"));
        assert_eq!(doc.text_content(lists[1].item(0)), "x");
    }

    #[test]
    fn test_row_items_flow_horizontally() {
        let (_doc, lists) = ListFixture::new().row("div", &["a", "b"]).build();
        assert_eq!(lists[0].center(0), Vec2::new(25.0, 20.0));
        assert_eq!(lists[0].center(1), Vec2::new(75.0, 20.0));
    }
}
