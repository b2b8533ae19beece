//! Layout tests: block, flex, grid and inline flows through Taffy.

use arrange_core::math::Vec2;
use arrange_dom::{Display, Document, FlexDirection, Float, NodeId, Position, Style};

fn container(doc: &mut Document, style: Style, children: usize, child: Style) -> (NodeId, Vec<NodeId>) {
    let root = doc.create_element_with("div", style).unwrap();
    doc.append_child(doc.body(), root).unwrap();
    let items = (0..children)
        .map(|_| {
            let item = doc.create_element_with("div", child.clone()).unwrap();
            doc.append_child(root, item).unwrap();
            item
        })
        .collect();
    (root, items)
}

#[test]
fn test_flex_row_places_children_horizontally() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().flex(FlexDirection::Row),
        3,
        Style::new().size(50.0, 30.0),
    );
    let lefts: Vec<f32> = items.iter().map(|&i| doc.layout_rect(i).left).collect();
    assert_eq!(lefts, vec![0.0, 50.0, 100.0]);
}

#[test]
fn test_flex_column() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().flex(FlexDirection::Column),
        2,
        Style::new().size(50.0, 30.0),
    );
    assert_eq!(doc.layout_rect(items[1]).top, 30.0);
    assert_eq!(doc.layout_rect(items[1]).left, 0.0);
}

#[test]
fn test_grid_wraps_into_rows() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().grid(2).width(200.0),
        3,
        Style::new().height(30.0),
    );
    assert_eq!(doc.layout_rect(items[1]).left, 100.0);
    assert_eq!(doc.layout_rect(items[2]).top, 30.0);
    assert_eq!(doc.layout_rect(items[2]).left, 0.0);
}

#[test]
fn test_inline_children_flow_in_a_row() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().width(120.0),
        3,
        Style::new().display(Display::InlineBlock).size(50.0, 20.0),
    );
    assert_eq!(doc.layout_rect(items[1]).left, 50.0);
    // Third box does not fit in 120px and wraps.
    assert_eq!(doc.layout_rect(items[2]).top, 20.0);
}

#[test]
fn test_floats_flow_in_a_row() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().width(300.0),
        2,
        Style::new().float(Float::Left).size(60.0, 20.0),
    );
    assert_eq!(doc.layout_rect(items[1]).left, 60.0);
    assert_eq!(doc.layout_rect(items[1]).top, 0.0);
}

#[test]
fn test_display_none_takes_no_space() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(&mut doc, Style::new(), 3, Style::new().height(40.0));
    doc.set_css(items[0], "display", "none").unwrap();
    assert_eq!(doc.layout_rect(items[1]).top, 0.0);
    assert_eq!(doc.layout_rect(items[2]).top, 40.0);
}

#[test]
fn test_fixed_uses_client_coordinates() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(
        &mut doc,
        Style::new().position(Position::Relative).inset(100.0, 100.0),
        1,
        Style::new()
            .position(Position::Fixed)
            .inset(30.0, 40.0)
            .size(10.0, 10.0),
    );
    let rect = doc.layout_rect(items[0]);
    assert_eq!((rect.left, rect.top), (30.0, 40.0));
}

#[test]
fn test_scroll_shifts_children() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (root, items) = container(&mut doc, Style::new(), 2, Style::new().height(40.0));
    doc.set_scroll(root, Vec2::new(0.0, 25.0)).unwrap();
    assert_eq!(doc.layout_rect(items[0]).top, -25.0);
    assert_eq!(doc.layout_rect(root).top, 0.0);
}

#[test]
fn test_detached_nodes_have_empty_rect() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (_, items) = container(&mut doc, Style::new(), 2, Style::new().height(40.0));
    doc.detach(items[1]).unwrap();
    assert_eq!(doc.parent(items[1]), None);
    assert_eq!(doc.layout_rect(items[1]).height, 0.0);
}

#[test]
fn test_empty_child_keeps_block_item_in_flow() {
    let mut doc = Document::new(800.0, 600.0).unwrap();
    let (root, items) = container(
        &mut doc,
        Style::new().width(100.0),
        3,
        Style::new().height(40.0),
    );
    let inner = doc.create_element("div").unwrap();
    doc.append_child(items[0], inner).unwrap();

    let tops: Vec<f32> = items.iter().map(|&i| doc.layout_rect(i).top).collect();
    assert_eq!(tops, vec![0.0, 40.0, 80.0]);
    assert_eq!(doc.layout_rect(root).height, 120.0);
    assert_eq!(doc.layout_rect(inner).height, 0.0);
    assert_eq!(doc.element_from_point(Vec2::new(50.0, 20.0)), Some(items[0]));
    assert_eq!(doc.element_from_point(Vec2::new(50.0, 60.0)), Some(items[1]));
}
