//! Serialization, programmatic sorting, persistence and the container
//! registry.

use arrange::{
    DragState, MemoryStore, NodeId, Platform, SortableConfig, SortableError, SortableOptions,
    SortableSystem, TimerKey,
};
use arrange_dom::Style;
use arrange_input::{EventBatch, InputEvent};
use arrange_test_utils::{ListFixture, Pointer, SharedStore, init_tracing};

#[test]
fn test_sort_is_idempotent() {
    init_tracing();
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c", "d"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(lists[0].element, SortableOptions::new()).unwrap();

    system.sort(id, &["c", "a", "d", "b"], false).unwrap();
    assert_eq!(system.to_array(id).unwrap(), ["c", "a", "d", "b"]);

    let order = system.to_array(id).unwrap();
    system.sort(id, &order, false).unwrap();
    assert_eq!(system.to_array(id).unwrap(), order);
}

#[test]
fn test_sort_matches_present_ids() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(lists[0].element, SortableOptions::new()).unwrap();
    let order = ["c", "ghost", "a", "b", "missing"];

    system.sort(id, &order, false).unwrap();

    let present: Vec<&str> = order
        .iter()
        .copied()
        .filter(|id| ["a", "b", "c"].contains(id))
        .collect();
    assert_eq!(system.to_array(id).unwrap(), present);
}

#[test]
fn test_sort_skips_unknown_and_keeps_unnamed_in_front() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(lists[0].element, SortableOptions::new()).unwrap();

    system.sort(id, &["zzz", "c", "a"], false).unwrap();

    assert_eq!(system.to_array(id).unwrap(), ["b", "c", "a"]);
}

#[test]
fn test_animated_sort() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system
        .create(lists[0].element, SortableOptions::new().animation(100))
        .unwrap();

    system.sort(id, &["c", "b", "a"], true).unwrap();

    assert!(system.animations().is_animated(lists[0].item(0)));
    assert!(!system.animations().is_animated(lists[0].item(1)));
    system.advance(150.0);
    assert!(!system.animations().is_animated(lists[0].item(0)));
}

#[test]
fn test_generated_ids_for_items_without_data_id() {
    let mut doc = arrange::Document::new(200.0, 200.0).unwrap();
    let list = doc.create_element_with("ul", Style::new().width(100.0)).unwrap();
    doc.append_child(doc.body(), list).unwrap();
    for text in ["alpha", "beta"] {
        let item = doc.create_element_with("li", Style::new().height(20.0)).unwrap();
        doc.set_text(item, text);
        doc.append_child(list, item).unwrap();
    }
    let expected: Vec<String> = doc
        .children(list)
        .iter()
        .map(|&item| arrange::generate_id(&doc, item))
        .collect();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(list, SortableOptions::new()).unwrap();

    assert_eq!(system.to_array(id).unwrap(), expected);
    assert_ne!(expected[0], expected[1]);
}

#[test]
fn test_custom_id_attribute_and_draggable_selector() {
    let (mut doc, lists) = ListFixture::new().list("div", &["a", "b", "c"]).build();
    let list = &lists[0];
    for (item, key) in list.items.iter().zip(["k1", "k2", "k3"]) {
        doc.set_attribute(*item, "data-key", key);
    }
    doc.add_class(list.item(0), "card");
    doc.add_class(list.item(2), "card");
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system
        .create(
            list.element,
            SortableOptions {
                data_id_attr: "data-key".to_string(),
                ..SortableOptions::new().draggable(".card")
            },
        )
        .unwrap();

    assert_eq!(system.to_array(id).unwrap(), ["k1", "k3"]);
    assert_eq!(system.closest(id, list.item(1), None).unwrap(), None);
    assert_eq!(
        system.closest(id, list.item(1), Some("div")).unwrap(),
        Some(list.item(1))
    );
}

#[test]
fn test_store_restores_order_on_create() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let store = SharedStore::new(MemoryStore::new().with_order("tasks", &["c", "a", "b"]));
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system
        .create(
            lists[0].element,
            SortableConfig::new(SortableOptions::new().group("tasks")).with_store(store.clone()),
        )
        .unwrap();

    assert_eq!(system.to_array(id).unwrap(), ["c", "a", "b"]);
    assert_eq!(store.writes(), 0);
}

#[test]
fn test_store_saves_after_drag() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let store = SharedStore::default();
    let mut system = SortableSystem::new(doc, Platform::headless());
    system
        .create(
            lists[0].element,
            SortableConfig::new(SortableOptions::new().group("tasks")).with_store(store.clone()),
        )
        .unwrap();

    Pointer::mouse().fallback_drag(&mut system, lists[0].center(0), lists[0].center(2));

    assert_eq!(store.order("tasks").unwrap(), ["b", "c", "a"]);
    assert_eq!(store.writes(), 1);
}

#[test]
fn test_store_saves_both_lists_after_transfer() {
    let (doc, lists) = ListFixture::new()
        .list("ul", &["a", "b"])
        .list("ul", &["x"])
        .build();
    let left = SharedStore::default();
    let right = SharedStore::default();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let config = |store: &SharedStore| {
        SortableConfig::new(SortableOptions::new().group("shared")).with_store(store.clone())
    };
    let left_id = system.create(lists[0].element, config(&left)).unwrap();
    system.create(lists[1].element, config(&right)).unwrap();
    let below = lists[1].rect.center() + arrange_core::math::Vec2::new(0.0, 25.0);

    Pointer::mouse().fallback_drag(&mut system, lists[0].center(0), below);

    assert_eq!(system.to_array(left_id).unwrap(), ["b"]);
    assert_eq!(right.order("shared").unwrap(), ["x", "a"]);
    assert_eq!(left.order("shared").unwrap(), ["b"]);
}

#[test]
fn test_registration_errors() {
    let (doc, lists) = ListFixture::new().list("ul", &["a"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(lists[0].element, SortableOptions::new()).unwrap();

    assert_eq!(
        system.create(lists[0].element, SortableOptions::new()),
        Err(SortableError::AlreadyRegistered {
            element: lists[0].element,
            existing: id,
        })
    );
    assert_eq!(
        system.create(NodeId(9999), SortableOptions::new()),
        Err(SortableError::NotAnElement(NodeId(9999)))
    );
    assert_eq!(system.get(lists[0].element), Some(id));
}

#[test]
fn test_destroy_aborts_owned_drag() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let id = system.create(lists[0].element, SortableOptions::new()).unwrap();

    Pointer::mouse().pick(&mut system, lists[0].center(0));
    assert_eq!(system.state(), DragState::Dragging);
    system.destroy(id).unwrap();

    assert_eq!(system.state(), DragState::Idle);
    assert_eq!(system.get(lists[0].element), None);
    assert_eq!(system.to_array(id), Err(SortableError::UnknownSortable(id)));
    assert!(system.ghost().is_none());
    assert!(!system.scheduler().is_pending(TimerKey::HoverLoop));
}

#[test]
fn test_batch_is_handled_in_order() {
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    system.create(lists[0].element, SortableOptions::new()).unwrap();
    let pointer = Pointer::mouse();
    let mut batch = EventBatch::new();
    batch.push(InputEvent::PointerDown(pointer.input(lists[0].center(0))));
    batch.push(InputEvent::PointerMove(pointer.input(lists[0].center(1))));

    let responses = system.handle_batch(&mut batch);

    assert_eq!(responses.len(), 2);
    assert!(responses[0].is_handled());
    assert!(responses[1].is_handled());
    assert!(batch.is_empty());
    assert!(system.is_awaiting_drag_start());
}
