//! Press handling: delays, filters, handles, cancellation and the cleanup
//! that follows a drag.

use arrange::{
    DragState, Filter, Platform, SortableConfig, SortableEventKind, SortableId, SortableOptions,
    SortableSystem,
};
use arrange_core::math::Vec2;
use arrange_input::{InputEvent, MouseButton, PointerInput};
use arrange_test_utils::{List, ListFixture, Pointer, RecordingHooks, init_tracing};

fn setup(options: SortableOptions) -> (SortableSystem, SortableId, List, RecordingHooks) {
    init_tracing();
    let (doc, lists) = ListFixture::new().list("ul", &["a", "b", "c"]).build();
    let list = lists[0].clone();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let hooks = RecordingHooks::new();
    let id = system
        .create(list.element, SortableConfig::new(options).with_hooks(hooks.clone()))
        .unwrap();
    (system, id, list, hooks)
}

#[test]
fn test_delay_waits_before_choosing() {
    let (mut system, _id, list, hooks) = setup(SortableOptions::new().delay(100));
    let pointer = Pointer::mouse();

    pointer.press(&mut system, list.center(0));
    system.advance(50.0);
    assert!(hooks.kinds().is_empty());

    system.advance(50.0);
    assert_eq!(hooks.kinds(), vec![SortableEventKind::Choose]);
    pointer.release(&mut system, list.center(0));
}

#[test]
fn test_release_during_delay_abandons_press() {
    let (mut system, _id, list, hooks) = setup(SortableOptions::new().delay(100));
    let pointer = Pointer::mouse();

    pointer.press(&mut system, list.center(0));
    pointer.release(&mut system, list.center(0));
    system.advance(200.0);

    assert_eq!(system.state(), DragState::Idle);
    assert!(hooks.kinds().is_empty());
    assert!(!system.scheduler().is_pending(arrange::TimerKey::DelayedDragStart));
}

#[test]
fn test_early_release_leaves_click_alone() {
    let (mut system, id, list, hooks) = setup(SortableOptions::new().delay(100));
    let pointer = Pointer::mouse();
    let at = list.center(1);

    let down = pointer.press(&mut system, at);
    system.advance(50.0);
    let up = pointer.release(&mut system, at);
    let click = system.handle_event(InputEvent::Click(PointerInput::mouse(at.x, at.y)));
    system.advance(100.0);

    assert!(!down.default_prevented());
    assert!(!up.default_prevented());
    assert!(!click.click_suppressed());
    assert!(!click.propagation_stopped());
    assert!(hooks.kinds().is_empty());
    assert_eq!(system.state(), DragState::Idle);
    assert_eq!(system.to_array(id).unwrap(), ["a", "b", "c"]);
}

#[test]
fn test_movement_during_delay_abandons_start() {
    let (mut system, id, list, hooks) = setup(SortableOptions::new().delay(100));
    let pointer = Pointer::mouse();

    pointer.press(&mut system, list.center(0));
    pointer.move_to(&mut system, list.center(0) + Vec2::new(0.0, 8.0));
    system.advance(200.0);
    assert!(!hooks.kinds().contains(&SortableEventKind::Choose));

    pointer.move_to(&mut system, list.center(2));
    system.advance(100.0);
    pointer.release(&mut system, list.center(2));
    assert_eq!(system.to_array(id).unwrap(), ["a", "b", "c"]);
    assert_eq!(system.state(), DragState::Idle);
}

#[test]
fn test_small_jitter_keeps_delayed_start() {
    let (mut system, _id, list, hooks) = setup(SortableOptions {
        touch_start_threshold: Some(5),
        ..SortableOptions::new().delay(100)
    });
    let pointer = Pointer::touch();

    pointer.press(&mut system, list.center(0));
    pointer.move_to(&mut system, list.center(0) + Vec2::new(2.0, 3.0));
    system.advance(100.0);

    assert_eq!(hooks.kinds(), vec![SortableEventKind::Choose]);
    pointer.release(&mut system, list.center(0));
}

#[test]
fn test_delay_on_touch_only() {
    let (mut system, _id, list, hooks) = setup(SortableOptions {
        delay_on_touch_only: true,
        ..SortableOptions::new().delay(100)
    });

    Pointer::mouse().press(&mut system, list.center(0));
    assert_eq!(hooks.kinds(), vec![SortableEventKind::Choose]);
    Pointer::mouse().release(&mut system, list.center(0));
    hooks.clear();

    Pointer::touch().press(&mut system, list.center(0));
    assert!(hooks.kinds().is_empty());
    system.advance(100.0);
    assert_eq!(hooks.kinds(), vec![SortableEventKind::Choose]);
    Pointer::touch().release(&mut system, list.center(0));
}

#[test]
fn test_one_drag_at_a_time() {
    init_tracing();
    let (doc, lists) = ListFixture::new()
        .list("ul", &["a", "b"])
        .list("ul", &["x", "y"])
        .build();
    let mut system = SortableSystem::new(doc, Platform::headless());
    let hooks = RecordingHooks::new();
    for list in &lists {
        let config = SortableConfig::new(SortableOptions::new()).with_hooks(hooks.clone());
        system.create(list.element, config).unwrap();
    }
    let pointer = Pointer::mouse();

    pointer.press(&mut system, lists[0].center(0));
    Pointer::touch().press(&mut system, lists[1].center(1));

    assert_eq!(system.dragged(), Some(lists[0].item(0)));
    assert_eq!(hooks.count(SortableEventKind::Choose), 1);
    pointer.release(&mut system, lists[0].center(0));
}

#[test]
fn test_secondary_button_is_ignored() {
    let (mut system, _id, list, hooks) = setup(SortableOptions::new());
    let at = list.center(0);

    system.handle_event(InputEvent::PointerDown(
        PointerInput::mouse(at.x, at.y).with_button(MouseButton::Right),
    ));

    assert_eq!(system.state(), DragState::Idle);
    assert!(hooks.kinds().is_empty());
}

#[test]
fn test_disabled_list_ignores_presses() {
    let (mut system, id, list, hooks) = setup(SortableOptions::new().disabled(true));

    Pointer::mouse().press(&mut system, list.center(0));
    assert_eq!(system.state(), DragState::Idle);

    system.update_options(id, |o| o.disabled = false).unwrap();
    Pointer::mouse().press(&mut system, list.center(0));
    assert_eq!(system.state(), DragState::PendingStart);
    assert_eq!(hooks.kinds(), vec![SortableEventKind::Choose]);
}

#[test]
fn test_selector_filter() {
    let (mut system, _id, list, hooks) = setup(SortableOptions::new().filter(".locked"));
    system.document_mut().add_class(list.item(1), "locked");

    let response = Pointer::mouse().press(&mut system, list.center(1));

    assert!(response.default_prevented());
    assert_eq!(system.state(), DragState::Idle);
    let filter = hooks.last(SortableEventKind::Filter).unwrap();
    assert_eq!(filter.item, list.item(1));
    assert_eq!(filter.old_index, Some(1));

    Pointer::mouse().press(&mut system, list.center(0));
    assert_eq!(system.state(), DragState::PendingStart);
}

#[test]
fn test_filter_without_prevent_default() {
    let (mut system, _id, list, hooks) = setup(SortableOptions {
        prevent_on_filter: false,
        ..SortableOptions::new().filter("li")
    });

    let response = Pointer::mouse().press(&mut system, list.center(2));

    assert!(!response.default_prevented());
    assert_eq!(hooks.kinds(), vec![SortableEventKind::Filter]);
}

#[test]
fn test_predicate_filter() {
    let (mut system, id, list, hooks) = setup(SortableOptions::new());
    let locked = list.item(2);
    system
        .update_options(id, |o| {
            o.filter = Some(Filter::predicate(move |ctx| ctx.target == Some(locked)));
        })
        .unwrap();

    Pointer::mouse().press(&mut system, list.center(2));
    assert_eq!(hooks.last(SortableEventKind::Filter).unwrap().item, locked);
    assert_eq!(system.state(), DragState::Idle);

    Pointer::mouse().press(&mut system, list.center(1));
    assert_eq!(system.state(), DragState::PendingStart);
}

#[test]
fn test_handle_restricts_press() {
    let (mut system, _id, list, _hooks) = setup(SortableOptions::new().handle(".grip"));
    let doc = system.document_mut();
    let grip = doc.create_element("span").unwrap();
    doc.add_class(grip, "grip");
    doc.append_child(list.item(0), grip).unwrap();
    let at = list.center(0);

    Pointer::mouse().press(&mut system, at);
    assert_eq!(system.state(), DragState::Idle);

    system.handle_event(InputEvent::PointerDown(
        PointerInput::mouse(at.x, at.y).with_target(grip),
    ));
    assert_eq!(system.dragged(), Some(list.item(0)));
}

#[test]
fn test_content_editable_target_is_ignored() {
    let (mut system, _id, list, _hooks) = setup(SortableOptions::new());
    system.document_mut().set_content_editable(list.item(0), true);

    Pointer::mouse().press(&mut system, list.center(0));

    assert_eq!(system.state(), DragState::Idle);
}

#[test]
fn test_ignored_descendants_lose_draggable() {
    let (mut system, _id, list, _hooks) = setup(SortableOptions::new());
    let doc = system.document_mut();
    let link = doc.create_element("a").unwrap();
    doc.append_child(list.item(0), link).unwrap();

    Pointer::mouse().press(&mut system, list.center(0));

    assert_eq!(system.document().draggable(link), Some(false));
}

#[test]
fn test_checked_inputs_survive_the_move() {
    let (mut system, id, list, _hooks) = setup(SortableOptions::new());
    let doc = system.document_mut();
    doc.set_resets_checked_on_move(true);
    let checkbox = doc.create_element("input").unwrap();
    doc.append_child(list.item(0), checkbox).unwrap();
    doc.set_checked(checkbox, true);
    let pointer = Pointer::mouse();

    pointer.pick(&mut system, list.center(0));
    pointer.hover(&mut system, list.center(2));
    assert!(!system.document().checked(checkbox));
    pointer.release(&mut system, list.center(2));

    assert_eq!(system.to_array(id).unwrap(), ["b", "c", "a"]);
    assert!(system.document().checked(checkbox));
}

#[test]
fn test_click_after_fallback_drag_is_swallowed() {
    let (mut system, _id, list, _hooks) = setup(SortableOptions::new());
    let pointer = Pointer::mouse();
    let at = list.center(0);

    pointer.pick(&mut system, at);
    pointer.release(&mut system, at);

    let click = system.handle_event(InputEvent::Click(PointerInput::mouse(at.x, at.y)));
    assert!(click.click_suppressed());
    assert!(click.propagation_stopped());

    let click = system.handle_event(InputEvent::Click(PointerInput::mouse(at.x, at.y)));
    assert!(!click.click_suppressed());
}

#[test]
fn test_cancel_mid_drag_skips_events() {
    let (mut system, id, list, hooks) = setup(SortableOptions::new());
    let pointer = Pointer::mouse();

    pointer.pick(&mut system, list.center(0));
    pointer.hover(&mut system, list.center(2));
    let ghost = system.ghost().unwrap();
    hooks.clear();

    system.cancel();

    assert!(system.is_canceled());
    assert_eq!(system.state(), DragState::Idle);
    assert!(!system.document().exists(ghost));
    assert!(hooks.kinds().is_empty());
    assert!(!system.document().has_class(list.item(0), "sortable-chosen"));

    // A fresh press starts over.
    pointer.fallback_drag(&mut system, list.center(0), list.center(2));
    assert!(!system.is_canceled());
    assert!(hooks.kinds().contains(&SortableEventKind::End));
    assert_eq!(system.to_array(id).unwrap().len(), 3);
}

#[test]
fn test_cancel_during_delay_prevents_start() {
    let (mut system, _id, list, hooks) = setup(SortableOptions::new().delay(100));

    Pointer::mouse().press(&mut system, list.center(0));
    system.cancel();
    system.advance(200.0);

    assert_eq!(system.state(), DragState::Idle);
    assert!(hooks.kinds().is_empty());
}
