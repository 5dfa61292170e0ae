//! Watched-event-set reconfiguration: the swap is a single synchronous step,
//! listener churn is proportional to configuration changes only, and the
//! watcher owns exactly its own listener entries throughout.

use std::cell::Cell;
use std::rc::Rc;

use ratatui::layout::Rect;

use click_away::{
    EventDispatcher, InputEvent, OutsideWatcher, RegionHandle, ViewTree, WatcherError, MOUSE_DOWN,
    TOUCH_START,
};

fn make_env() -> (EventDispatcher, ViewTree, RegionHandle) {
    let tree = ViewTree::new();
    let root = tree.insert_root(Rect::new(0, 0, 80, 24));
    let panel = tree.insert(root, Rect::new(10, 5, 30, 10));
    (EventDispatcher::new(), tree, RegionHandle::for_node(panel))
}

#[test]
fn test_swap_mousedown_to_touchstart() {
    let (dispatcher, tree, region) = make_env();
    let closes = Rc::new(Cell::new(0u32));
    let c = Rc::clone(&closes);
    let mut watcher =
        OutsideWatcher::attach_with_events(&dispatcher, &tree, region, move |_| c.set(c.get() + 1), &[
            MOUSE_DOWN,
        ])
        .unwrap();

    dispatcher.dispatch(&InputEvent::new(MOUSE_DOWN, None));
    assert_eq!(closes.get(), 1);

    watcher.set_events(&[TOUCH_START]).unwrap();

    // mousedown no longer triggers, touchstart now does
    dispatcher.dispatch(&InputEvent::new(MOUSE_DOWN, None));
    assert_eq!(closes.get(), 1);
    dispatcher.dispatch(&InputEvent::new(TOUCH_START, None));
    assert_eq!(closes.get(), 2);

    // Exactly one listener at all times, never zero or two
    assert_eq!(dispatcher.listener_count(), 1);
}

#[test]
fn test_swap_from_inside_a_handler_is_atomic() {
    // A listener registered before the watcher reconfigures it while an
    // event is in flight. The watcher's freshly-registered listener must not
    // see the in-flight event (no double delivery), and the old listener,
    // already removed, must not fire either (no zero/two-listener window
    // observable from dispatch).
    let (dispatcher, tree, region) = make_env();
    let closes = Rc::new(Cell::new(0u32));

    let watcher: Rc<std::cell::RefCell<Option<OutsideWatcher>>> =
        Rc::new(std::cell::RefCell::new(None));

    let w = Rc::clone(&watcher);
    dispatcher.add_listener(MOUSE_DOWN, move |_| {
        if let Some(watcher) = w.borrow_mut().as_mut() {
            watcher.set_events(&[TOUCH_START]).unwrap();
        }
    });

    let c = Rc::clone(&closes);
    *watcher.borrow_mut() = Some(
        OutsideWatcher::attach_with_events(
            &dispatcher,
            &tree,
            region,
            move |_| c.set(c.get() + 1),
            &[MOUSE_DOWN],
        )
        .unwrap(),
    );

    // The reconfiguring listener runs first and swaps the set mid-dispatch;
    // the watcher's old mousedown listener is gone before its turn comes.
    dispatcher.dispatch(&InputEvent::new(MOUSE_DOWN, None));
    assert_eq!(closes.get(), 0);

    dispatcher.dispatch(&InputEvent::new(TOUCH_START, None));
    assert_eq!(closes.get(), 1);
}

#[test]
fn test_noop_swap_keeps_listener_identity() {
    let (dispatcher, tree, region) = make_env();
    let mut watcher = OutsideWatcher::attach(&dispatcher, &tree, region, |_| {});
    let ids = watcher.listener_ids().to_vec();

    watcher.set_events(&[MOUSE_DOWN, TOUCH_START]).unwrap();
    assert_eq!(watcher.listener_ids(), ids.as_slice());
    for id in &ids {
        assert!(dispatcher.is_registered(*id));
    }
}

#[test]
fn test_rejected_swap_changes_nothing() {
    let (dispatcher, tree, region) = make_env();
    let mut watcher = OutsideWatcher::attach(&dispatcher, &tree, region, |_| {});
    let ids = watcher.listener_ids().to_vec();

    assert_eq!(watcher.set_events(&[]), Err(WatcherError::EmptyEventSet));
    assert_eq!(watcher.watched_events(), &[MOUSE_DOWN, TOUCH_START]);
    assert_eq!(watcher.listener_ids(), ids.as_slice());
}

#[test]
fn test_swap_leaves_other_subscribers_alone() {
    let (dispatcher, tree, region) = make_env();
    let other_calls = Rc::new(Cell::new(0u32));
    let o = Rc::clone(&other_calls);
    let other_id = dispatcher.add_listener(MOUSE_DOWN, move |_| o.set(o.get() + 1));

    let mut watcher =
        OutsideWatcher::attach_with_events(&dispatcher, &tree, region, |_| {}, &[MOUSE_DOWN])
            .unwrap();
    watcher.set_events(&[TOUCH_START]).unwrap();
    watcher.detach();

    // The unrelated subscriber survived both the swap and the teardown
    assert!(dispatcher.is_registered(other_id));
    dispatcher.dispatch(&InputEvent::new(MOUSE_DOWN, None));
    assert_eq!(other_calls.get(), 1);
}

#[test]
fn test_custom_event_names_are_not_validated() {
    let (dispatcher, tree, region) = make_env();
    let closes = Rc::new(Cell::new(0u32));
    let c = Rc::clone(&closes);
    let _watcher = OutsideWatcher::attach_with_events(
        &dispatcher,
        &tree,
        region,
        move |_| c.set(c.get() + 1),
        &["pointerdown", "no-such-event"],
    )
    .unwrap();

    // A name nobody dispatches is a silent no-op per name
    dispatcher.dispatch(&InputEvent::new("pointerdown", None));
    assert_eq!(closes.get(), 1);
    assert_eq!(dispatcher.listener_count_for("no-such-event"), 1);
}
