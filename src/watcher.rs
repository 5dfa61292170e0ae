//! Outside-interaction watcher.
//!
//! [`OutsideWatcher`] is the reason this crate exists: given a region in the
//! view tree and a callback, it invokes the callback whenever a watched event
//! lands outside that region. Dropdowns, modals, and popovers use it to close
//! on a click elsewhere.
//!
//! The watcher separates three lifetimes that naively get tangled together:
//!
//! - **Listeners** are registered once per watched event name on attach and
//!   removed on detach. Reconfiguring the event set swaps them in a single
//!   synchronous step.
//! - **The callback** lives in a slot read at dispatch time, so replacing it
//!   never touches listener registration and listeners never run a stale
//!   closure.
//! - **The region** is re-read from its [`RegionHandle`] on every event, so a
//!   component that unmounted a moment ago is already treated as "everything
//!   is outside".

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::dispatch::{EventDispatcher, Handler, ListenerId};
use crate::events::{InputEvent, DEFAULT_EVENTS};
use crate::tree::{RegionHandle, ViewTree};

/// Callback invoked with each outside event.
pub type OutsideCallback = Box<dyn FnMut(&InputEvent)>;

/// Configuration errors for the watcher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatcherError {
    /// The watched event set may not be empty.
    #[error("watched event set must not be empty")]
    EmptyEventSet,
}

/// Watches the dispatcher for interactions outside a tracked region.
///
/// Attachment registers one listener per watched event name; dropping the
/// watcher (or calling [`OutsideWatcher::detach`]) removes exactly those
/// listeners and nothing else, so any number of watchers can share one
/// dispatcher. The callback runs synchronously on the dispatch stack; a panic
/// in it propagates to the dispatch caller like any other listener panic.
///
/// ```
/// use click_away::{EventDispatcher, InputEvent, OutsideWatcher, RegionHandle, ViewTree, MOUSE_DOWN};
/// use ratatui::layout::Rect;
///
/// let tree = ViewTree::new();
/// let root = tree.insert_root(Rect::new(0, 0, 80, 24));
/// let panel = tree.insert(root, Rect::new(10, 5, 30, 10));
///
/// let dispatcher = EventDispatcher::new();
/// let watcher = OutsideWatcher::attach(&dispatcher, &tree, RegionHandle::for_node(panel), |_| {
///     // close the panel
/// });
///
/// // A press elsewhere on the screen reaches the callback
/// dispatcher.dispatch(&InputEvent::new(MOUSE_DOWN, Some(root)));
/// drop(watcher); // teardown removes the listeners
/// ```
pub struct OutsideWatcher {
    dispatcher: EventDispatcher,
    region: RegionHandle,
    callback: Rc<RefCell<OutsideCallback>>,
    /// One handler shared by every listener entry; its identity is stable
    /// across event-set reconfiguration and callback replacement.
    handler: Handler,
    events: Vec<String>,
    listeners: Vec<ListenerId>,
}

impl OutsideWatcher {
    /// Attach with the default watched events ([`DEFAULT_EVENTS`]).
    pub fn attach(
        dispatcher: &EventDispatcher,
        tree: &ViewTree,
        region: RegionHandle,
        callback: impl FnMut(&InputEvent) + 'static,
    ) -> Self {
        Self::build(
            dispatcher,
            tree,
            region,
            Box::new(callback),
            dedup_events(&DEFAULT_EVENTS),
        )
    }

    /// Attach with a custom ordered set of watched event names.
    ///
    /// Duplicate names are dropped, first occurrence wins, so one physical
    /// event never invokes the callback twice. The set must be non-empty;
    /// the names themselves are not validated (a name nobody dispatches is
    /// simply never delivered).
    pub fn attach_with_events(
        dispatcher: &EventDispatcher,
        tree: &ViewTree,
        region: RegionHandle,
        callback: impl FnMut(&InputEvent) + 'static,
        events: &[&str],
    ) -> Result<Self, WatcherError> {
        let events = dedup_events(events);
        if events.is_empty() {
            return Err(WatcherError::EmptyEventSet);
        }
        Ok(Self::build(
            dispatcher,
            tree,
            region,
            Box::new(callback),
            events,
        ))
    }

    fn build(
        dispatcher: &EventDispatcher,
        tree: &ViewTree,
        region: RegionHandle,
        callback: OutsideCallback,
        events: Vec<String>,
    ) -> Self {
        let slot = Rc::new(RefCell::new(callback));
        let handler = make_handler(tree.clone(), region.clone(), Rc::clone(&slot));
        let mut watcher = Self {
            dispatcher: dispatcher.clone(),
            region,
            callback: slot,
            handler,
            events: Vec::new(),
            listeners: Vec::new(),
        };
        watcher.register(events);
        debug!(events = ?watcher.events, "outside watcher attached");
        watcher
    }

    /// Replace the callback without touching listener registration.
    ///
    /// Already-registered listeners invoke the new callback from the next
    /// event on; listener identity and count are unchanged.
    pub fn set_callback(&self, callback: impl FnMut(&InputEvent) + 'static) {
        *self.callback.borrow_mut() = Box::new(callback);
    }

    /// Replace the watched event set.
    ///
    /// Removal of the old listeners and registration of the new ones happen
    /// inside this one synchronous call, so no concurrently-dispatched event
    /// can observe a half-swapped table. Supplying the current set (after
    /// de-duplication) is a no-op that leaves listener ids untouched.
    pub fn set_events(&mut self, events: &[&str]) -> Result<(), WatcherError> {
        let events = dedup_events(events);
        if events.is_empty() {
            return Err(WatcherError::EmptyEventSet);
        }
        if events == self.events {
            return Ok(());
        }
        self.unregister();
        self.register(events);
        debug!(events = ?self.events, "watched event set replaced");
        Ok(())
    }

    /// Remove every listener this watcher registered. Idempotent; also runs
    /// on drop.
    pub fn detach(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        self.unregister();
        debug!("outside watcher detached");
    }

    /// Whether the watcher currently has listeners registered.
    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// A clone of the region holder, for the host to update on mount/unmount.
    pub fn region(&self) -> RegionHandle {
        self.region.clone()
    }

    /// The watched event names, de-duplicated, in order.
    pub fn watched_events(&self) -> &[String] {
        &self.events
    }

    /// Ids of the listener entries this watcher currently owns.
    pub fn listener_ids(&self) -> &[ListenerId] {
        &self.listeners
    }

    fn register(&mut self, events: Vec<String>) {
        for name in &events {
            let id = self
                .dispatcher
                .add_shared_listener(name.clone(), Rc::clone(&self.handler));
            self.listeners.push(id);
        }
        self.events = events;
    }

    fn unregister(&mut self) {
        for id in self.listeners.drain(..) {
            self.dispatcher.remove_listener(id);
        }
    }
}

impl Drop for OutsideWatcher {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for OutsideWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideWatcher")
            .field("events", &self.events)
            .field("listeners", &self.listeners)
            .finish()
    }
}

fn make_handler(tree: ViewTree, region: RegionHandle, slot: Rc<RefCell<OutsideCallback>>) -> Handler {
    Rc::new(RefCell::new(move |event: &InputEvent| {
        let inside = match region.get() {
            Some(region_id) => event
                .target
                .map_or(false, |target| tree.contains(region_id, target)),
            // No region mounted: everything counts as outside.
            None => false,
        };
        if !inside {
            trace!(event = %event.name, target = ?event.target, "outside interaction");
            (slot.borrow_mut())(event);
        }
    }))
}

/// Order-preserving de-duplication by event name.
fn dedup_events(events: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(events.len());
    for name in events {
        if out.iter().all(|existing| existing.as_str() != *name) {
            out.push((*name).to_string());
        }
    }
    out
}
