//! Document-style event dispatcher.
//!
//! The dispatcher is the one shared resource in this crate: a process-wide
//! listener table keyed by event name, the terminal analog of the DOM's
//! document-level listener registry. Listeners are registered in order,
//! invoked synchronously in that order, and removed precisely by id, so
//! independent subscribers never disturb each other's entries.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::events::InputEvent;

/// A registered event handler, shareable between listener entries.
///
/// Sharing one handler across several entries keeps its identity stable while
/// the set of event names it is registered under changes.
pub type Handler = Rc<RefCell<dyn FnMut(&InputEvent)>>;

/// Identifier of a single listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    event: String,
    handler: Handler,
}

#[derive(Default)]
struct DispatcherInner {
    listeners: Vec<ListenerEntry>,
    next_id: u64,
}

/// Shared listener table with synchronous dispatch.
///
/// Cheap to clone (`Rc` internally); every clone refers to the same table.
/// All dispatch happens on the caller's stack, single-threaded, in listener
/// registration order. A panic in a handler propagates out of
/// [`EventDispatcher::dispatch`] unmodified.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    inner: Rc<RefCell<DispatcherInner>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure for an event name.
    pub fn add_listener(
        &self,
        event: impl Into<String>,
        handler: impl FnMut(&InputEvent) + 'static,
    ) -> ListenerId {
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.add_shared_listener(event, handler)
    }

    /// Register an existing shared handler for an event name.
    pub fn add_shared_listener(&self, event: impl Into<String>, handler: Handler) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        let event = event.into();
        trace!(listener = ?id, event = %event, "listener registered");
        inner.listeners.push(ListenerEntry { id, event, handler });
        id
    }

    /// Remove a listener by id. Returns whether an entry was removed;
    /// removing an unknown id is a silent no-op.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|entry| entry.id != id);
        let removed = inner.listeners.len() != before;
        if removed {
            trace!(listener = ?id, "listener removed");
        }
        removed
    }

    /// Whether a listener id is currently registered.
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|entry| entry.id == id)
    }

    /// Deliver an event to every listener registered for its name, in
    /// registration order.
    ///
    /// The matching entries are snapshotted up front so handlers may add or
    /// remove listeners mid-dispatch, and each id is re-checked right before
    /// its invocation: a listener removed by an earlier handler is never
    /// invoked, and a listener added mid-dispatch first sees the next event.
    pub fn dispatch(&self, event: &InputEvent) {
        let matching: Vec<(ListenerId, Handler)> = {
            let inner = self.inner.borrow();
            inner
                .listeners
                .iter()
                .filter(|entry| entry.event == event.name)
                .map(|entry| (entry.id, Rc::clone(&entry.handler)))
                .collect()
        };
        trace!(event = %event.name, listeners = matching.len(), "dispatching");
        for (id, handler) in matching {
            if self.is_registered(id) {
                (handler.borrow_mut())(event);
            }
        }
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of listeners registered for one event name.
    pub fn listener_count_for(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|entry| entry.event == event)
            .count()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
