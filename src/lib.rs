//! click-away - outside-interaction detection for terminal UIs
//!
//! Components like dropdowns, modals, and popovers need to close when the
//! user presses somewhere else. This crate provides the plumbing for that in
//! a terminal UI: a small view tree with tree-containment semantics, a
//! document-style event dispatcher, and [`OutsideWatcher`], which invokes a
//! callback whenever a watched event lands outside a tracked region.

pub mod dispatch;
pub mod events;
pub mod tree;
pub mod watcher;

pub use dispatch::{EventDispatcher, ListenerId};
pub use events::{InputEvent, DEFAULT_EVENTS, MOUSE_DOWN, TOUCH_START};
pub use tree::{NodeId, RegionHandle, ViewTree};
pub use watcher::{OutsideWatcher, WatcherError};
