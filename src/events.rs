//! Input event types dispatched through the listener table.
//!
//! Events are identified by name, DOM-style, so hosts can introduce their own
//! event types without touching this crate. Listeners subscribed to a name
//! nobody ever dispatches simply never fire; there is no name validation.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tree::{NodeId, ViewTree};

/// Primary press event name (left/right/middle button down).
pub const MOUSE_DOWN: &str = "mousedown";
/// Button release event name.
pub const MOUSE_UP: &str = "mouseup";
/// Cursor movement event name.
pub const MOUSE_MOVE: &str = "mousemove";
/// Touch press event name, for hosts that synthesize touch input.
pub const TOUCH_START: &str = "touchstart";

/// Event names watched by default: primary press and touch start.
pub const DEFAULT_EVENTS: [&str; 2] = [MOUSE_DOWN, TOUCH_START];

/// A single input event as seen by listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// Event-type name, e.g. [`MOUSE_DOWN`].
    pub name: String,
    /// The deepest tree node under the interaction, if any.
    pub target: Option<NodeId>,
    /// Terminal cell the interaction happened at (column, row).
    pub position: Option<(u16, u16)>,
    /// Button involved, for press/release events.
    pub button: Option<MouseButton>,
}

impl InputEvent {
    /// Create an event with just a name and target.
    pub fn new(name: impl Into<String>, target: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            target,
            position: None,
            button: None,
        }
    }

    /// Attach the terminal position the event originated at.
    pub fn at(mut self, column: u16, row: u16) -> Self {
        self.position = Some((column, row));
        self
    }

    /// Translate a crossterm mouse event, resolving the target against the
    /// tree at this moment.
    ///
    /// Returns `None` for mouse activity that has no event name here (drags,
    /// scrolling); hosts that care about those dispatch their own names.
    pub fn from_mouse(tree: &ViewTree, mouse: &MouseEvent) -> Option<Self> {
        let name = mouse_event_name(mouse.kind)?;
        Some(Self {
            name: name.to_string(),
            target: tree.hit_test(mouse.column, mouse.row),
            position: Some((mouse.column, mouse.row)),
            button: mouse_button(mouse.kind),
        })
    }
}

/// Map a crossterm mouse kind to its event name, if it has one.
pub fn mouse_event_name(kind: MouseEventKind) -> Option<&'static str> {
    match kind {
        MouseEventKind::Down(_) => Some(MOUSE_DOWN),
        MouseEventKind::Up(_) => Some(MOUSE_UP),
        MouseEventKind::Moved => Some(MOUSE_MOVE),
        _ => None,
    }
}

fn mouse_button(kind: MouseEventKind) -> Option<MouseButton> {
    match kind {
        MouseEventKind::Down(button) | MouseEventKind::Up(button) => Some(button),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn make_mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_mouse_event_names() {
        assert_eq!(
            mouse_event_name(MouseEventKind::Down(MouseButton::Left)),
            Some(MOUSE_DOWN)
        );
        assert_eq!(
            mouse_event_name(MouseEventKind::Up(MouseButton::Right)),
            Some(MOUSE_UP)
        );
        assert_eq!(mouse_event_name(MouseEventKind::Moved), Some(MOUSE_MOVE));
        assert_eq!(mouse_event_name(MouseEventKind::ScrollDown), None);
        assert_eq!(
            mouse_event_name(MouseEventKind::Drag(MouseButton::Left)),
            None
        );
    }

    #[test]
    fn test_from_mouse_resolves_target() {
        let tree = ViewTree::new();
        let root = tree.insert_root(Rect::new(0, 0, 80, 24));
        let button = tree.insert(root, Rect::new(10, 10, 20, 3));

        let event = InputEvent::from_mouse(
            &tree,
            &make_mouse(MouseEventKind::Down(MouseButton::Left), 15, 11),
        )
        .unwrap();
        assert_eq!(event.name, MOUSE_DOWN);
        assert_eq!(event.target, Some(button));
        assert_eq!(event.position, Some((15, 11)));
        assert_eq!(event.button, Some(MouseButton::Left));
    }

    #[test]
    fn test_from_mouse_outside_tree_has_no_target() {
        let tree = ViewTree::new();
        tree.insert_root(Rect::new(0, 0, 10, 10));

        let event = InputEvent::from_mouse(
            &tree,
            &make_mouse(MouseEventKind::Down(MouseButton::Left), 50, 5),
        )
        .unwrap();
        assert_eq!(event.target, None);
    }

    #[test]
    fn test_from_mouse_ignores_scroll() {
        let tree = ViewTree::new();
        assert!(
            InputEvent::from_mouse(&tree, &make_mouse(MouseEventKind::ScrollUp, 0, 0)).is_none()
        );
    }

    #[test]
    fn test_event_builder_position() {
        let event = InputEvent::new(TOUCH_START, None).at(3, 4);
        assert_eq!(event.name, TOUCH_START);
        assert_eq!(event.position, Some((3, 4)));
        assert_eq!(event.button, None);
    }
}
