//! View tree with tree-containment semantics.
//!
//! Terminal UIs have no document tree, so this module provides the minimal
//! one the outside-interaction watcher needs: nodes with parent/child links
//! and an on-screen area, a containment test over the parent chain, and
//! hit-testing from terminal coordinates to the deepest node under the
//! cursor. Components register nodes while mounting and remove them on
//! unmount; the watcher never looks at coordinates, only at tree ancestry.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ratatui::layout::Rect;

/// Identifier of a node in a [`ViewTree`].
///
/// Ids are allocated by the tree and never reused, so a stale id kept after
/// [`ViewTree::remove`] can never alias a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    area: Rect,
    removed: bool,
}

#[derive(Debug, Default)]
struct TreeInner {
    nodes: Vec<Node>,
    /// Top-level nodes in insertion order (later = on top, like overlays).
    roots: Vec<NodeId>,
}

impl TreeInner {
    fn alive(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).map_or(false, |node| !node.removed)
    }

    /// Find the deepest live node under the point, preferring later siblings.
    fn hit_node(&self, id: NodeId, x: u16, y: u16) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        if node.removed || !rect_contains(node.area, x, y) {
            return None;
        }
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_node(child, x, y) {
                return Some(hit);
            }
        }
        Some(id)
    }
}

/// A shared tree of renderable regions.
///
/// The tree is a cheap handle (`Rc` internally): clone it freely between the
/// host component, the event loop, and any watchers. All access is
/// single-threaded, matching the event-loop model of the rest of the crate.
///
/// Children are assumed to be clipped to their parent's area; anything that
/// escapes its parent visually (a popover, an overlay) should be inserted as
/// a separate root via [`ViewTree::insert_root`].
#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    inner: Rc<RefCell<TreeInner>>,
}

impl ViewTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top-level node. Later roots sit on top for hit-testing.
    pub fn insert_root(&self, area: Rect) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = NodeId(inner.nodes.len());
        inner.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            area,
            removed: false,
        });
        inner.roots.push(id);
        id
    }

    /// Insert a node under `parent`. Later siblings sit on top.
    ///
    /// Inserting under a removed parent yields a node that is itself
    /// detached: it fails containment and is invisible to hit-testing.
    pub fn insert(&self, parent: NodeId, area: Rect) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let orphaned = !inner.alive(parent);
        let id = NodeId(inner.nodes.len());
        inner.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            area,
            removed: orphaned,
        });
        if !orphaned {
            inner.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Detach a node and its whole subtree.
    ///
    /// Removed nodes fail [`ViewTree::contains`] and are skipped by
    /// [`ViewTree::hit_test`]. Removing an already-removed node is a no-op.
    pub fn remove(&self, id: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.alive(id) {
            return;
        }
        if let Some(parent) = inner.nodes[id.0].parent {
            inner.nodes[parent.0].children.retain(|&child| child != id);
        } else {
            inner.roots.retain(|&root| root != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            inner.nodes[current.0].removed = true;
            stack.extend(inner.nodes[current.0].children.iter().copied());
        }
    }

    /// Whether the node exists and has not been removed.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.inner.borrow().alive(id)
    }

    /// The on-screen area of a node.
    pub fn area(&self, id: NodeId) -> Rect {
        self.inner.borrow().nodes[id.0].area
    }

    /// Update the on-screen area of a node (e.g. after a resize).
    pub fn set_area(&self, id: NodeId, area: Rect) {
        self.inner.borrow_mut().nodes[id.0].area = area;
    }

    /// True when `node` is `ancestor` itself or a descendant of it.
    ///
    /// Evaluated against the tree as it is right now; removed nodes are
    /// contained by nothing and contain nothing.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let inner = self.inner.borrow();
        if !inner.alive(ancestor) || !inner.alive(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = inner.nodes[id.0].parent;
        }
        false
    }

    /// The deepest live node containing the point, if any.
    ///
    /// Roots and siblings are checked last-inserted first, so overlays drawn
    /// later win over what they cover.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<NodeId> {
        let inner = self.inner.borrow();
        for &root in inner.roots.iter().rev() {
            if let Some(hit) = inner.hit_node(root, x, y) {
                return Some(hit);
            }
        }
        None
    }

    /// Number of live nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.inner
            .borrow()
            .nodes
            .iter()
            .filter(|node| !node.removed)
            .count()
    }
}

/// Mutable holder of an optional region node.
///
/// The host keeps one of these per tracked component and updates it as the
/// component mounts and unmounts. Watchers hold a clone and read the current
/// value at the moment each event fires, never a snapshot taken at
/// registration time.
#[derive(Debug, Clone, Default)]
pub struct RegionHandle {
    current: Rc<Cell<Option<NodeId>>>,
}

impl RegionHandle {
    /// Create a holder with no region (not yet mounted).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a holder already pointing at a node.
    pub fn for_node(id: NodeId) -> Self {
        let handle = Self::default();
        handle.current.set(Some(id));
        handle
    }

    /// Replace the current region.
    pub fn set(&self, id: Option<NodeId>) {
        self.current.set(id);
    }

    /// Clear the region (unmounted).
    pub fn clear(&self) {
        self.current.set(None);
    }

    /// Read the current region.
    pub fn get(&self) -> Option<NodeId> {
        self.current.get()
    }
}

/// Half-open containment check, widened to avoid overflow at the u16 edge.
fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    let (x, y) = (u32::from(x), u32::from(y));
    x >= u32::from(rect.x)
        && x < u32::from(rect.x) + u32::from(rect.width)
        && y >= u32::from(rect.y)
        && y < u32::from(rect.y) + u32::from(rect.height)
}
