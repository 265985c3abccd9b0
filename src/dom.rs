//! The environment boundary: node handles, event listening, and an
//! in-memory DOM
//!
//! The tracking engine never touches a real layout engine. Everything it
//! needs from the host (bounding rectangles, computed styles, viewport
//! height, parent traversal, and native scroll/resize listeners) goes
//! through the [`Dom`] trait. A browser embedding implements it over real
//! DOM bindings; [`MemoryDom`] implements it over a plain in-memory tree
//! for tests, benches, and headless hosts.
//!
//! Listener registration follows a capability model: [`Dom::listen`]
//! attaches a handler and returns a [`ListenerGuard`] whose disposal is the
//! only way to detach it. The container registry stores one guard pair per
//! live container and drops them when the container drains.

use crate::error::Result;
use crate::geometry::Rect;
use crate::style::ComputedStyle;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Opaque handle identifying one node in the host tree
///
/// Handles are identity-equal across calls: the same node always yields the
/// same `NodeId`, so they can key hash maps without relying on reference
/// equality of host objects.
///
/// # Examples
///
/// ```
/// use scrolltrack::NodeId;
///
/// let a = NodeId::from_raw(3);
/// assert_eq!(a, NodeId::from_raw(3));
/// assert_eq!(a.as_raw(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
  /// Creates a handle from a raw id
  pub const fn from_raw(id: u64) -> Self {
    Self(id)
  }

  /// Returns the raw id
  pub const fn as_raw(self) -> u64 {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// The object native listeners are attached to
///
/// Body-level scrolling dispatches its events on the window, not on the
/// body element, so a container that resolves to the document body listens
/// on [`ListenerTarget::Window`]. Every other container listens on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
  /// The window / viewport
  Window,
  /// A scrollable element
  Element(NodeId),
}

/// The event that caused a recomputation tick
///
/// Serializes lowercase so samples carry a stable `"initial"` / `"scroll"`
/// / `"resize"` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  /// Synthetic event delivered once, synchronously, at registration time
  Initial,
  /// Native scroll event on the listener target
  Scroll,
  /// Native resize event on the listener target
  Resize,
}

/// Callback invoked for every native event on a listener target
///
/// Returns `Result` so a failure inside a tick (a stream lifecycle bug, or
/// an oracle error in a fallible embedding) propagates to whatever drove
/// the tick instead of being swallowed.
pub type TickHandler = Box<dyn FnMut(EventKind) -> Result<()>>;

/// Capability to detach one attached listener
///
/// Returned by [`Dom::listen`]. Detaches on [`dispose`](Self::dispose) or
/// on drop, whichever comes first; detaching is idempotent.
pub struct ListenerGuard {
  detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
  /// Wraps a detach action
  pub fn new(detach: impl FnOnce() + 'static) -> Self {
    Self {
      detach: Some(Box::new(detach)),
    }
  }

  /// A guard that detaches nothing
  pub fn noop() -> Self {
    Self { detach: None }
  }

  /// Detaches the listener now
  pub fn dispose(mut self) {
    if let Some(detach) = self.detach.take() {
      detach();
    }
  }
}

impl Drop for ListenerGuard {
  fn drop(&mut self) {
    if let Some(detach) = self.detach.take() {
      detach();
    }
  }
}

impl fmt::Debug for ListenerGuard {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ListenerGuard")
      .field("armed", &self.detach.is_some())
      .finish()
  }
}

/// Everything the tracking engine needs from its host environment
///
/// Geometry reads are total: a live node always has a bounding rectangle
/// and a computed style. Fallible embeddings surface failures through their
/// tick driver, not through these accessors.
pub trait Dom {
  /// Returns the parent of `node`, or `None` at the tree root
  fn parent_of(&self, node: NodeId) -> Option<NodeId>;

  /// Returns the computed-style subset for `node`
  fn computed_style(&self, node: NodeId) -> ComputedStyle;

  /// Returns the bounding rectangle of `node` in viewport coordinates
  fn bounding_rect(&self, node: NodeId) -> Rect;

  /// Returns true if `node` is the document body
  fn is_body(&self, node: NodeId) -> bool;

  /// Returns the viewport height in CSS pixels
  fn viewport_height(&self) -> f32;

  /// Attaches `handler` for `event` on `target`; the returned guard is the
  /// only way to detach it
  fn listen(&self, target: ListenerTarget, event: EventKind, handler: TickHandler)
    -> ListenerGuard;
}

/// An in-memory DOM tree implementing [`Dom`]
///
/// Nodes carry a parent link, a computed style, and a bounding rectangle;
/// listeners are recorded with attach/detach counters so tests can assert
/// the listener-deduplication and teardown invariants. The tree is created
/// with the document body as its root.
///
/// `MemoryDom` is cheaply cloneable; clones share the same tree, so a host
/// can hand one clone to the tracker and keep another to mutate geometry
/// and dispatch events.
///
/// # Examples
///
/// ```
/// use scrolltrack::{ComputedStyle, EventKind, ListenerTarget, MemoryDom, Rect};
///
/// let dom = MemoryDom::new(600.0);
/// let pane = dom.append(
///   dom.body(),
///   ComputedStyle::scroller(),
///   Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
/// );
/// let item = dom.append(pane, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
///
/// // Simulate a 30px scroll of the pane: its content moves up.
/// dom.scroll_children_by(pane, -30.0);
/// dom.emit(ListenerTarget::Element(pane), EventKind::Scroll).unwrap();
/// # let _ = item;
/// ```
#[derive(Clone)]
pub struct MemoryDom {
  inner: Rc<RefCell<DomInner>>,
}

struct DomInner {
  nodes: Vec<NodeData>,
  viewport_height: f32,
  listeners: Vec<Option<ListenerSlot>>,
  listen_calls: usize,
  detach_calls: usize,
}

struct NodeData {
  parent: Option<NodeId>,
  style: ComputedStyle,
  rect: Rect,
}

struct ListenerSlot {
  target: ListenerTarget,
  event: EventKind,
  handler: Rc<RefCell<TickHandler>>,
}

impl MemoryDom {
  /// Creates a tree containing only the document body
  ///
  /// The body's rectangle spans the viewport width at the given height; it
  /// can be overridden with [`set_rect`](Self::set_rect).
  pub fn new(viewport_height: f32) -> Self {
    let body = NodeData {
      parent: None,
      style: ComputedStyle::default(),
      rect: Rect::from_xywh(0.0, 0.0, 800.0, viewport_height),
    };
    Self {
      inner: Rc::new(RefCell::new(DomInner {
        nodes: vec![body],
        viewport_height,
        listeners: Vec::new(),
        listen_calls: 0,
        detach_calls: 0,
      })),
    }
  }

  /// Returns the document body (the tree root)
  pub fn body(&self) -> NodeId {
    NodeId::from_raw(0)
  }

  /// Appends a child node under `parent` and returns its handle
  pub fn append(&self, parent: NodeId, style: ComputedStyle, rect: Rect) -> NodeId {
    let mut inner = self.inner.borrow_mut();
    let id = NodeId::from_raw(inner.nodes.len() as u64);
    inner.nodes.push(NodeData {
      parent: Some(parent),
      style,
      rect,
    });
    id
  }

  /// Replaces the bounding rectangle of `node`
  pub fn set_rect(&self, node: NodeId, rect: Rect) {
    self.inner.borrow_mut().node_mut(node).rect = rect;
  }

  /// Replaces the computed style of `node`
  pub fn set_style(&self, node: NodeId, style: ComputedStyle) {
    self.inner.borrow_mut().node_mut(node).style = style;
  }

  /// Shifts the rectangles of every descendant of `container` by `dy`
  ///
  /// Simulates scrolling: scrolling a container down by N pixels moves its
  /// content rectangles up by N (pass `dy = -N`). The container's own
  /// rectangle stays put. Call [`emit`](Self::emit) afterwards to deliver
  /// the corresponding scroll event.
  pub fn scroll_children_by(&self, container: NodeId, dy: f32) {
    let mut inner = self.inner.borrow_mut();
    for idx in 0..inner.nodes.len() {
      let id = NodeId::from_raw(idx as u64);
      if id != container && inner.is_descendant_of(id, container) {
        let rect = inner.nodes[idx].rect;
        inner.nodes[idx].rect = rect.offset_y(dy);
      }
    }
  }

  /// Delivers `event` to every handler attached to `target`
  ///
  /// Handlers are invoked outside the tree borrow, so they are free to read
  /// geometry and mutate tracker state. The first handler error aborts
  /// delivery and propagates, mirroring an exception escaping a native
  /// event callback.
  pub fn emit(&self, target: ListenerTarget, event: EventKind) -> Result<()> {
    let handlers: Vec<Rc<RefCell<TickHandler>>> = self
      .inner
      .borrow()
      .listeners
      .iter()
      .flatten()
      .filter(|slot| slot.target == target && slot.event == event)
      .map(|slot| Rc::clone(&slot.handler))
      .collect();
    for handler in handlers {
      (handler.borrow_mut())(event)?;
    }
    Ok(())
  }

  /// Total number of `listen` calls made against this tree
  pub fn listen_count(&self) -> usize {
    self.inner.borrow().listen_calls
  }

  /// Total number of listener detachments
  pub fn detach_count(&self) -> usize {
    self.inner.borrow().detach_calls
  }

  /// Number of listeners currently attached
  pub fn active_listener_count(&self) -> usize {
    self.inner.borrow().listeners.iter().flatten().count()
  }
}

impl DomInner {
  fn node(&self, node: NodeId) -> &NodeData {
    &self.nodes[node.as_raw() as usize]
  }

  fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
    &mut self.nodes[node.as_raw() as usize]
  }

  fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = node;
    while let Some(parent) = self.node(current).parent {
      if parent == ancestor {
        return true;
      }
      current = parent;
    }
    false
  }
}

impl Dom for MemoryDom {
  fn parent_of(&self, node: NodeId) -> Option<NodeId> {
    self.inner.borrow().node(node).parent
  }

  fn computed_style(&self, node: NodeId) -> ComputedStyle {
    self.inner.borrow().node(node).style
  }

  fn bounding_rect(&self, node: NodeId) -> Rect {
    self.inner.borrow().node(node).rect
  }

  fn is_body(&self, node: NodeId) -> bool {
    node == self.body()
  }

  fn viewport_height(&self) -> f32 {
    self.inner.borrow().viewport_height
  }

  fn listen(
    &self,
    target: ListenerTarget,
    event: EventKind,
    handler: TickHandler,
  ) -> ListenerGuard {
    let slot_idx = {
      let mut inner = self.inner.borrow_mut();
      inner.listen_calls += 1;
      let idx = inner.listeners.len();
      inner.listeners.push(Some(ListenerSlot {
        target,
        event,
        handler: Rc::new(RefCell::new(handler)),
      }));
      idx
    };
    let inner = Rc::clone(&self.inner);
    ListenerGuard::new(move || {
      let mut inner = inner.borrow_mut();
      if inner.listeners[slot_idx].take().is_some() {
        inner.detach_calls += 1;
      }
    })
  }
}
