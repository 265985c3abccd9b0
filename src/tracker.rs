//! The tracking engine: registration, recomputation, and teardown
//!
//! [`ScrollTracker`] composes the container resolver, the container
//! registry, and the geometry recomputation pass behind a two-method
//! surface:
//!
//! - [`register`](ScrollTracker::register) resolves the element's scroll
//!   container, attaches the container's listener pair on first use, adds
//!   the element with a fresh stream, and synchronously recomputes with a
//!   synthetic [`EventKind::Initial`] event, so every registration yields
//!   at least one sample before any real scroll occurs.
//! - [`unregister`](ScrollTracker::unregister) removes the element,
//!   detaching the container's listeners when the last child leaves.
//!
//! Everything is synchronous and single-threaded: ticks for one container
//! never interleave, and an unregistered element receives no further
//! samples.
//!
//! # Examples
//!
//! ```
//! use scrolltrack::{
//!   ComputedStyle, EventKind, ListenerTarget, MemoryDom, Rect, ScrollTracker, StreamEvent,
//! };
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! # fn main() -> scrolltrack::Result<()> {
//! let dom = MemoryDom::new(600.0);
//! let pane = dom.append(
//!   dom.body(),
//!   ComputedStyle::scroller(),
//!   Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
//! );
//! let item = dom.append(pane, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
//!
//! let tracker = ScrollTracker::new(Rc::new(dom.clone()));
//! let stream = tracker.register(item)?;
//!
//! let samples = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&samples);
//! let _sub = stream.subscribe(move |event| {
//!   if let StreamEvent::Next(sample) = event {
//!     sink.borrow_mut().push(sample);
//!   }
//! });
//!
//! // The registration-time baseline replays immediately.
//! assert_eq!(samples.borrow().len(), 1);
//! assert_eq!(samples.borrow()[0].event, EventKind::Initial);
//!
//! // Scroll the pane; the listener tick pushes a fresh sample.
//! dom.scroll_children_by(pane, -30.0);
//! dom.emit(ListenerTarget::Element(pane), EventKind::Scroll)?;
//! assert_eq!(samples.borrow().len(), 2);
//! assert_eq!(samples.borrow()[1].data.element_top.from_container_top.pixels, 70.0);
//! # Ok(())
//! # }
//! ```

use crate::dom::{Dom, EventKind, ListenerTarget, NodeId, TickHandler};
use crate::error::Result;
use crate::registry::ContainerRegistry;
use crate::resolver::resolve_container;
use crate::sample::PositionSample;
use crate::stream::PositionStream;
use std::cell::RefCell;
use std::rc::Rc;

/// Position-tracking engine over a [`Dom`] environment
///
/// One engine owns one registry. N tracked elements sharing a container
/// produce exactly one scroll listener and one resize listener on that
/// container's target; the pair is detached the moment the container's
/// last element unregisters. Dropping the engine completes every live
/// stream and detaches every listener.
pub struct ScrollTracker<D: Dom + 'static> {
  dom: Rc<D>,
  registry: Rc<RefCell<ContainerRegistry>>,
}

impl<D: Dom + 'static> ScrollTracker<D> {
  /// Creates an engine with an empty registry
  pub fn new(dom: Rc<D>) -> Self {
    Self {
      dom,
      registry: Rc::new(RefCell::new(ContainerRegistry::new())),
    }
  }

  /// Registers `element` for position tracking
  ///
  /// Resolution failures ([`Error::NoScrollableAncestor`],
  /// [`Error::FixedPosition`]) propagate unchanged, and registration is
  /// atomic: nothing is added to the registry before resolution succeeds.
  ///
  /// On success the returned stream already retains an
  /// [`EventKind::Initial`] sample, so the first subscriber observes a
  /// baseline synchronously.
  ///
  /// Registering an element that is already tracked completes its old
  /// stream and starts a fresh one, even when the element's resolved
  /// container has changed since the previous call.
  ///
  /// [`Error::NoScrollableAncestor`]: crate::Error::NoScrollableAncestor
  /// [`Error::FixedPosition`]: crate::Error::FixedPosition
  pub fn register(&self, element: NodeId) -> Result<PositionStream> {
    let container = resolve_container(self.dom.as_ref(), element)?;

    let (stream, displaced) = {
      let mut registry = self.registry.borrow_mut();
      // Tree or style mutations may have moved the element to a different
      // container; the old container must not keep a stale stream.
      let moved = match registry.container_of(element) {
        Some(previous) if previous != container => registry.remove_child(previous, element),
        _ => None,
      };
      registry.ensure_listening(container, || {
        let target = if self.dom.is_body(container) {
          ListenerTarget::Window
        } else {
          ListenerTarget::Element(container)
        };
        let scroll = self.dom.listen(target, EventKind::Scroll, self.tick_handler(container));
        let resize = self.dom.listen(target, EventKind::Resize, self.tick_handler(container));
        (target, scroll, resize)
      });
      let (stream, replaced) = registry.add_child(container, element)?;
      (stream, moved.or(replaced))
    };
    // Completed outside the registry borrow so completion observers may
    // re-enter the engine.
    if let Some(old) = displaced {
      old.complete();
    }

    recompute(self.dom.as_ref(), &self.registry, EventKind::Initial, container)?;
    Ok(stream)
  }

  /// Stops tracking `element`
  ///
  /// Idempotent and never fails: unknown or already-unregistered elements
  /// are a no-op. The element's stream completes before this call returns,
  /// and if it was the container's last child the native listeners are
  /// detached synchronously.
  pub fn unregister(&self, element: NodeId) {
    let removed = {
      let mut registry = self.registry.borrow_mut();
      registry
        .container_of(element)
        .and_then(|container| registry.remove_child(container, element))
    };
    // Completed outside the registry borrow so completion observers may
    // re-enter the engine.
    if let Some(stream) = removed {
      stream.complete();
    }
  }

  /// Number of elements currently tracked
  pub fn tracked_len(&self) -> usize {
    self.registry.borrow().tracked_len()
  }

  /// Number of containers with live listeners
  pub fn container_count(&self) -> usize {
    self.registry.borrow().container_count()
  }

  /// Builds the handler invoked for every native event on `container`
  ///
  /// The handler holds weak references so the host environment never keeps
  /// a dropped engine alive; a tick arriving after the engine is gone is a
  /// no-op.
  fn tick_handler(&self, container: NodeId) -> TickHandler {
    let dom = Rc::downgrade(&self.dom);
    let registry = Rc::downgrade(&self.registry);
    Box::new(move |event| {
      let (Some(dom), Some(registry)) = (dom.upgrade(), registry.upgrade()) else {
        return Ok(());
      };
      recompute(dom.as_ref(), &registry, event, container)
    })
  }
}

impl<D: Dom + 'static> Drop for ScrollTracker<D> {
  fn drop(&mut self) {
    let streams = self.registry.borrow_mut().clear();
    for stream in streams {
      stream.complete();
    }
  }
}

/// Recomputes and publishes samples for every element of `container`
///
/// Container metrics branch on the listener target: window-level containers
/// use viewport height with top pinned to zero, element containers use
/// their own bounding rectangle. One rectangle read per element, one for
/// the container, every tick.
fn recompute<D: Dom + ?Sized>(
  dom: &D,
  registry: &Rc<RefCell<ContainerRegistry>>,
  event: EventKind,
  container: NodeId,
) -> Result<()> {
  let Some((target, children)) = registry.borrow().snapshot(container) else {
    return Ok(());
  };

  let (container_top, container_height) = match target {
    ListenerTarget::Window => (0.0, dom.viewport_height()),
    ListenerTarget::Element(_) => {
      let rect = dom.bounding_rect(container);
      (rect.top(), rect.height())
    }
  };

  for (element, stream) in children {
    // An observer earlier in this tick may have unregistered this element.
    if stream.is_completed() {
      continue;
    }
    let rect = dom.bounding_rect(element);
    let sample = PositionSample::compute(event, element, rect, container_top, container_height);
    stream.push(sample)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::MemoryDom;
  use crate::geometry::Rect;
  use crate::style::ComputedStyle;

  fn fixture() -> (MemoryDom, ScrollTracker<MemoryDom>, NodeId, NodeId) {
    let dom = MemoryDom::new(600.0);
    let pane = dom.append(
      dom.body(),
      ComputedStyle::scroller(),
      Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
    );
    let item = dom.append(pane, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
    let tracker = ScrollTracker::new(Rc::new(dom.clone()));
    (dom, tracker, pane, item)
  }

  #[test]
  fn register_retains_an_initial_sample() {
    let (_dom, tracker, _pane, item) = fixture();
    let stream = tracker.register(item).unwrap();
    let baseline = stream.latest().unwrap();
    assert_eq!(baseline.event, EventKind::Initial);
    assert_eq!(baseline.element, item);
    assert_eq!(baseline.data.element_top.from_container_top.pixels, 100.0);
  }

  #[test]
  fn failed_registration_leaves_no_state() {
    let dom = MemoryDom::new(600.0);
    let tracker = ScrollTracker::new(Rc::new(dom.clone()));
    // The body has no ancestors, so registration cannot resolve.
    assert!(tracker.register(dom.body()).is_err());
    assert_eq!(tracker.tracked_len(), 0);
    assert_eq!(tracker.container_count(), 0);
    assert_eq!(dom.listen_count(), 0);
  }

  #[test]
  fn dropping_the_engine_detaches_and_completes() {
    let (dom, tracker, _pane, item) = fixture();
    let stream = tracker.register(item).unwrap();
    assert_eq!(dom.active_listener_count(), 2);
    drop(tracker);
    assert_eq!(dom.active_listener_count(), 0);
    assert!(stream.is_completed());
  }

  #[test]
  fn tick_after_engine_drop_is_a_noop() {
    let (dom, tracker, pane, item) = fixture();
    let _stream = tracker.register(item).unwrap();
    drop(tracker);
    // Listeners are already detached; emitting finds no handlers.
    dom.emit(ListenerTarget::Element(pane), EventKind::Scroll).unwrap();
  }

  #[test]
  fn reregistering_replaces_the_stream() {
    let (dom, tracker, _pane, item) = fixture();
    let old = tracker.register(item).unwrap();
    let new = tracker.register(item).unwrap();
    assert!(old.is_completed());
    assert!(!new.is_completed());
    assert_eq!(tracker.tracked_len(), 1);
    // Still one listener pair.
    assert_eq!(dom.listen_count(), 2);
  }

  #[test]
  fn reregistering_after_a_container_change_moves_the_element() {
    let dom = MemoryDom::new(600.0);
    let wrapper = dom.append(
      dom.body(),
      ComputedStyle::default(),
      Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
    );
    let item = dom.append(wrapper, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
    let tracker = ScrollTracker::new(Rc::new(dom.clone()));

    // The wrapper is plain, so the first registration resolves to the body.
    let old = tracker.register(item).unwrap();
    assert_eq!(tracker.container_count(), 1);

    dom.set_style(wrapper, ComputedStyle::scroller());
    let new = tracker.register(item).unwrap();

    assert!(old.is_completed());
    assert!(!new.is_completed());
    assert_eq!(tracker.tracked_len(), 1);
    assert_eq!(tracker.container_count(), 1);
    // The window pair is detached, the wrapper's pair attached.
    assert_eq!(dom.active_listener_count(), 2);
  }
}
