//! Container registry: listener lifecycle and child bookkeeping
//!
//! The registry maps each live container to a [`ContainerEntry`] holding
//! the container's listener target, the guards for its one scroll and one
//! resize listener, and the streams of the elements tracked under it.
//!
//! Two invariants hold at every public-method boundary:
//!
//! - an entry exists iff its children map is non-empty (no idle
//!   containers persist), and
//! - exactly one scroll and one resize listener are attached per entry.
//!
//! The registry never runs observer callbacks itself: methods that remove
//! streams hand them back uncompleted, and the engine completes them once
//! its registry borrow is released, so completion observers can re-enter
//! the engine.

use crate::dom::{ListenerGuard, ListenerTarget, NodeId};
use crate::error::{Error, Result};
use crate::stream::PositionStream;
use rustc_hash::FxHashMap;

/// Per-container bookkeeping: listener guards plus tracked children
#[derive(Debug)]
pub struct ContainerEntry {
  target: ListenerTarget,
  scroll_guard: ListenerGuard,
  resize_guard: ListenerGuard,
  children: FxHashMap<NodeId, PositionStream>,
}

/// Mapping from container to [`ContainerEntry`]
///
/// Keys are [`NodeId`] handles, which are identity-equal across calls, so
/// the map has identity-map semantics without relying on host reference
/// equality.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
  containers: FxHashMap<NodeId, ContainerEntry>,
}

impl ContainerRegistry {
  /// Creates an empty registry
  pub fn new() -> Self {
    Self::default()
  }

  /// Ensures `container` has its listener pair attached
  ///
  /// Idempotent: on the first call for a container, `attach` is invoked to
  /// perform the native registrations and the resulting guards are stored;
  /// subsequent calls are no-ops and never re-attach.
  pub fn ensure_listening(
    &mut self,
    container: NodeId,
    attach: impl FnOnce() -> (ListenerTarget, ListenerGuard, ListenerGuard),
  ) {
    self.containers.entry(container).or_insert_with(|| {
      let (target, scroll_guard, resize_guard) = attach();
      ContainerEntry {
        target,
        scroll_guard,
        resize_guard,
        children: FxHashMap::default(),
      }
    });
  }

  /// Creates and stores a fresh stream for `element` under `container`
  ///
  /// Fails with [`Error::InvariantViolation`] if the container has no
  /// listeners attached yet. If the element is already tracked under this
  /// container its old stream is displaced and returned uncompleted; the
  /// caller completes it outside its registry borrow.
  pub fn add_child(
    &mut self,
    container: NodeId,
    element: NodeId,
  ) -> Result<(PositionStream, Option<PositionStream>)> {
    let entry = self.containers.get_mut(&container).ok_or_else(|| {
      Error::InvariantViolation(format!(
        "add_child for container {container:?} before ensure_listening"
      ))
    })?;
    let stream = PositionStream::new();
    let displaced = entry.children.insert(element, stream.clone());
    Ok((stream, displaced))
  }

  /// Removes `element` from `container`, draining the container if it was
  /// the last child
  ///
  /// The removed stream is returned uncompleted; the caller completes it
  /// outside its registry borrow. When the children map becomes empty the
  /// listener guards are disposed and the entry is deleted. Unknown
  /// container/element pairs return `None`.
  pub fn remove_child(&mut self, container: NodeId, element: NodeId) -> Option<PositionStream> {
    let entry = self.containers.get_mut(&container)?;
    let stream = entry.children.remove(&element)?;
    if entry.children.is_empty() {
      if let Some(entry) = self.containers.remove(&container) {
        entry.scroll_guard.dispose();
        entry.resize_guard.dispose();
      }
    }
    Some(stream)
  }

  /// Finds the container an element is tracked under, if any
  ///
  /// A linear scan: unregistration is rare and registries are small, so no
  /// secondary index is kept.
  pub fn container_of(&self, element: NodeId) -> Option<NodeId> {
    self
      .containers
      .iter()
      .find(|(_, entry)| entry.children.contains_key(&element))
      .map(|(container, _)| *container)
  }

  /// Returns the listener target and a snapshot of the child streams for
  /// `container`
  ///
  /// The snapshot lets the recompute pass push samples without holding any
  /// borrow of the registry, so observers may re-enter it.
  pub fn snapshot(&self, container: NodeId) -> Option<(ListenerTarget, Vec<(NodeId, PositionStream)>)> {
    self.containers.get(&container).map(|entry| {
      let children = entry
        .children
        .iter()
        .map(|(element, stream)| (*element, stream.clone()))
        .collect();
      (entry.target, children)
    })
  }

  /// Returns true if `container` has a live entry
  pub fn is_listening(&self, container: NodeId) -> bool {
    self.containers.contains_key(&container)
  }

  /// Number of live containers
  pub fn container_count(&self) -> usize {
    self.containers.len()
  }

  /// Total number of tracked elements across all containers
  pub fn tracked_len(&self) -> usize {
    self.containers.values().map(|entry| entry.children.len()).sum()
  }

  /// Detaches every listener and returns every live stream
  ///
  /// Called when the owning engine is dropped; the caller completes the
  /// returned streams once no registry borrow is held.
  pub fn clear(&mut self) -> Vec<PositionStream> {
    let mut streams = Vec::new();
    for (_, entry) in self.containers.drain() {
      streams.extend(entry.children.into_values());
      entry.scroll_guard.dispose();
      entry.resize_guard.dispose();
    }
    streams
  }
}
