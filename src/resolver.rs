//! Container resolution: finding an element's nearest scrollable ancestor
//!
//! The walk starts at the element's immediate parent and moves upward:
//!
//! 1. A `position: absolute` ancestor does not participate in scroll
//!    containment and is skipped.
//! 2. The document body resolves unconditionally; it is always the
//!    tracking boundary, with or without explicit overflow styling.
//! 3. Otherwise the first ancestor whose `overflow`/`overflow-y`/
//!    `overflow-x` is `auto`, `scroll`, or `hidden` resolves.
//!
//! Resolution is O(tree depth) and performs no caching: container identity
//! can change between calls if the tree is mutated, and one `register`
//! resolves exactly once.

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// Resolves the scroll container for `element`
///
/// Fails with [`Error::FixedPosition`] if the starting element itself is
/// `position: fixed` (it never moves relative to any container), and with
/// [`Error::NoScrollableAncestor`] if the walk exhausts all ancestors
/// without a match.
///
/// # Examples
///
/// ```
/// use scrolltrack::{resolve_container, ComputedStyle, MemoryDom, Rect};
///
/// let dom = MemoryDom::new(600.0);
/// let pane = dom.append(dom.body(), ComputedStyle::scroller(), Rect::ZERO);
/// let item = dom.append(pane, ComputedStyle::default(), Rect::ZERO);
///
/// assert_eq!(resolve_container(&dom, item).unwrap(), pane);
/// ```
pub fn resolve_container<D: Dom + ?Sized>(dom: &D, element: NodeId) -> Result<NodeId> {
  if dom.computed_style(element).position.is_fixed() {
    return Err(Error::FixedPosition(element));
  }

  let mut current = element;
  while let Some(parent) = dom.parent_of(current) {
    current = parent;
    let style = dom.computed_style(parent);
    if style.position.is_absolutely_positioned() {
      continue;
    }
    if dom.is_body(parent) {
      return Ok(parent);
    }
    if style.establishes_scroll_container() {
      return Ok(parent);
    }
  }

  Err(Error::NoScrollableAncestor(element))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::MemoryDom;
  use crate::geometry::Rect;
  use crate::style::{ComputedStyle, Overflow, Position};

  fn styled(position: Position, overflow_y: Overflow) -> ComputedStyle {
    ComputedStyle {
      position,
      overflow_y,
      ..ComputedStyle::default()
    }
  }

  #[test]
  fn resolves_nearest_overflowing_ancestor() {
    let dom = MemoryDom::new(600.0);
    let outer = dom.append(dom.body(), ComputedStyle::scroller(), Rect::ZERO);
    let inner = dom.append(outer, ComputedStyle::scroller(), Rect::ZERO);
    let item = dom.append(inner, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), inner);
  }

  #[test]
  fn resolution_is_deterministic() {
    let dom = MemoryDom::new(600.0);
    let pane = dom.append(dom.body(), ComputedStyle::scroller(), Rect::ZERO);
    let item = dom.append(pane, ComputedStyle::default(), Rect::ZERO);
    let first = resolve_container(&dom, item).unwrap();
    let second = resolve_container(&dom, item).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn overflow_hidden_counts_as_containment() {
    let dom = MemoryDom::new(600.0);
    let clipper = dom.append(dom.body(), styled(Position::Static, Overflow::Hidden), Rect::ZERO);
    let item = dom.append(clipper, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), clipper);
  }

  #[test]
  fn absolute_ancestors_are_skipped() {
    let dom = MemoryDom::new(600.0);
    let pane = dom.append(dom.body(), ComputedStyle::scroller(), Rect::ZERO);
    // Absolutely positioned AND overflowing: still skipped.
    let skipped = dom.append(pane, styled(Position::Absolute, Overflow::Scroll), Rect::ZERO);
    let item = dom.append(skipped, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), pane);
  }

  #[test]
  fn body_resolves_without_overflow_styling() {
    let dom = MemoryDom::new(600.0);
    let plain = dom.append(dom.body(), ComputedStyle::default(), Rect::ZERO);
    let item = dom.append(plain, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), dom.body());
  }

  #[test]
  fn fixed_start_element_is_rejected() {
    let dom = MemoryDom::new(600.0);
    let pane = dom.append(dom.body(), ComputedStyle::scroller(), Rect::ZERO);
    let item = dom.append(pane, styled(Position::Fixed, Overflow::Visible), Rect::ZERO);
    assert_eq!(
      resolve_container(&dom, item).unwrap_err(),
      Error::FixedPosition(item)
    );
  }

  #[test]
  fn fixed_ancestor_does_not_reject() {
    // Only the starting element's own position matters for the fixed check.
    let dom = MemoryDom::new(600.0);
    let fixed = dom.append(dom.body(), styled(Position::Fixed, Overflow::Auto), Rect::ZERO);
    let item = dom.append(fixed, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), fixed);
  }

  #[test]
  fn resolution_follows_style_mutations() {
    // No caching across calls: restyling an ancestor changes the result.
    let dom = MemoryDom::new(600.0);
    let middle = dom.append(dom.body(), ComputedStyle::default(), Rect::ZERO);
    let item = dom.append(middle, ComputedStyle::default(), Rect::ZERO);
    assert_eq!(resolve_container(&dom, item).unwrap(), dom.body());

    dom.set_style(middle, ComputedStyle::scroller());
    assert_eq!(resolve_container(&dom, item).unwrap(), middle);
  }

  #[test]
  fn detached_subtree_has_no_container() {
    // A single root that is not the body cannot happen in MemoryDom (the
    // body is the root), so exercise exhaustion with the body itself: its
    // parent walk is empty.
    let dom = MemoryDom::new(600.0);
    assert_eq!(
      resolve_container(&dom, dom.body()).unwrap_err(),
      Error::NoScrollableAncestor(dom.body())
    );
  }
}
