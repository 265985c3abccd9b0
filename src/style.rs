//! The computed-style subset the container resolver reads
//!
//! A scroll container is found by walking ancestors and inspecting exactly
//! four computed properties: `position`, `overflow`, `overflow-x`, and
//! `overflow-y`. This module defines keyword enums for the first and the
//! last three, plus the small [`ComputedStyle`] record a geometry oracle
//! returns per node.
//!
//! # Examples
//!
//! ```
//! use scrolltrack::{ComputedStyle, Overflow, Position};
//!
//! let mut style = ComputedStyle::default();
//! assert!(!style.establishes_scroll_container());
//!
//! style.overflow_y = Overflow::Auto;
//! assert!(style.establishes_scroll_container());
//! ```

use std::fmt;

/// CSS `position` property value
///
/// Only the distinctions the resolver cares about are given predicates:
/// `absolute` ancestors are skipped during the container walk, and `fixed`
/// starting elements are rejected outright.
///
/// # Examples
///
/// ```
/// use scrolltrack::Position;
///
/// assert!(Position::Fixed.is_fixed());
/// assert!(Position::Absolute.is_absolutely_positioned());
/// assert!(!Position::Static.is_fixed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
  /// Normal flow, no positioning offset (default)
  #[default]
  Static,
  /// Normal flow, offset relative to itself
  Relative,
  /// Out-of-flow, positioned relative to the containing block
  Absolute,
  /// Out-of-flow, positioned relative to the viewport; never moves on scroll
  Fixed,
  /// Normal flow until a scroll threshold, then viewport-pinned
  Sticky,
}

impl Position {
  /// Returns true if the element is absolutely positioned
  ///
  /// Absolutely positioned ancestors do not participate in scroll
  /// containment and are skipped by the resolver.
  pub fn is_absolutely_positioned(self) -> bool {
    matches!(self, Position::Absolute)
  }

  /// Returns true if the element is fixed positioned
  ///
  /// Fixed elements have no meaningful scroll container; registering one
  /// fails with [`Error::FixedPosition`](crate::Error::FixedPosition).
  pub fn is_fixed(self) -> bool {
    matches!(self, Position::Fixed)
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Position::Static => "static",
      Position::Relative => "relative",
      Position::Absolute => "absolute",
      Position::Fixed => "fixed",
      Position::Sticky => "sticky",
    };
    write!(f, "{}", s)
  }
}

/// CSS `overflow` keyword (also used for the `overflow-x`/`overflow-y`
/// longhands)
///
/// # Examples
///
/// ```
/// use scrolltrack::Overflow;
///
/// assert!(Overflow::Auto.is_scroll_container());
/// assert!(Overflow::Hidden.is_scroll_container());
/// assert!(!Overflow::Visible.is_scroll_container());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
  /// Content is not clipped (default)
  #[default]
  Visible,
  /// Content is clipped, no scrollbars; still scrollable programmatically
  Hidden,
  /// Content is clipped, scrollbars always shown
  Scroll,
  /// Content is clipped, scrollbars shown when needed
  Auto,
  /// Content is clipped at the overflow clip edge; not scrollable
  Clip,
}

impl Overflow {
  /// Returns true if this keyword makes the element a scroll container
  ///
  /// `hidden` counts: it clips and repositions content exactly like a
  /// scroll container even though the user cannot scroll it directly.
  /// `clip` does not: a clipped box is never scrollable.
  pub fn is_scroll_container(self) -> bool {
    matches!(self, Overflow::Auto | Overflow::Scroll | Overflow::Hidden)
  }
}

impl fmt::Display for Overflow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Overflow::Visible => "visible",
      Overflow::Hidden => "hidden",
      Overflow::Scroll => "scroll",
      Overflow::Auto => "auto",
      Overflow::Clip => "clip",
    };
    write!(f, "{}", s)
  }
}

/// The computed-style record a geometry oracle returns per node
///
/// `overflow` is the shorthand as computed; browsers resolve the shorthand
/// into both longhands, but the resolver checks all three so oracles that
/// only populate one field still resolve correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
  /// Computed `position`
  pub position: Position,
  /// Computed `overflow` shorthand
  pub overflow: Overflow,
  /// Computed `overflow-x`
  pub overflow_x: Overflow,
  /// Computed `overflow-y`
  pub overflow_y: Overflow,
}

impl ComputedStyle {
  /// Returns true if any overflow property makes this node a scroll
  /// container
  ///
  /// # Examples
  ///
  /// ```
  /// use scrolltrack::{ComputedStyle, Overflow};
  ///
  /// let style = ComputedStyle {
  ///   overflow_x: Overflow::Scroll,
  ///   ..ComputedStyle::default()
  /// };
  /// assert!(style.establishes_scroll_container());
  /// ```
  pub fn establishes_scroll_container(&self) -> bool {
    self.overflow.is_scroll_container()
      || self.overflow_y.is_scroll_container()
      || self.overflow_x.is_scroll_container()
  }

  /// Convenience constructor for a vertically scrollable node
  ///
  /// # Examples
  ///
  /// ```
  /// use scrolltrack::ComputedStyle;
  ///
  /// assert!(ComputedStyle::scroller().establishes_scroll_container());
  /// ```
  pub fn scroller() -> Self {
    Self {
      overflow_y: Overflow::Auto,
      ..Self::default()
    }
  }
}
