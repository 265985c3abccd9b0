//! Geometry primitives for position tracking
//!
//! All units are CSS pixels. The coordinate system has its origin at the
//! top-left corner of the viewport: positive X extends right, positive Y
//! extends downward, matching the coordinates returned by
//! `getBoundingClientRect`-style queries.
//!
//! [`Rect`] is the bounding-rectangle type the geometry oracle hands back;
//! the tracking engine only ever reads its vertical edges and height.

use std::fmt;

/// A 2D point in CSS pixel space
///
/// # Examples
///
/// ```
/// use scrolltrack::Point;
///
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x, 10.0);
/// assert_eq!(p.y, 20.0);
/// assert_eq!(Point::ZERO, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  /// X coordinate (increases to the right)
  pub x: f32,
  /// Y coordinate (increases downward)
  pub y: f32,
}

impl Point {
  /// The origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D size (width and height) in CSS pixels
///
/// # Examples
///
/// ```
/// use scrolltrack::Size;
///
/// let size = Size::new(400.0, 500.0);
/// assert_eq!(size.height, 500.0);
/// assert!(Size::ZERO.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
  /// Width (horizontal extent)
  pub width: f32,
  /// Height (vertical extent)
  pub height: f32,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new size with the given dimensions
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Returns true if either dimension is zero
  pub fn is_empty(self) -> bool {
    self.width == 0.0 || self.height == 0.0
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}×{}", self.width, self.height)
  }
}

/// An axis-aligned bounding rectangle in CSS pixel space
///
/// Defined by an origin (top-left corner) and a size. Edge accessors use
/// client-rect naming (`top`/`bottom`/`left`/`right`) since rectangles in
/// this crate come from bounding-rect queries against a live tree.
///
/// # Examples
///
/// ```
/// use scrolltrack::Rect;
///
/// let rect = Rect::from_xywh(0.0, 100.0, 400.0, 50.0);
/// assert_eq!(rect.top(), 100.0);
/// assert_eq!(rect.bottom(), 150.0);
/// assert_eq!(rect.height(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  /// The top-left corner of the rectangle
  pub origin: Point,
  /// The size (width and height) of the rectangle
  pub size: Size,
}

impl Rect {
  /// A zero-sized rectangle at the origin
  pub const ZERO: Self = Self {
    origin: Point::ZERO,
    size: Size::ZERO,
  };

  /// Creates a new rectangle from an origin point and size
  pub const fn new(origin: Point, size: Size) -> Self {
    Self { origin, size }
  }

  /// Creates a rectangle from x, y, width, height components
  ///
  /// # Examples
  ///
  /// ```
  /// use scrolltrack::Rect;
  ///
  /// let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);
  /// assert_eq!(rect.left(), 10.0);
  /// assert_eq!(rect.width(), 100.0);
  /// ```
  pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      origin: Point::new(x, y),
      size: Size::new(width, height),
    }
  }

  /// Returns the width
  pub fn width(self) -> f32 {
    self.size.width
  }

  /// Returns the height
  pub fn height(self) -> f32 {
    self.size.height
  }

  /// Returns the x coordinate of the left edge
  pub fn left(self) -> f32 {
    self.origin.x
  }

  /// Returns the x coordinate of the right edge
  pub fn right(self) -> f32 {
    self.origin.x + self.size.width
  }

  /// Returns the y coordinate of the top edge
  pub fn top(self) -> f32 {
    self.origin.y
  }

  /// Returns the y coordinate of the bottom edge
  pub fn bottom(self) -> f32 {
    self.origin.y + self.size.height
  }

  /// Returns this rectangle shifted vertically by `dy`
  ///
  /// Useful for simulating a scroll: every descendant rect of a scrolled
  /// container moves by the negated scroll delta.
  ///
  /// # Examples
  ///
  /// ```
  /// use scrolltrack::Rect;
  ///
  /// let rect = Rect::from_xywh(0.0, 100.0, 50.0, 50.0);
  /// assert_eq!(rect.offset_y(-30.0).top(), 70.0);
  /// ```
  pub fn offset_y(self, dy: f32) -> Self {
    Self {
      origin: Point::new(self.origin.x, self.origin.y + dy),
      size: self.size,
    }
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.origin, self.size)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn edges_derive_from_origin_and_size() {
    let rect = Rect::from_xywh(10.0, 100.0, 300.0, 40.0);
    assert_eq!(rect.left(), 10.0);
    assert_eq!(rect.right(), 310.0);
    assert_eq!(rect.top(), 100.0);
    assert_eq!(rect.bottom(), 140.0);
  }

  #[test]
  fn offset_y_moves_both_edges() {
    let rect = Rect::from_xywh(0.0, 100.0, 10.0, 50.0).offset_y(-120.0);
    assert_eq!(rect.top(), -20.0);
    assert_eq!(rect.bottom(), 30.0);
    assert_eq!(rect.height(), 50.0);
  }

  #[test]
  fn zero_rect_is_empty() {
    assert!(Rect::ZERO.size.is_empty());
    assert_eq!(Rect::ZERO.bottom(), 0.0);
  }
}
