//! Position samples: the values delivered to stream subscribers
//!
//! A [`PositionSample`] is an immutable snapshot of one element's vertical
//! offsets relative to its container at one evaluation tick. Four signed
//! pixel/ratio pairs are reported, one per (element edge × container edge)
//! combination; `ratio` is `pixels / container_height`.
//!
//! The serde field names are the crate's stable wire shape:
//!
//! ```json
//! {
//!   "event": "scroll",
//!   "elementHandle": 3,
//!   "data": {
//!     "elementTop":    { "fromContainerTop": { "pixels": 100.0, "ratio": 0.2 },
//!                        "fromContainerBottom": { "pixels": -400.0, "ratio": -0.8 } },
//!     "elementBottom": { "fromContainerTop": { "pixels": 150.0, "ratio": 0.3 },
//!                        "fromContainerBottom": { "pixels": -350.0, "ratio": -0.7 } }
//!   }
//! }
//! ```

use crate::dom::{EventKind, NodeId};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A signed offset in pixels with its container-height-normalized ratio
///
/// Negative values mean the measured edge lies outside (above) the
/// reference container edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetPair {
  /// Signed offset in CSS pixels
  pub pixels: f32,
  /// `pixels / container_height`; `0.0` for a zero-height container
  pub ratio: f32,
}

impl OffsetPair {
  fn new(pixels: f32, container_height: f32) -> Self {
    let ratio = if container_height == 0.0 {
      0.0
    } else {
      pixels / container_height
    };
    Self { pixels, ratio }
  }
}

/// Offsets of one element edge from both container edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOffsets {
  /// Distance from the container's top edge (positive = below it)
  pub from_container_top: OffsetPair,
  /// Distance from the container's bottom edge (negative = above it)
  pub from_container_bottom: OffsetPair,
}

/// Offsets for both element edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
  /// Where the element's top edge sits
  pub element_top: EdgeOffsets,
  /// Where the element's bottom edge sits
  pub element_bottom: EdgeOffsets,
}

/// One computed position snapshot for one tracked element
///
/// # Examples
///
/// ```
/// use scrolltrack::{EventKind, NodeId, PositionSample, Rect};
///
/// // 500px-tall container at the origin; 50px-tall element 100px down.
/// let sample = PositionSample::compute(
///   EventKind::Initial,
///   NodeId::from_raw(1),
///   Rect::from_xywh(0.0, 100.0, 400.0, 50.0),
///   0.0,
///   500.0,
/// );
/// assert_eq!(sample.data.element_top.from_container_top.pixels, 100.0);
/// assert_eq!(sample.data.element_top.from_container_top.ratio, 0.2);
/// assert_eq!(sample.data.element_bottom.from_container_bottom.pixels, -350.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
  /// The event that triggered this evaluation tick
  pub event: EventKind,
  /// The tracked element this sample describes
  #[serde(rename = "elementHandle")]
  pub element: NodeId,
  /// The four offset pairs
  pub data: PositionData,
}

impl PositionSample {
  /// Computes a sample from an element rectangle and container metrics
  ///
  /// `container_top` and `container_height` come from the container's own
  /// bounding rectangle, except for window-level containers where the top
  /// is forced to `0.0` and the height is the viewport height.
  pub fn compute(
    event: EventKind,
    element: NodeId,
    element_rect: Rect,
    container_top: f32,
    container_height: f32,
  ) -> Self {
    let container_bottom = container_top + container_height;
    let element_top = element_rect.top();
    let element_bottom = element_rect.bottom();
    Self {
      event,
      element,
      data: PositionData {
        element_top: EdgeOffsets {
          from_container_top: OffsetPair::new(element_top - container_top, container_height),
          from_container_bottom: OffsetPair::new(element_top - container_bottom, container_height),
        },
        element_bottom: EdgeOffsets {
          from_container_top: OffsetPair::new(element_bottom - container_top, container_height),
          from_container_bottom: OffsetPair::new(
            element_bottom - container_bottom,
            container_height,
          ),
        },
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reference_scenario() {
    // Container height 500 with top 0; element at top 100, height 50.
    let sample = PositionSample::compute(
      EventKind::Scroll,
      NodeId::from_raw(7),
      Rect::from_xywh(0.0, 100.0, 400.0, 50.0),
      0.0,
      500.0,
    );
    let data = sample.data;
    assert_eq!(data.element_top.from_container_top.pixels, 100.0);
    assert_eq!(data.element_top.from_container_top.ratio, 0.2);
    assert_eq!(data.element_bottom.from_container_top.pixels, 150.0);
    assert_eq!(data.element_bottom.from_container_top.ratio, 0.3);
    assert_eq!(data.element_top.from_container_bottom.pixels, -400.0);
    assert_eq!(data.element_top.from_container_bottom.ratio, -0.8);
    assert_eq!(data.element_bottom.from_container_bottom.pixels, -350.0);
    assert_eq!(data.element_bottom.from_container_bottom.ratio, -0.7);
  }

  #[test]
  fn offsets_are_relative_to_container_top() {
    // Container not at the viewport origin.
    let sample = PositionSample::compute(
      EventKind::Resize,
      NodeId::from_raw(1),
      Rect::from_xywh(0.0, 300.0, 100.0, 20.0),
      200.0,
      400.0,
    );
    assert_eq!(sample.data.element_top.from_container_top.pixels, 100.0);
    assert_eq!(sample.data.element_top.from_container_top.ratio, 0.25);
    assert_eq!(sample.data.element_bottom.from_container_bottom.pixels, -280.0);
  }

  #[test]
  fn element_above_the_container_is_negative_from_top() {
    let sample = PositionSample::compute(
      EventKind::Scroll,
      NodeId::from_raw(1),
      Rect::from_xywh(0.0, -60.0, 100.0, 40.0),
      0.0,
      500.0,
    );
    assert_eq!(sample.data.element_top.from_container_top.pixels, -60.0);
    assert_eq!(sample.data.element_bottom.from_container_top.pixels, -20.0);
  }

  #[test]
  fn zero_height_container_yields_zero_ratios() {
    let sample = PositionSample::compute(
      EventKind::Initial,
      NodeId::from_raw(1),
      Rect::from_xywh(0.0, 50.0, 100.0, 10.0),
      0.0,
      0.0,
    );
    assert_eq!(sample.data.element_top.from_container_top.pixels, 50.0);
    assert_eq!(sample.data.element_top.from_container_top.ratio, 0.0);
    assert_eq!(sample.data.element_bottom.from_container_bottom.ratio, 0.0);
  }

  #[test]
  fn serializes_with_wire_field_names() {
    let sample = PositionSample::compute(
      EventKind::Initial,
      NodeId::from_raw(3),
      Rect::from_xywh(0.0, 100.0, 400.0, 50.0),
      0.0,
      500.0,
    );
    let json = serde_json::to_value(sample).unwrap();
    assert_eq!(json["event"], "initial");
    assert_eq!(json["elementHandle"], 3);
    assert_eq!(json["data"]["elementTop"]["fromContainerTop"]["pixels"], 100.0);
    assert_eq!(json["data"]["elementBottom"]["fromContainerBottom"]["pixels"], -350.0);
    // Ratios widen f32 -> f64 in JSON, so compare through the same widening.
    let ratio = json["data"]["elementBottom"]["fromContainerBottom"]["ratio"]
      .as_f64()
      .unwrap();
    assert_eq!(ratio, f64::from(-0.7f32));
  }
}
