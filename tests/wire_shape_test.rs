//! Wire-shape and offset-arithmetic tests through the public API.

use scrolltrack::{ComputedStyle, MemoryDom, Rect, ScrollTracker};
use std::rc::Rc;

#[test]
fn reference_offsets_through_the_engine() {
  // Container height 500 at top 0; element top 100, height 50.
  let dom = MemoryDom::new(600.0);
  let pane = dom.append(
    dom.body(),
    ComputedStyle::scroller(),
    Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
  );
  let item = dom.append(pane, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
  let tracker = ScrollTracker::new(Rc::new(dom.clone()));

  let data = tracker.register(item).unwrap().latest().unwrap().data;
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
fn samples_serialize_with_stable_field_names() {
  let dom = MemoryDom::new(600.0);
  let pane = dom.append(
    dom.body(),
    ComputedStyle::scroller(),
    Rect::from_xywh(0.0, 0.0, 400.0, 500.0),
  );
  let item = dom.append(pane, ComputedStyle::default(), Rect::from_xywh(0.0, 100.0, 400.0, 50.0));
  let tracker = ScrollTracker::new(Rc::new(dom.clone()));

  let sample = tracker.register(item).unwrap().latest().unwrap();
  let json = serde_json::to_value(sample).unwrap();

  assert_eq!(json["event"], "initial");
  assert_eq!(json["elementHandle"], item.as_raw());
  for element_edge in ["elementTop", "elementBottom"] {
    for container_edge in ["fromContainerTop", "fromContainerBottom"] {
      let pair = &json["data"][element_edge][container_edge];
      assert!(pair["pixels"].is_number(), "{element_edge}.{container_edge}.pixels");
      assert!(pair["ratio"].is_number(), "{element_edge}.{container_edge}.ratio");
    }
  }
  assert_eq!(json["data"]["elementTop"]["fromContainerTop"]["pixels"], 100.0);
}
