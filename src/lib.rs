//! # scrolltrack
//!
//! A scroll-position tracking engine for DOM-like trees: it finds the
//! scroll container of each registered element, keeps exactly one
//! scroll/resize listener pair per live container no matter how many
//! elements share it, and publishes normalized position samples through
//! replay-latest multicast streams. Intended to back UI behaviors such as
//! lazy loading, scroll-spy navigation, or reveal-on-scroll animations.
//!
//! The engine never talks to a real layout engine directly; the host
//! supplies one through the [`Dom`] trait (bounding rectangles, computed
//! styles, parent traversal, and native listener attachment). [`MemoryDom`]
//! is a complete in-memory implementation for tests and headless hosts.
//!
//! # Quick start
//!
//! ```
//! use scrolltrack::{ComputedStyle, MemoryDom, Rect, ScrollTracker, StreamEvent};
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
//! // Every registration yields a baseline sample before any real scroll.
//! let baseline = stream.latest().unwrap();
//! assert_eq!(baseline.data.element_top.from_container_top.ratio, 0.2);
//!
//! tracker.unregister(item);
//! # Ok(())
//! # }
//! ```
//!
//! # Guarantees
//!
//! - **Immediate baseline**: every successful [`ScrollTracker::register`]
//!   pushes one synthetic [`EventKind::Initial`] sample synchronously.
//! - **Listener deduplication**: K elements resolving to the same
//!   container share one scroll + one resize listener.
//! - **Prompt teardown**: unregistering a container's last element
//!   detaches its listeners synchronously; no idle containers persist.
//! - **Atomic registration**: a resolution failure leaves no state behind.

pub mod dom;
pub mod error;
pub mod geometry;
pub mod registry;
pub mod resolver;
pub mod sample;
pub mod stream;
pub mod style;
pub mod tracker;

pub use dom::{Dom, EventKind, ListenerGuard, ListenerTarget, MemoryDom, NodeId, TickHandler};
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use resolver::resolve_container;
pub use sample::{EdgeOffsets, OffsetPair, PositionData, PositionSample};
pub use stream::{PositionStream, StreamEvent, Subscription};
pub use style::{ComputedStyle, Overflow, Position};
pub use tracker::ScrollTracker;
