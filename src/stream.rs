//! Replay-latest multicast stream of position samples
//!
//! Each tracked element owns exactly one [`PositionStream`] for its whole
//! tracked lifetime. The stream is a small explicit state machine (latest
//! retained sample, subscriber list, completed flag) with no reactive-
//! streams dependency:
//!
//! - [`push`](PositionStream::push) delivers to all current subscribers and
//!   retains the value for replay.
//! - [`subscribe`](PositionStream::subscribe) immediately replays the most
//!   recent retained sample, then delivers all future pushes.
//! - [`complete`](PositionStream::complete) signals terminal state to all
//!   current and future subscribers and releases retained state.
//!
//! Observer callbacks always run outside the stream's state borrow, so an
//! observer may unsubscribe, subscribe, or unregister elements reentrantly.

use crate::error::{Error, Result};
use crate::sample::PositionSample;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// One delivery to a stream observer
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
  /// A new position sample
  Next(PositionSample),
  /// The stream has terminated; no further deliveries will occur
  Complete,
}

type Observer = Rc<RefCell<dyn FnMut(StreamEvent)>>;

/// Invokes one observer outside the stream's state borrow.
///
/// Uses `try_borrow_mut` so that an observer which re-enters the stream
/// from its own callback (e.g. unregistering its element, which completes
/// this very stream) does not deadlock on itself; the reentrant delivery
/// is dropped, and the observer that caused it already knows the outcome.
fn deliver(observer: &Observer, event: StreamEvent) {
  if let Ok(mut callback) = observer.try_borrow_mut() {
    (callback)(event);
  }
}

struct Subscriber {
  id: u64,
  observer: Observer,
}

struct StreamState {
  latest: Option<PositionSample>,
  subscribers: Vec<Subscriber>,
  completed: bool,
  next_subscriber_id: u64,
}

/// Replay-latest, multi-subscriber stream of [`PositionSample`]s
///
/// Cloning is cheap and shares the underlying channel; the registry keeps
/// one clone, callers keep the other.
///
/// # Examples
///
/// ```
/// use scrolltrack::{PositionStream, StreamEvent};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let stream = PositionStream::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// let _sub = stream.subscribe(move |event| sink.borrow_mut().push(event));
///
/// stream.complete();
/// assert_eq!(seen.borrow().last(), Some(&StreamEvent::Complete));
/// ```
#[derive(Clone)]
pub struct PositionStream {
  state: Rc<RefCell<StreamState>>,
}

impl PositionStream {
  /// Creates an empty stream with no retained sample
  pub fn new() -> Self {
    Self {
      state: Rc::new(RefCell::new(StreamState {
        latest: None,
        subscribers: Vec::new(),
        completed: false,
        next_subscriber_id: 0,
      })),
    }
  }

  /// Delivers `sample` to all current subscribers and retains it for replay
  ///
  /// Fails with [`Error::UseAfterComplete`] if the stream has completed.
  pub fn push(&self, sample: PositionSample) -> Result<()> {
    let observers: Vec<Observer> = {
      let mut state = self.state.borrow_mut();
      if state.completed {
        return Err(Error::UseAfterComplete);
      }
      state.latest = Some(sample.clone());
      state
        .subscribers
        .iter()
        .map(|sub| Rc::clone(&sub.observer))
        .collect()
    };
    for observer in observers {
      deliver(&observer, StreamEvent::Next(sample.clone()));
    }
    Ok(())
  }

  /// Registers `observer` and returns its subscription guard
  ///
  /// If a sample has been retained it is replayed synchronously before this
  /// call returns. If the stream has already completed, the observer
  /// receives [`StreamEvent::Complete`] and nothing else.
  pub fn subscribe(&self, observer: impl FnMut(StreamEvent) + 'static) -> Subscription {
    let observer: Observer = Rc::new(RefCell::new(observer));
    let (replay, subscription) = {
      let mut state = self.state.borrow_mut();
      if state.completed {
        (Some(StreamEvent::Complete), Subscription::inert())
      } else {
        let id = state.next_subscriber_id;
        state.next_subscriber_id += 1;
        state.subscribers.push(Subscriber {
          id,
          observer: Rc::clone(&observer),
        });
        let replay = state.latest.clone().map(StreamEvent::Next);
        (
          replay,
          Subscription {
            state: Rc::downgrade(&self.state),
            id,
          },
        )
      }
    };
    if let Some(event) = replay {
      deliver(&observer, event);
    }
    subscription
  }

  /// Terminates the stream
  ///
  /// Every current subscriber receives [`StreamEvent::Complete`], the
  /// subscriber list and retained sample are released, and future
  /// subscribers observe completion immediately. Completing twice is a
  /// no-op.
  pub fn complete(&self) {
    let observers: Vec<Observer> = {
      let mut state = self.state.borrow_mut();
      if state.completed {
        return;
      }
      state.completed = true;
      state.latest = None;
      state
        .subscribers
        .drain(..)
        .map(|sub| sub.observer)
        .collect()
    };
    for observer in observers {
      deliver(&observer, StreamEvent::Complete);
    }
  }

  /// Returns true if the stream has terminated
  pub fn is_completed(&self) -> bool {
    self.state.borrow().completed
  }

  /// Returns a copy of the most recently retained sample, if any
  pub fn latest(&self) -> Option<PositionSample> {
    self.state.borrow().latest.clone()
  }

  /// Number of live subscribers
  pub fn subscriber_count(&self) -> usize {
    self.state.borrow().subscribers.len()
  }
}

impl Default for PositionStream {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for PositionStream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.borrow();
    f.debug_struct("PositionStream")
      .field("completed", &state.completed)
      .field("subscribers", &state.subscribers.len())
      .field("has_latest", &state.latest.is_some())
      .finish()
  }
}

/// Guard for one stream subscription
///
/// Unsubscribes on [`dispose`](Self::dispose) or on drop. Disposal after
/// the stream completed (or was dropped) is a no-op.
#[derive(Debug)]
pub struct Subscription {
  state: Weak<RefCell<StreamState>>,
  id: u64,
}

impl Subscription {
  fn inert() -> Self {
    Self {
      state: Weak::new(),
      id: u64::MAX,
    }
  }

  /// Unsubscribes now
  pub fn dispose(self) {
    // Drop does the work.
  }

  fn unsubscribe(&self) {
    if let Some(state) = self.state.upgrade() {
      let mut state = state.borrow_mut();
      state.subscribers.retain(|sub| sub.id != self.id);
    }
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.unsubscribe();
  }
}
