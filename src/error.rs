//! Error types for scrolltrack
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations. The taxonomy is deliberately small:
//!
//! - Resolution errors ([`Error::NoScrollableAncestor`],
//!   [`Error::FixedPosition`]) surface synchronously to the `register` caller
//!   and abort registration with no side effects.
//! - [`Error::UseAfterComplete`] and [`Error::InvariantViolation`] are
//!   internal programming errors, not runtime conditions a caller is expected
//!   to recover from.

use crate::dom::NodeId;
use thiserror::Error;

/// Result type alias for scrolltrack operations
///
/// # Examples
///
/// ```
/// use scrolltrack::Result;
///
/// fn track_something() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for scrolltrack
///
/// # Examples
///
/// ```
/// use scrolltrack::{Error, NodeId};
///
/// let err = Error::NoScrollableAncestor(NodeId::from_raw(7));
/// assert!(err.to_string().contains("no scrollable ancestor"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// No ancestor of the element satisfies the scrollability predicate.
  ///
  /// The element lives outside any scrollable region (and outside the
  /// document body), so there is no container to track it against.
  #[error("no scrollable ancestor found for element {0:?}")]
  NoScrollableAncestor(NodeId),

  /// The element itself is styled `position: fixed`.
  ///
  /// Fixed elements never move relative to a scroll container, so tracking
  /// them is meaningless and registration is rejected outright.
  #[error("element {0:?} is positioned 'fixed' and cannot be tracked")]
  FixedPosition(NodeId),

  /// A sample was pushed into a stream that has already completed.
  ///
  /// Registry code completes a stream only as it removes it, so hitting this
  /// indicates a lifecycle bug, not a user-recoverable condition.
  #[error("position sample pushed into a completed stream")]
  UseAfterComplete,

  /// An internal ordering invariant was broken.
  ///
  /// For example, a child was added to a container that never had listeners
  /// attached. Indicates an orchestration bug.
  #[error("invariant violation: {0}")]
  InvariantViolation(String),
}
