//! Error types for the temporalkit library.
//!
//! ## Key Components
//!
//! - [`HistoryError`]: Returned by fallible history and identifier-map
//!   operations (positional reads past the end, reads of an empty history,
//!   unusable slice steps, strict deletes of unknown identifiers).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use temporalkit::error::HistoryError;
//! use temporalkit::TemporalHistory;
//!
//! let mut history: TemporalHistory<u32> = TemporalHistory::bounded(4);
//! history.update(1);
//! history.update(2);
//!
//! assert_eq!(history.by_recency(1), Ok(&1));
//! assert_eq!(
//!     history.by_recency(5),
//!     Err(HistoryError::IndexOutOfRange { index: 5, len: 2 })
//! );
//! ```

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// HistoryError
// ---------------------------------------------------------------------------

/// Error returned by history and identifier-map operations.
///
/// All variants are local to the failing call: no operation that returns an
/// error has mutated the structure it was called on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A recency position does not exist in the current buffer.
    ///
    /// `index` is the normalized (non-negative) position that was requested.
    #[error("index {index} out of range for history of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The most recent snapshot was requested but nothing has been recorded.
    #[error("history is empty")]
    EmptyHistory,

    /// The index cannot address anything, regardless of buffer contents.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// A strict delete named an identifier that is not in the map.
    #[error("identifier not found: {0}")]
    KeyNotFound(String),
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal history invariants are violated.
///
/// Produced by `check_invariants` methods
/// (e.g. [`TemporalHistory::check_invariants`](crate::history::TemporalHistory::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- HistoryError -----------------------------------------------------

    #[test]
    fn out_of_range_display_names_index_and_len() {
        let err = HistoryError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "index 5 out of range for history of length 2");
    }

    #[test]
    fn empty_history_display() {
        assert_eq!(HistoryError::EmptyHistory.to_string(), "history is empty");
    }

    #[test]
    fn key_not_found_display_includes_identifier() {
        let err = HistoryError::KeyNotFound("snap-7".into());
        assert!(err.to_string().contains("snap-7"));
    }

    #[test]
    fn invalid_index_display_includes_reason() {
        let err = HistoryError::InvalidIndex("slice step cannot be zero".into());
        assert_eq!(err.to_string(), "invalid index: slice step cannot be zero");
    }

    #[test]
    fn history_error_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<HistoryError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("buffer length mismatch");
        assert_eq!(err.to_string(), "buffer length mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
