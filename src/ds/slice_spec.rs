//! Clamping start/stop/step slices over a sequence of known length.
//!
//! A [`SliceSpec`] describes a selection the way a half-open slice with an
//! optional stride does: bounds may be negative (counted from the end), may lie
//! outside the sequence, and are clamped rather than rejected. Only a zero step
//! is an error.
//!
//! ```
//! use temporalkit::ds::SliceSpec;
//!
//! // Last two of five
//! let positions: Vec<_> = SliceSpec::from(-2isize..).positions(5).unwrap().collect();
//! assert_eq!(positions, vec![3, 4]);
//!
//! // Reverse, every other element
//! let positions: Vec<_> = SliceSpec::full().step(-2).positions(5).unwrap().collect();
//! assert_eq!(positions, vec![4, 2, 0]);
//!
//! // Out-of-range bounds clamp
//! assert_eq!(SliceSpec::new(Some(1), Some(99), None).positions(3).unwrap().count(), 2);
//! ```

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::HistoryError;

/// Start/stop/step selection with clamping semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Selects everything, in order.
    pub fn full() -> Self {
        Self::default()
    }

    /// Returns a copy with the given stride.
    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolves the bounds against `len`, yielding `(start, stop, step)`.
    ///
    /// For a positive step the resolved bounds lie in `0..=len`; for a negative
    /// step they lie in `-1..=len - 1`, with `-1` meaning "before the first".
    pub fn indices(&self, len: usize) -> Result<(isize, isize, isize), HistoryError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(HistoryError::InvalidIndex("slice step cannot be zero".into()));
        }
        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match self.start {
            Some(bound) => clamp(bound),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match self.stop {
            Some(bound) => clamp(bound),
            None if step < 0 => lower,
            None => upper,
        };
        Ok((start, stop, step))
    }

    /// Returns the selected positions for a sequence of length `len`.
    pub fn positions(&self, len: usize) -> Result<Positions, HistoryError> {
        let (start, stop, step) = self.indices(len)?;
        Ok(Positions {
            next: start,
            stop,
            step,
        })
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

impl From<Range<isize>> for SliceSpec {
    fn from(range: Range<isize>) -> Self {
        Self::new(Some(range.start), Some(range.end), None)
    }
}

impl From<RangeFrom<isize>> for SliceSpec {
    fn from(range: RangeFrom<isize>) -> Self {
        Self::new(Some(range.start), None, None)
    }
}

impl From<RangeTo<isize>> for SliceSpec {
    fn from(range: RangeTo<isize>) -> Self {
        Self::new(None, Some(range.end), None)
    }
}

/// Positions selected by a resolved [`SliceSpec`].
///
/// Created by [`SliceSpec::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    next: isize,
    stop: isize,
    step: isize,
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let in_range = if self.step > 0 {
            self.next < self.stop
        } else {
            self.next > self.stop
        };
        if !in_range {
            return None;
        }
        let current = self.next;
        self.next = current.saturating_add(self.step);
        usize::try_from(current).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let span = if self.step > 0 {
            self.stop - self.next
        } else {
            self.next - self.stop
        };
        if span <= 0 {
            return (0, Some(0));
        }
        let stride = self.step.unsigned_abs();
        let n = (span.unsigned_abs() - 1) / stride + 1;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Positions {}
