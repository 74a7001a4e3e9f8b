//! Builder for [`TemporalHistory`] configuration.
//!
//! Collects the capacity and identifier source in one place, then builds a
//! plain or (with the `concurrency` feature) lock-wrapped history.
//!
//! ## Example
//!
//! ```rust
//! use temporalkit::builder::HistoryBuilder;
//! use temporalkit::id::SequentialIds;
//!
//! let mut history = HistoryBuilder::new()
//!     .capacity(16)
//!     .id_generator(SequentialIds::with_prefix("tick-"))
//!     .build::<u64>();
//!
//! assert_eq!(history.update(1), "tick-0");
//! assert_eq!(history.capacity(), Some(16));
//! ```

#[cfg(feature = "concurrency")]
use crate::concurrent::ConcurrentTemporalHistory;
use crate::history::TemporalHistory;
use crate::id::{IdGenerator, UuidGenerator};

/// Configuration for a [`TemporalHistory`].
///
/// Defaults to an unbounded history with random UUID identifiers.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuilder<G = UuidGenerator> {
    capacity: Option<usize>,
    id_generator: G,
}

impl HistoryBuilder<UuidGenerator> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G> HistoryBuilder<G> {
    /// Retain at most `capacity` snapshots. `0` retains nothing.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Never evict.
    pub fn unbounded(mut self) -> Self {
        self.capacity = None;
        self
    }

    /// Sets the capacity from an optional value (`None` = unbounded).
    pub fn max_len(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the identifier source used by `update`.
    pub fn id_generator<H: IdGenerator>(self, id_generator: H) -> HistoryBuilder<H> {
        HistoryBuilder {
            capacity: self.capacity,
            id_generator,
        }
    }

    /// Returns the configured capacity.
    pub fn configured_capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<G: IdGenerator> HistoryBuilder<G> {
    /// Builds a single-owner history.
    pub fn build<S>(self) -> TemporalHistory<S, G> {
        TemporalHistory::with_generator(self.capacity, self.id_generator)
    }

    /// Builds a lock-wrapped history.
    #[cfg(feature = "concurrency")]
    pub fn build_concurrent<S>(self) -> ConcurrentTemporalHistory<S, G> {
        ConcurrentTemporalHistory::with_generator(self.capacity, self.id_generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;

    #[test]
    fn defaults_to_unbounded() {
        let builder = HistoryBuilder::new();
        assert_eq!(builder.configured_capacity(), None);
        let history = builder.build::<i32>();
        assert_eq!(history.capacity(), None);
    }

    #[test]
    fn later_settings_win() {
        let history = HistoryBuilder::new().capacity(3).unbounded().build::<i32>();
        assert_eq!(history.capacity(), None);

        let history = HistoryBuilder::new()
            .unbounded()
            .max_len(Some(5))
            .build::<i32>();
        assert_eq!(history.capacity(), Some(5));
    }

    #[test]
    fn injected_generator_is_used() {
        let mut history = HistoryBuilder::new()
            .capacity(2)
            .id_generator(SequentialIds::with_prefix("p"))
            .build();
        assert_eq!(history.update('x'), "p0");
        assert_eq!(history.update('y'), "p1");
        assert_eq!(history.by_identifier("p0"), Some(&'x'));
    }

    #[test]
    fn closure_generator() {
        let mut n = 0u32;
        let mut history = HistoryBuilder::new()
            .id_generator(move || {
                n += 1;
                format!("n{n}")
            })
            .build();
        assert_eq!(history.update(()), "n1");
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn builds_concurrent_history() {
        let history = HistoryBuilder::new().capacity(1).build_concurrent();
        history.update(1);
        history.update(2);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current().unwrap(), 2);
    }
}
