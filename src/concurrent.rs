//! Lock-wrapped history for shared access across threads.
//!
//! [`ConcurrentTemporalHistory`] guards one [`TemporalHistory`] with a
//! `parking_lot::RwLock`, taking the lock once per operation. Reads hand back
//! `Arc<S>` clones so nothing borrowed outlives the lock.
//!
//! Enabled with the `concurrency` feature.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use temporalkit::concurrent::ConcurrentTemporalHistory;
//!
//! let history = Arc::new(ConcurrentTemporalHistory::bounded(64));
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let history = Arc::clone(&history);
//!         thread::spawn(move || {
//!             for i in 0..10 {
//!                 history.update(t * 100 + i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(history.len(), 40);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::ds::slice_spec::SliceSpec;
use crate::error::HistoryError;
use crate::history::TemporalHistory;
use crate::id::{IdGenerator, UuidGenerator};

/// Thread-safe wrapper around [`TemporalHistory`].
#[derive(Debug)]
pub struct ConcurrentTemporalHistory<S, G = UuidGenerator> {
    inner: RwLock<TemporalHistory<S, G>>,
}

impl<S> ConcurrentTemporalHistory<S, UuidGenerator> {
    pub fn new(capacity: Option<usize>) -> Self {
        Self::from_history(TemporalHistory::new(capacity))
    }

    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }
}

impl<S, G> ConcurrentTemporalHistory<S, G> {
    /// Wraps an existing history.
    pub fn from_history(history: TemporalHistory<S, G>) -> Self {
        Self {
            inner: RwLock::new(history),
        }
    }

    /// Unwraps the history.
    pub fn into_inner(self) -> TemporalHistory<S, G> {
        self.inner.into_inner()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.read().capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    pub fn by_recency(&self, index: isize) -> Result<Arc<S>, HistoryError> {
        self.inner.read().recency_shared(index).map(Arc::clone)
    }

    pub fn by_identifier(&self, id: &str) -> Option<Arc<S>> {
        self.inner.read().identifier_shared(id).map(Arc::clone)
    }

    pub fn by_slice(&self, spec: impl Into<SliceSpec>) -> Result<Vec<Arc<S>>, HistoryError> {
        let guard = self.inner.read();
        let selected = guard.slice_shared(spec.into())?;
        Ok(selected.into_iter().map(Arc::clone).collect())
    }

    pub fn current(&self) -> Result<Arc<S>, HistoryError> {
        self.by_recency(0).map_err(|_| HistoryError::EmptyHistory)
    }

    /// See [`TemporalHistory::recent`].
    pub fn recent(&self, n: isize) -> Vec<Arc<S>> {
        self.inner
            .read()
            .recent_shared(n)
            .into_iter()
            .map(Arc::clone)
            .collect()
    }

    /// Returns every buffered snapshot, oldest to newest.
    pub fn to_vec(&self) -> Vec<Arc<S>> {
        self.inner.read().iter_shared().map(Arc::clone).collect()
    }

    /// See [`TemporalHistory::set`]; touches the identifier map only.
    pub fn set(&self, id: impl Into<String>, snapshot: S) -> Option<Arc<S>> {
        self.inner.write().set(id, snapshot)
    }

    /// See [`TemporalHistory::delete`]; touches the identifier map only.
    pub fn delete(&self, id: &str) -> Result<Arc<S>, HistoryError> {
        self.inner.write().delete(id)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Runs `f` with shared access to the history.
    pub fn with_read<R>(&self, f: impl FnOnce(&TemporalHistory<S, G>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the history.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut TemporalHistory<S, G>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<S, G> ConcurrentTemporalHistory<S, G>
where
    G: IdGenerator,
{
    pub fn with_generator(capacity: Option<usize>, id_generator: G) -> Self {
        Self::from_history(TemporalHistory::with_generator(capacity, id_generator))
    }

    pub fn update(&self, snapshot: S) -> String {
        self.inner.write().update(snapshot)
    }

    pub fn update_with_id(&self, snapshot: S, id: impl Into<String>) -> String {
        self.inner.write().update_with_id(snapshot, id)
    }
}

impl<S, G> From<TemporalHistory<S, G>> for ConcurrentTemporalHistory<S, G> {
    fn from(history: TemporalHistory<S, G>) -> Self {
        Self::from_history(history)
    }
}
