//! Bounded snapshot history with recency, slice, and identifier addressing.
//!
//! [`TemporalHistory`] records snapshots of an evolving object in insertion
//! order. It keeps a capacity-bounded sequential buffer and a parallel
//! [`BoundedIdMap`] from identifier to snapshot; both evict oldest-first under
//! the same bound, so while callers only go through [`update`], every
//! identifier the map still knows names a snapshot the buffer still holds.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                 TemporalHistory<S> Layout (capacity = 3)                    │
//! │                                                                             │
//! │   buffer: VecDeque<Entry<S>>                 ids: BoundedIdMap<Arc<S>>      │
//! │                                                                             │
//! │    front (oldest)            back (newest)    ┌────────┬─────────┐          │
//! │   ┌──────────┬──────────┬──────────┐          │ "id-b" │ Arc(B)  │          │
//! │   │ id-b, B  │ id-c, C  │ id-d, D  │          │ "id-c" │ Arc(C)  │          │
//! │   └──────────┴──────────┴──────────┘          │ "id-d" │ Arc(D)  │          │
//! │        ▲          ▲          ▲                └────────┴─────────┘          │
//! │   recency 2   recency 1   recency 0      (same Arc<S> in both structures)   │
//! │                                                                             │
//! │   update(E):                                                                │
//! │     1. id = generator.next_id()   (or the caller's id)                      │
//! │     2. ids.set(id, Arc(E))        → map evicts "id-b" (oldest)              │
//! │     3. buffer.push_back(E)        → buffer evicts B (front)                 │
//! │                                                                             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Addressing
//!
//! | Operation            | Addressing                         | On miss            |
//! |----------------------|------------------------------------|--------------------|
//! | [`by_recency`]       | 0 = newest; `-i` is treated as `i` | `IndexOutOfRange`  |
//! | [`by_identifier`]    | identifier map                     | `None`             |
//! | [`by_slice`]         | clamping slice, oldest-first       | clamped, no error  |
//! | [`current`]          | newest                             | `EmptyHistory`     |
//! | [`recent`]           | slice from `-n` to the end         | clamped, no error  |
//! | [`lookup`]           | any of the above via [`HistoryIndex`] | per mode        |
//!
//! [`update`]: TemporalHistory::update
//! [`by_recency`]: TemporalHistory::by_recency
//! [`by_identifier`]: TemporalHistory::by_identifier
//! [`by_slice`]: TemporalHistory::by_slice
//! [`current`]: TemporalHistory::current
//! [`recent`]: TemporalHistory::recent
//! [`lookup`]: TemporalHistory::lookup
//!
//! ## Direct identifier mutation
//!
//! [`set`](TemporalHistory::set) and [`delete`](TemporalHistory::delete) touch
//! the identifier map only. They can leave the two structures disagreeing
//! (an identifier for a snapshot the buffer never held, or a buffered snapshot
//! that no identifier reaches). Reusing an identifier in `update` has the same
//! effect. Keeping them in step is up to the caller.
//!
//! ## Capacity
//!
//! `None` is unbounded. `Some(0)` retains nothing in either structure.
//!
//! ## Example Usage
//!
//! ```
//! use std::collections::HashMap;
//!
//! use temporalkit::TemporalHistory;
//!
//! let mut history = TemporalHistory::bounded(2);
//! let a = history.update(HashMap::from([("x".to_string(), 1)]));
//! let b = history.update(HashMap::from([("x".to_string(), 2)]));
//! let c = history.update(HashMap::from([("x".to_string(), 3)]));
//!
//! assert_eq!(history.len(), 2);
//! assert!(!history.contains(&a));
//! assert!(history.contains(&b) && history.contains(&c));
//!
//! assert_eq!(history.get("x", 0), Ok(Some(&3)));
//! assert_eq!(history.get("x", -1), Ok(Some(&2)));
//! assert_eq!(history.get("y", 0), Ok(None));
//! assert!(history.get("x", 2).is_err());
//! ```
//!
//! ## Thread Safety
//!
//! `TemporalHistory` is single-owner and not internally synchronized. With
//! the `concurrency` feature,
//! [`ConcurrentTemporalHistory`](crate::concurrent::ConcurrentTemporalHistory)
//! wraps it in a lock.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::collections::vec_deque;
use std::iter::FusedIterator;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::sync::Arc;

use tracing::trace;

use crate::ds::bounded_id_map::BoundedIdMap;
use crate::ds::slice_spec::SliceSpec;
use crate::error::{HistoryError, InvariantError};
use crate::id::{IdGenerator, UuidGenerator};
#[cfg(feature = "metrics")]
use crate::metrics::{
    HistoryMetrics, HistoryMetricsSnapshot, MetricsReset, MetricsSnapshotProvider,
    traits::{HistoryMetricsReadRecorder, HistoryMetricsRecorder},
};
use crate::snapshot::FieldAccess;

#[derive(Debug, Clone)]
struct Entry<S> {
    id: String,
    snapshot: Arc<S>,
}

/// How to address snapshots in a single [`TemporalHistory::lookup`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryIndex<'a> {
    /// Recency position; negative values are treated as their absolute value.
    Recency(isize),
    /// Identifier map lookup.
    Identifier(&'a str),
    /// Clamping slice over the oldest-first buffer.
    Slice(SliceSpec),
}

impl From<isize> for HistoryIndex<'_> {
    fn from(index: isize) -> Self {
        Self::Recency(index)
    }
}

impl<'a> From<&'a str> for HistoryIndex<'a> {
    fn from(id: &'a str) -> Self {
        Self::Identifier(id)
    }
}

impl From<SliceSpec> for HistoryIndex<'_> {
    fn from(spec: SliceSpec) -> Self {
        Self::Slice(spec)
    }
}

impl From<RangeFull> for HistoryIndex<'_> {
    fn from(range: RangeFull) -> Self {
        Self::Slice(range.into())
    }
}

impl From<Range<isize>> for HistoryIndex<'_> {
    fn from(range: Range<isize>) -> Self {
        Self::Slice(range.into())
    }
}

impl From<RangeFrom<isize>> for HistoryIndex<'_> {
    fn from(range: RangeFrom<isize>) -> Self {
        Self::Slice(range.into())
    }
}

impl From<RangeTo<isize>> for HistoryIndex<'_> {
    fn from(range: RangeTo<isize>) -> Self {
        Self::Slice(range.into())
    }
}

/// Result of a [`TemporalHistory::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a, S> {
    /// A single snapshot (recency or identifier hit).
    One(&'a S),
    /// Identifier lookup found nothing.
    Missing,
    /// Slice result, oldest-first.
    Many(Vec<&'a S>),
}

impl<'a, S> Selection<'a, S> {
    /// Returns the single snapshot, if this is a `One`.
    pub fn one(self) -> Option<&'a S> {
        match self {
            Selection::One(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Flattens into a vector: `One` → one element, `Missing` → empty.
    pub fn into_vec(self) -> Vec<&'a S> {
        match self {
            Selection::One(snapshot) => vec![snapshot],
            Selection::Missing => Vec::new(),
            Selection::Many(snapshots) => snapshots,
        }
    }
}

/// Capacity-bounded history of snapshots, addressable by recency, slice, or
/// identifier.
///
/// # Type Parameters
///
/// - `S`: snapshot type; opaque except through [`FieldAccess`] for [`get`](Self::get)
/// - `G`: identifier source for [`update`](Self::update), [`UuidGenerator`] by default
///
/// # Example
///
/// ```
/// use temporalkit::TemporalHistory;
/// use temporalkit::id::SequentialIds;
///
/// let mut history = TemporalHistory::with_generator(Some(3), SequentialIds::new());
/// for frame in ["a", "b", "c", "d"] {
///     history.update(frame);
/// }
///
/// assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec!["b", "c", "d"]);
/// assert_eq!(history.by_identifier("0"), None); // evicted with "a"
/// assert_eq!(history.by_identifier("3"), Some(&"d"));
/// assert_eq!(history.current(), Ok(&"d"));
/// ```
#[derive(Debug, Clone)]
pub struct TemporalHistory<S, G = UuidGenerator> {
    buffer: VecDeque<Entry<S>>,
    ids: BoundedIdMap<Arc<S>>,
    capacity: Option<usize>,
    id_generator: G,
    #[cfg(feature = "metrics")]
    metrics: HistoryMetrics,
}

impl<S> TemporalHistory<S, UuidGenerator> {
    /// Creates a history retaining at most `capacity` snapshots
    /// (`None` = unbounded) with random UUID identifiers.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    ///
    /// let history: TemporalHistory<i32> = TemporalHistory::new(Some(10));
    /// assert_eq!(history.capacity(), Some(10));
    /// assert!(history.is_empty());
    /// ```
    pub fn new(capacity: Option<usize>) -> Self {
        Self::with_generator(capacity, UuidGenerator)
    }

    /// Creates a history retaining at most `capacity` snapshots.
    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    /// Creates a history that never evicts.
    pub fn unbounded() -> Self {
        Self::new(None)
    }
}

impl<S> Default for TemporalHistory<S, UuidGenerator> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<S, G> TemporalHistory<S, G>
where
    G: IdGenerator,
{
    /// Creates a history using `id_generator` for snapshots recorded without
    /// an explicit identifier.
    pub fn with_generator(capacity: Option<usize>, id_generator: G) -> Self {
        let prealloc = capacity.unwrap_or(0);
        Self {
            buffer: VecDeque::with_capacity(prealloc),
            ids: BoundedIdMap::new(capacity),
            capacity,
            id_generator,
            #[cfg(feature = "metrics")]
            metrics: HistoryMetrics::default(),
        }
    }

    /// Records `snapshot` under a freshly generated identifier and returns it.
    ///
    /// At capacity, the oldest snapshot is evicted from both the buffer and the
    /// identifier map.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    ///
    /// let mut history = TemporalHistory::bounded(4);
    /// let id = history.update(42);
    /// assert_eq!(history.by_identifier(&id), Some(&42));
    /// ```
    pub fn update(&mut self, snapshot: S) -> String {
        let id = self.id_generator.next_id();
        #[cfg(feature = "metrics")]
        self.metrics.record_generated_id();
        self.record(id, Arc::new(snapshot))
    }

    /// Records `snapshot` under the caller's identifier and returns it.
    ///
    /// Reusing an identifier still in the map overwrites the map entry (keeping
    /// its eviction position) while the buffer gains a second snapshot.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    ///
    /// let mut history = TemporalHistory::unbounded();
    /// history.update_with_id("start", "boot");
    /// assert_eq!(history.by_identifier("boot"), Some(&"start"));
    /// ```
    pub fn update_with_id(&mut self, snapshot: S, id: impl Into<String>) -> String {
        self.record(id.into(), Arc::new(snapshot))
    }

    /// Records an already-shared snapshot, generating an identifier if `id` is `None`.
    pub fn update_shared(&mut self, snapshot: Arc<S>, id: Option<String>) -> String {
        let id = match id {
            Some(id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_generated_id();
                self.id_generator.next_id()
            },
        };
        self.record(id, snapshot)
    }

    fn record(&mut self, id: String, snapshot: Arc<S>) -> String {
        #[cfg(feature = "metrics")]
        self.metrics.record_update();

        if self.ids.contains(&id) {
            trace!(identifier = %id, "update reused a live identifier");
            #[cfg(feature = "metrics")]
            self.metrics.record_reused_id();
        }

        #[cfg(feature = "metrics")]
        let evicted_before = self.ids.eviction_count();
        self.ids.set(id.clone(), Arc::clone(&snapshot));
        #[cfg(feature = "metrics")]
        self.metrics
            .record_id_evictions(self.ids.eviction_count() - evicted_before);

        self.push_entry(Entry {
            id: id.clone(),
            snapshot,
        });
        id
    }

    fn push_entry(&mut self, entry: Entry<S>) {
        if let Some(cap) = self.capacity {
            if cap == 0 {
                trace!(identifier = %entry.id, "zero-capacity history dropped snapshot");
                return;
            }
            while self.buffer.len() >= cap {
                let Some(evicted) = self.buffer.pop_front() else {
                    break;
                };
                trace!(identifier = %evicted.id, "evicted oldest snapshot");
                #[cfg(feature = "metrics")]
                self.metrics.record_buffer_eviction();
            }
        }
        self.buffer.push_back(entry);
    }
}

impl<S, G> TemporalHistory<S, G> {
    /// Returns the configured capacity (`None` = unbounded).
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns the number of snapshots in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the buffer holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns `true` if `id` is retrievable through the identifier map.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns the snapshot at recency position `index` (0 = newest).
    ///
    /// Negative indices are normalized to their absolute value, so `-1` reads
    /// the same snapshot as `1`; they do not count from the oldest end.
    ///
    /// # Errors
    ///
    /// [`HistoryError::IndexOutOfRange`] when the normalized index is not
    /// below [`len`](Self::len).
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    /// use temporalkit::error::HistoryError;
    ///
    /// let mut history = TemporalHistory::unbounded();
    /// history.update('a');
    /// history.update('b');
    /// history.update('c');
    ///
    /// assert_eq!(history.by_recency(0), Ok(&'c'));
    /// assert_eq!(history.by_recency(1), Ok(&'b'));
    /// assert_eq!(history.by_recency(-1), Ok(&'b'));
    /// assert_eq!(
    ///     history.by_recency(3),
    ///     Err(HistoryError::IndexOutOfRange { index: 3, len: 3 })
    /// );
    /// ```
    pub fn by_recency(&self, index: isize) -> Result<&S, HistoryError> {
        self.recency_shared(index).map(Arc::as_ref)
    }

    pub(crate) fn recency_shared(&self, index: isize) -> Result<&Arc<S>, HistoryError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_call();

        let len = self.buffer.len();
        let position = index.unsigned_abs();
        if position >= len {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_out_of_range();
            return Err(HistoryError::IndexOutOfRange {
                index: position,
                len,
            });
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_recency_hit();
        Ok(&self.buffer[len - 1 - position].snapshot)
    }

    /// Returns the snapshot registered under `id`, or `None`.
    pub fn by_identifier(&self, id: &str) -> Option<&S> {
        self.identifier_shared(id).map(Arc::as_ref)
    }

    pub(crate) fn identifier_shared(&self, id: &str) -> Option<&Arc<S>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_identifier_call();

        let found = self.ids.get(id);

        #[cfg(feature = "metrics")]
        if found.is_some() {
            self.metrics.record_identifier_hit();
        }
        found
    }

    /// Returns the snapshots selected by `spec` over the oldest-first buffer.
    ///
    /// Bounds are clamped; only a zero step fails.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    /// use temporalkit::ds::SliceSpec;
    ///
    /// let mut history = TemporalHistory::unbounded();
    /// for n in 1..=5 {
    ///     history.update(n);
    /// }
    ///
    /// assert_eq!(history.by_slice(1isize..3).unwrap(), vec![&2, &3]);
    /// assert_eq!(history.by_slice(-2isize..).unwrap(), vec![&4, &5]);
    /// assert_eq!(history.by_slice(SliceSpec::full().step(-2)).unwrap(), vec![&5, &3, &1]);
    /// assert!(history.by_slice(SliceSpec::full().step(0)).is_err());
    /// ```
    pub fn by_slice(&self, spec: impl Into<SliceSpec>) -> Result<Vec<&S>, HistoryError> {
        Ok(self
            .slice_shared(spec.into())?
            .into_iter()
            .map(Arc::as_ref)
            .collect())
    }

    pub(crate) fn slice_shared(&self, spec: SliceSpec) -> Result<Vec<&Arc<S>>, HistoryError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_slice_call();

        let positions = spec.positions(self.buffer.len())?;
        Ok(positions
            .filter_map(|pos| self.buffer.get(pos))
            .map(|entry| &entry.snapshot)
            .collect())
    }

    /// Resolves any [`HistoryIndex`] in one call.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    /// use temporalkit::history::Selection;
    ///
    /// let mut history = TemporalHistory::unbounded();
    /// history.update_with_id(10, "ten");
    /// history.update_with_id(20, "twenty");
    ///
    /// assert_eq!(history.lookup(0isize.into()), Ok(Selection::One(&20)));
    /// assert_eq!(history.lookup("ten".into()), Ok(Selection::One(&10)));
    /// assert_eq!(history.lookup("nine".into()), Ok(Selection::Missing));
    /// assert_eq!(history.lookup((..).into()), Ok(Selection::Many(vec![&10, &20])));
    /// ```
    pub fn lookup(&self, index: HistoryIndex<'_>) -> Result<Selection<'_, S>, HistoryError> {
        match index {
            HistoryIndex::Recency(i) => self.by_recency(i).map(Selection::One),
            HistoryIndex::Identifier(id) => Ok(self
                .by_identifier(id)
                .map_or(Selection::Missing, Selection::One)),
            HistoryIndex::Slice(spec) => self.by_slice(spec).map(Selection::Many),
        }
    }

    /// Returns the newest snapshot.
    ///
    /// # Errors
    ///
    /// [`HistoryError::EmptyHistory`] when nothing is buffered.
    pub fn current(&self) -> Result<&S, HistoryError> {
        self.buffer
            .back()
            .map(|entry| entry.snapshot.as_ref())
            .ok_or(HistoryError::EmptyHistory)
    }

    /// Returns the buffer from relative position `-n` to the end, oldest-first.
    ///
    /// For `n > 0` that is the `n` newest snapshots; asking for more than
    /// [`len`](Self::len) returns everything. `n == 0` starts the slice at the
    /// oldest entry and so also returns everything. A negative `n` drops the
    /// `|n|` oldest entries instead.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::TemporalHistory;
    ///
    /// let mut history = TemporalHistory::unbounded();
    /// history.extend(["a", "b", "c"]);
    ///
    /// assert_eq!(history.recent(1), vec![&"c"]);
    /// assert_eq!(history.recent(10), vec![&"a", &"b", &"c"]);
    /// assert_eq!(history.recent(0), vec![&"a", &"b", &"c"]);
    /// assert_eq!(history.recent(-1), vec![&"b", &"c"]);
    /// ```
    pub fn recent(&self, n: isize) -> Vec<&S> {
        self.buffer
            .iter()
            .skip(self.tail_start(n))
            .map(|entry| entry.snapshot.as_ref())
            .collect()
    }

    #[cfg(feature = "concurrency")]
    pub(crate) fn recent_shared(&self, n: isize) -> Vec<&Arc<S>> {
        self.buffer
            .iter()
            .skip(self.tail_start(n))
            .map(|entry| &entry.snapshot)
            .collect()
    }

    /// Clamped buffer position of the slice start `-n`.
    fn tail_start(&self, n: isize) -> usize {
        let len = self.buffer.len();
        match n.cmp(&0) {
            Ordering::Greater => len.saturating_sub(n.unsigned_abs()),
            Ordering::Equal => 0,
            Ordering::Less => n.unsigned_abs().min(len),
        }
    }

    /// Returns `field` of the snapshot at recency position `relative_index`.
    ///
    /// A missing field is `Ok(None)`; a missing position is an error.
    ///
    /// # Errors
    ///
    /// [`HistoryError::IndexOutOfRange`], as for [`by_recency`](Self::by_recency).
    pub fn get(
        &self,
        field: &str,
        relative_index: isize,
    ) -> Result<Option<&S::Value>, HistoryError>
    where
        S: FieldAccess,
    {
        Ok(self.by_recency(relative_index)?.field(field))
    }

    /// Like [`get`](Self::get), substituting `default` for a missing field.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use temporalkit::TemporalHistory;
    ///
    /// let mut history = TemporalHistory::bounded(8);
    /// history.update(BTreeMap::from([("hp".to_string(), 30)]));
    ///
    /// assert_eq!(history.get_or("hp", 0, &0), Ok(&30));
    /// assert_eq!(history.get_or("mp", 0, &0), Ok(&0));
    /// assert!(history.get_or("hp", 1, &0).is_err());
    /// ```
    pub fn get_or<'a>(
        &'a self,
        field: &str,
        relative_index: isize,
        default: &'a S::Value,
    ) -> Result<&'a S::Value, HistoryError>
    where
        S: FieldAccess,
    {
        Ok(self.get(field, relative_index)?.unwrap_or(default))
    }

    /// Stores `snapshot` under `id` in the identifier map only.
    ///
    /// The buffer is untouched: the snapshot is reachable by identifier but not
    /// by recency, and the map may evict an entry whose snapshot the buffer
    /// still holds. Returns the previous snapshot under `id`.
    pub fn set(&mut self, id: impl Into<String>, snapshot: S) -> Option<Arc<S>> {
        let id = id.into();
        trace!(identifier = %id, "direct identifier set bypasses buffer");
        #[cfg(feature = "metrics")]
        self.metrics.record_direct_set();

        #[cfg(feature = "metrics")]
        let evicted_before = self.ids.eviction_count();
        let previous = self.ids.set(id, Arc::new(snapshot));
        #[cfg(feature = "metrics")]
        self.metrics
            .record_id_evictions(self.ids.eviction_count() - evicted_before);
        previous
    }

    /// Removes `id` from the identifier map only.
    ///
    /// The buffered snapshot, if any, stays reachable by recency and slice.
    ///
    /// # Errors
    ///
    /// [`HistoryError::KeyNotFound`] when `id` is not in the map.
    pub fn delete(&mut self, id: &str) -> Result<Arc<S>, HistoryError> {
        let removed = self.ids.delete(id);
        #[cfg(feature = "metrics")]
        self.metrics.record_direct_delete(removed.is_ok());
        if removed.is_ok() {
            trace!(identifier = %id, "direct identifier delete bypasses buffer");
        }
        removed
    }

    /// Removes every snapshot from both structures.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.ids.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Returns an iterator over buffered snapshots, oldest to newest.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            inner: self.buffer.iter(),
        }
    }

    /// Returns `(identifier, snapshot)` pairs, oldest to newest.
    ///
    /// Identifiers are the ones assigned at `update` time; they may no longer
    /// resolve through [`by_identifier`](Self::by_identifier) after direct
    /// deletes or identifier reuse.
    pub fn iter_with_ids(&self) -> impl DoubleEndedIterator<Item = (&str, &S)> + '_ {
        self.buffer
            .iter()
            .map(|entry| (entry.id.as_str(), entry.snapshot.as_ref()))
    }

    #[cfg(feature = "concurrency")]
    pub(crate) fn iter_shared(&self) -> impl Iterator<Item = &Arc<S>> + '_ {
        self.buffer.iter().map(|entry| &entry.snapshot)
    }

    /// Validates the capacity bound on both structures and the map's own
    /// bookkeeping.
    ///
    /// Consistency between the two structures is not checked, since direct
    /// mutation is allowed to break it.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if let Some(cap) = self.capacity {
            if self.buffer.len() > cap {
                return Err(InvariantError::new(format!(
                    "buffer holds {} snapshots, capacity is {}",
                    self.buffer.len(),
                    cap
                )));
            }
            if self.ids.capacity() != Some(cap) {
                return Err(InvariantError::new(format!(
                    "identifier map bound {:?} differs from capacity {}",
                    self.ids.capacity(),
                    cap
                )));
            }
        } else if self.ids.capacity().is_some() {
            return Err(InvariantError::new(
                "unbounded history has a bounded identifier map",
            ));
        }
        self.ids.check_invariants()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

#[cfg(feature = "metrics")]
impl<S, G> TemporalHistory<S, G> {
    /// Returns the operation counters plus current gauges.
    pub fn metrics_snapshot(&self) -> HistoryMetricsSnapshot {
        self.metrics
            .to_snapshot(self.buffer.len(), self.ids.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<S, G> MetricsSnapshotProvider<HistoryMetricsSnapshot> for TemporalHistory<S, G> {
    fn snapshot(&self) -> HistoryMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<S, G> MetricsReset for TemporalHistory<S, G> {
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

impl<S, G> Extend<S> for TemporalHistory<S, G>
where
    G: IdGenerator,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, snapshots: I) {
        for snapshot in snapshots {
            self.update(snapshot);
        }
    }
}

// ---------------------------------------------------------------------------
// Iterator types
// ---------------------------------------------------------------------------

/// Borrowed iterator over snapshots in a [`TemporalHistory`], oldest to newest.
///
/// Created by [`TemporalHistory::iter`]. Each call to `iter` starts over from
/// the oldest retained snapshot.
#[derive(Debug, Clone)]
pub struct Iter<'a, S> {
    inner: vec_deque::Iter<'a, Entry<S>>,
}

impl<'a, S> Iterator for Iter<'a, S> {
    type Item = &'a S;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.snapshot.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| entry.snapshot.as_ref())
    }
}

impl<S> ExactSizeIterator for Iter<'_, S> {}

impl<S> FusedIterator for Iter<'_, S> {}

impl<'a, S, G> IntoIterator for &'a TemporalHistory<S, G> {
    type Item = &'a S;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
