//! Insertion-ordered identifier map with an optional entry bound.
//!
//! Maps string identifiers to values and, once the bound is reached, evicts the
//! oldest-inserted surviving identifier before admitting a new one. Used by
//! [`TemporalHistory`](crate::history::TemporalHistory) as its identifier index,
//! evicting in the same order as the history's sequential buffer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                      BoundedIdMap<V> Layout (capacity 3)                    │
//! │                                                                             │
//! │   map: FxHashMap<String, Slot<V>>       order: VecDeque<(String, stamp)>    │
//! │                                                                             │
//! │   ┌──────────┬───────┬───────┐          front                    back       │
//! │   │   key    │ stamp │ value │          ┌──────┬──────┬──────┬──────┐       │
//! │   ├──────────┼───────┼───────┤          │ a,0  │ b,1  │ c,2  │ d,3  │       │
//! │   │   "a"    │   0   │  va   │          └──────┴──────┴──────┴──────┘       │
//! │   │   "c"    │   2   │  vc   │             ▲      ▲                         │
//! │   │   "d"    │   3   │  vd   │             │      └── stale: "b" deleted    │
//! │   └──────────┴───────┴───────┘             └── oldest live entry            │
//! │                                                                             │
//! │   An order entry is live iff map[key].stamp == entry.stamp.                 │
//! │                                                                             │
//! │   set("e", ve) at capacity:                                                 │
//! │     1. pop_front (a,0) → live → remove "a" from map                         │
//! │     2. push_back (e,4), map["e"] = Slot { stamp: 4, value: ve }             │
//! │                                                                             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deletes only touch `map`; the matching order entry becomes stale and is
//! skipped (or compacted away) later. This keeps `delete` O(1).
//!
//! ## Operations
//!
//! | Operation      | Description                                   | Complexity     |
//! |----------------|-----------------------------------------------|----------------|
//! | [`set`]        | Insert or overwrite, evicting oldest if full  | O(1) amortized |
//! | [`get`]        | Lookup by identifier                          | O(1)           |
//! | [`contains`]   | Membership test                               | O(1)           |
//! | [`delete`]     | Strict removal (errors when absent)           | O(1) amortized |
//! | [`remove`]     | Lenient removal                               | O(1) amortized |
//! | [`iter`]       | Live entries, oldest first                    | O(n)           |
//!
//! [`set`]: BoundedIdMap::set
//! [`get`]: BoundedIdMap::get
//! [`contains`]: BoundedIdMap::contains
//! [`delete`]: BoundedIdMap::delete
//! [`remove`]: BoundedIdMap::remove
//! [`iter`]: BoundedIdMap::iter
//!
//! ## Capacity
//!
//! - `None`: unbounded, nothing is ever evicted.
//! - `Some(0)`: holds nothing; every `set` is dropped.
//! - `Some(n)`: at most `n` entries.
//!
//! Overwriting an existing identifier keeps its original eviction position.
//!
//! ## Example Usage
//!
//! ```
//! use temporalkit::ds::BoundedIdMap;
//!
//! let mut ids = BoundedIdMap::new(Some(2));
//! ids.set("a", 1);
//! ids.set("b", 2);
//! ids.set("c", 3); // evicts "a"
//!
//! assert!(!ids.contains("a"));
//! assert_eq!(ids.get("b"), Some(&2));
//! assert_eq!(ids.get_or("a", &0), &0);
//! ```

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{HistoryError, InvariantError};

/// Stale order entries tolerated beyond the live count before compaction.
const COMPACT_SLACK: usize = 32;

#[derive(Debug, Clone)]
struct Slot<V> {
    stamp: u64,
    value: V,
}

/// String-keyed map that evicts in insertion order once `capacity` is reached.
///
/// See the [module docs](self) for the eviction model.
#[derive(Debug, Clone)]
pub struct BoundedIdMap<V> {
    map: FxHashMap<String, Slot<V>>,
    order: VecDeque<(String, u64)>,
    capacity: Option<usize>,
    next_stamp: u64,
    evictions: u64,
}

impl<V> BoundedIdMap<V> {
    /// Creates an empty map holding at most `capacity` entries (`None` = unbounded).
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::ds::BoundedIdMap;
    ///
    /// let ids: BoundedIdMap<u8> = BoundedIdMap::new(Some(8));
    /// assert_eq!(ids.capacity(), Some(8));
    /// assert!(ids.is_empty());
    /// ```
    pub fn new(capacity: Option<usize>) -> Self {
        let prealloc = capacity.unwrap_or(0);
        Self {
            map: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            order: VecDeque::with_capacity(prealloc),
            capacity,
            next_stamp: 0,
            evictions: 0,
        }
    }

    /// Creates an empty map that never evicts.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Returns the configured bound.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns how many entries have been evicted to respect the bound.
    pub fn eviction_count(&self) -> u64 {
        self.evictions
    }

    /// Inserts or overwrites `key`, returning the previous value on overwrite.
    ///
    /// A new key arriving while the map is full evicts the oldest surviving
    /// entry first. Overwrites never evict and keep the key's eviction slot.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::ds::BoundedIdMap;
    ///
    /// let mut ids = BoundedIdMap::new(Some(2));
    /// assert_eq!(ids.set("a", 1), None);
    /// ids.set("b", 2);
    ///
    /// // Overwrite keeps "a" as the oldest
    /// assert_eq!(ids.set("a", 10), Some(1));
    /// ids.set("c", 3);
    /// assert!(!ids.contains("a"));
    /// assert!(ids.contains("b"));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if self.capacity == Some(0) {
            trace!(identifier = %key, "zero-capacity identifier map dropped entry");
            return None;
        }

        if let Some(slot) = self.map.get_mut(&key) {
            return Some(std::mem::replace(&mut slot.value, value));
        }

        if let Some(cap) = self.capacity {
            while self.map.len() >= cap {
                if self.evict_oldest().is_none() {
                    break;
                }
            }
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.order.push_back((key.clone(), stamp));
        self.map.insert(key, Slot { stamp, value });
        None
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    /// Returns the value stored under `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Removes `key`, failing with [`HistoryError::KeyNotFound`] when absent.
    ///
    /// # Example
    ///
    /// ```
    /// use temporalkit::ds::BoundedIdMap;
    /// use temporalkit::error::HistoryError;
    ///
    /// let mut ids = BoundedIdMap::new(None);
    /// ids.set("a", 1);
    /// assert_eq!(ids.delete("a"), Ok(1));
    /// assert_eq!(ids.delete("a"), Err(HistoryError::KeyNotFound("a".into())));
    /// ```
    pub fn delete(&mut self, key: &str) -> Result<V, HistoryError> {
        self.remove(key)
            .ok_or_else(|| HistoryError::KeyNotFound(key.to_owned()))
    }

    /// Removes `key` if present, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let slot = self.map.remove(key)?;
        self.compact_if_needed();
        Some(slot.value)
    }

    /// Removes all entries. The bound is kept.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Returns live entries from oldest to newest insertion.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            map: &self.map,
            order: self.order.iter(),
        }
    }

    /// Returns live identifiers from oldest to newest insertion.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Pops order entries until a live one is found and evicts it.
    fn evict_oldest(&mut self) -> Option<(String, V)> {
        while let Some((key, stamp)) = self.order.pop_front() {
            let live = self.map.get(&key).is_some_and(|slot| slot.stamp == stamp);
            if !live {
                continue;
            }
            let slot = self.map.remove(&key)?;
            self.evictions += 1;
            trace!(identifier = %key, "evicted oldest identifier");
            return Some((key, slot.value));
        }
        None
    }

    fn compact_if_needed(&mut self) {
        if self.order.len() <= self.map.len().saturating_mul(2) + COMPACT_SLACK {
            return;
        }
        let map = &self.map;
        self.order
            .retain(|(key, stamp)| map.get(key).is_some_and(|slot| slot.stamp == *stamp));
    }

    /// Validates that the map and the order queue agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if let Some(cap) = self.capacity
            && self.map.len() > cap
        {
            return Err(InvariantError::new(format!(
                "identifier map holds {} entries, bound is {}",
                self.map.len(),
                cap
            )));
        }

        let mut live = 0usize;
        let mut last_stamp: Option<u64> = None;
        for (key, stamp) in &self.order {
            if let Some(prev) = last_stamp
                && *stamp <= prev
            {
                return Err(InvariantError::new(format!(
                    "order stamps not increasing at {key:?}: {prev} then {stamp}"
                )));
            }
            last_stamp = Some(*stamp);
            if self.map.get(key).is_some_and(|slot| slot.stamp == *stamp) {
                live += 1;
            }
        }

        if live != self.map.len() {
            return Err(InvariantError::new(format!(
                "order queue has {} live entries, map has {}",
                live,
                self.map.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<V> Default for BoundedIdMap<V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Borrowed iterator over live `(identifier, value)` pairs, oldest first.
///
/// Created by [`BoundedIdMap::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    map: &'a FxHashMap<String, Slot<V>>,
    order: std::collections::vec_deque::Iter<'a, (String, u64)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        self.order.find_map(|(key, stamp)| {
            map.get(key)
                .filter(|slot| slot.stamp == *stamp)
                .map(|slot| (key.as_str(), &slot.value))
        })
    }
}

impl<'a, V> IntoIterator for &'a BoundedIdMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_evicts_oldest_when_full() {
        let mut ids = BoundedIdMap::new(Some(2));
        ids.set("a", 1);
        ids.set("b", 2);
        ids.set("c", 3);

        assert!(!ids.contains("a"));
        assert!(ids.contains("b"));
        assert!(ids.contains("c"));
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.eviction_count(), 1);
        ids.debug_validate_invariants();
    }

    #[test]
    fn overwrite_keeps_eviction_position() {
        let mut ids = BoundedIdMap::new(Some(3));
        ids.set("a", 1);
        ids.set("b", 2);
        ids.set("c", 3);
        assert_eq!(ids.set("a", 10), Some(1));
        assert_eq!(ids.len(), 3);

        ids.set("d", 4);
        assert!(!ids.contains("a"));
        assert_eq!(ids.identifiers().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn unbounded_never_evicts() {
        let mut ids = BoundedIdMap::unbounded();
        for i in 0..1_000 {
            ids.set(i.to_string(), i);
        }
        assert_eq!(ids.len(), 1_000);
        assert_eq!(ids.eviction_count(), 0);
        assert_eq!(ids.get("0"), Some(&0));
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut ids = BoundedIdMap::new(Some(0));
        assert_eq!(ids.set("a", 1), None);
        assert!(ids.is_empty());
        assert!(!ids.contains("a"));
        ids.debug_validate_invariants();
    }

    #[test]
    fn get_or_returns_default_for_missing() {
        let mut ids = BoundedIdMap::new(Some(4));
        ids.set("a", 1);
        assert_eq!(ids.get_or("a", &-1), &1);
        assert_eq!(ids.get_or("zzz", &-1), &-1);
    }

    #[test]
    fn delete_is_strict_remove_is_lenient() {
        let mut ids = BoundedIdMap::new(Some(4));
        ids.set("a", 1);
        assert_eq!(ids.delete("a"), Ok(1));
        assert_eq!(ids.delete("a"), Err(HistoryError::KeyNotFound("a".into())));
        assert_eq!(ids.remove("a"), None);
    }

    #[test]
    fn deleted_entry_does_not_count_toward_eviction() {
        let mut ids = BoundedIdMap::new(Some(2));
        ids.set("a", 1);
        ids.set("b", 2);
        ids.delete("a").unwrap();

        // Room for "c" without evicting "b"
        ids.set("c", 3);
        assert!(ids.contains("b"));
        assert!(ids.contains("c"));
        assert_eq!(ids.eviction_count(), 0);

        // Stale "a" is skipped; "b" is the oldest live entry
        ids.set("d", 4);
        assert!(!ids.contains("b"));
        assert_eq!(ids.eviction_count(), 1);
        ids.debug_validate_invariants();
    }

    #[test]
    fn reinserted_key_moves_to_back() {
        let mut ids = BoundedIdMap::new(Some(2));
        ids.set("a", 1);
        ids.set("b", 2);
        ids.delete("a").unwrap();
        ids.set("a", 3);

        ids.set("c", 4);
        assert!(!ids.contains("b"));
        assert_eq!(ids.get("a"), Some(&3));
        ids.debug_validate_invariants();
    }

    #[test]
    fn delete_churn_compacts_order_queue() {
        let mut ids = BoundedIdMap::unbounded();
        for i in 0..500 {
            ids.set(i.to_string(), i);
        }
        for i in 0..490 {
            ids.delete(&i.to_string()).unwrap();
        }
        assert_eq!(ids.len(), 10);
        assert!(ids.order.len() <= ids.len() * 2 + COMPACT_SLACK);
        ids.debug_validate_invariants();
    }

    #[test]
    fn iter_skips_stale_entries() {
        let mut ids = BoundedIdMap::new(None);
        ids.set("a", 1);
        ids.set("b", 2);
        ids.set("c", 3);
        ids.delete("b").unwrap();

        let pairs: Vec<_> = ids.iter().collect();
        assert_eq!(pairs, vec![("a", &1), ("c", &3)]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ids = BoundedIdMap::new(Some(3));
        ids.set("a", 1);
        ids.clear();
        assert!(ids.is_empty());
        assert_eq!(ids.capacity(), Some(3));
        assert_eq!(ids.iter().count(), 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: len() never exceeds the bound
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_within_capacity(
            cap in 0usize..16,
            keys in prop::collection::vec(0u8..32, 0..200)
        ) {
            let mut ids = BoundedIdMap::new(Some(cap));
            for k in keys {
                ids.set(k.to_string(), k);
                prop_assert!(ids.len() <= cap);
            }
            prop_assert!(ids.check_invariants().is_ok());
        }

        /// Property: matches a Vec-backed reference model under set/delete
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_reference_model(
            cap in 1usize..8,
            ops in prop::collection::vec((any::<bool>(), 0u8..12), 0..200)
        ) {
            let mut ids = BoundedIdMap::new(Some(cap));
            let mut reference: Vec<(String, u8)> = Vec::new();

            for (is_set, k) in ops {
                let key = k.to_string();
                if is_set {
                    ids.set(key.clone(), k);
                    if let Some(entry) = reference.iter_mut().find(|(rk, _)| *rk == key) {
                        entry.1 = k;
                    } else {
                        if reference.len() >= cap {
                            reference.remove(0);
                        }
                        reference.push((key, k));
                    }
                } else {
                    let removed = ids.remove(&key);
                    let pos = reference.iter().position(|(rk, _)| *rk == key);
                    prop_assert_eq!(removed.is_some(), pos.is_some());
                    if let Some(pos) = pos {
                        reference.remove(pos);
                    }
                }

                let live: Vec<(String, u8)> =
                    ids.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
                prop_assert_eq!(&live, &reference);
                prop_assert!(ids.check_invariants().is_ok());
            }
        }
    }
}
