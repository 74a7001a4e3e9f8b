//! Field access on snapshot records.
//!
//! The history never inspects snapshots except through
//! [`TemporalHistory::get`](crate::history::TemporalHistory::get), which looks
//! a single field up by name. Any record type can take part by implementing
//! [`FieldAccess`]; string-keyed maps already do.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Named-field lookup on a snapshot record.
///
/// # Example
///
/// ```
/// use temporalkit::snapshot::FieldAccess;
///
/// struct Pose {
///     x: f32,
///     y: f32,
/// }
///
/// impl FieldAccess for Pose {
///     type Value = f32;
///
///     fn field(&self, name: &str) -> Option<&f32> {
///         match name {
///             "x" => Some(&self.x),
///             "y" => Some(&self.y),
///             _ => None,
///         }
///     }
/// }
///
/// let pose = Pose { x: 1.0, y: 2.0 };
/// assert_eq!(pose.field("y"), Some(&2.0));
/// assert_eq!(pose.field("z"), None);
/// ```
pub trait FieldAccess {
    type Value;

    fn field(&self, name: &str) -> Option<&Self::Value>;
}

impl<K, V, S> FieldAccess for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    S: BuildHasher,
{
    type Value = V;

    fn field(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<K, V> FieldAccess for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
{
    type Value = V;

    fn field(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn hash_map_fields() {
        let mut record = HashMap::new();
        record.insert("speed".to_string(), 3);
        assert_eq!(record.field("speed"), Some(&3));
        assert_eq!(record.field("heading"), None);
    }

    #[test]
    fn fx_hash_map_fields() {
        let mut record: FxHashMap<&'static str, i64> = FxHashMap::default();
        record.insert("hp", 40);
        assert_eq!(record.field("hp"), Some(&40));
    }

    #[test]
    fn btree_map_fields() {
        let record = BTreeMap::from([("a".to_string(), 'x'), ("b".to_string(), 'y')]);
        assert_eq!(record.field("b"), Some(&'y'));
        assert_eq!(record.field("c"), None);
    }
}
