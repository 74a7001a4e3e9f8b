//! Identifier generation for snapshots recorded without an explicit id.
//!
//! A [`TemporalHistory`](crate::history::TemporalHistory) owns one
//! [`IdGenerator`] and asks it for a fresh identifier on every
//! [`update`](crate::history::TemporalHistory::update). The default
//! [`UuidGenerator`] yields random UUID v4 strings; [`SequentialIds`] yields
//! predictable ids and is what tests should inject.
//!
//! ```
//! use temporalkit::id::{IdGenerator, SequentialIds};
//!
//! let mut ids = SequentialIds::with_prefix("frame-");
//! assert_eq!(ids.next_id(), "frame-0");
//! assert_eq!(ids.next_id(), "frame-1");
//! ```

use uuid::Uuid;

/// Source of identifiers for snapshots recorded without one.
///
/// Ids only need to be unique within one history; collisions with caller
/// supplied ids are not checked.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Random UUID v4 identifiers in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix><n>` identifiers counting up from zero.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_are_unique_and_parse() {
        let mut generator = UuidGenerator;
        let ids: HashSet<String> = (0..256).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 256);
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok());
        }
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "0");
        assert_eq!(ids.next_id(), "1");
    }

    #[test]
    fn closures_are_generators() {
        let mut n = 10;
        let mut generator = move || {
            n += 1;
            format!("c{n}")
        };
        assert_eq!(IdGenerator::next_id(&mut generator), "c11");
        assert_eq!(IdGenerator::next_id(&mut generator), "c12");
    }
}
