//! temporalkit: bounded, order-preserving snapshot history.
//!
//! A [`TemporalHistory`] keeps the last `C` snapshots of an evolving object
//! and lets callers read them back by recency, by slice, or by identifier.
//! See [`history`] for the data layout and [`ds::bounded_id_map`] for the
//! identifier index.

pub mod builder;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod ds;
pub mod error;
pub mod history;
pub mod id;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod snapshot;

pub use crate::builder::HistoryBuilder;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentTemporalHistory;
pub use crate::ds::{BoundedIdMap, SliceSpec};
pub use crate::error::{HistoryError, InvariantError};
pub use crate::history::{HistoryIndex, Selection, TemporalHistory};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::HistoryMetricsSnapshot;
