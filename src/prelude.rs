pub use crate::builder::HistoryBuilder;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentTemporalHistory;
pub use crate::ds::{BoundedIdMap, SliceSpec};
pub use crate::error::HistoryError;
pub use crate::history::{HistoryIndex, Selection, TemporalHistory};
pub use crate::id::{IdGenerator, SequentialIds, UuidGenerator};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
pub use crate::snapshot::FieldAccess;
