//! Operation counters for [`TemporalHistory`](crate::history::TemporalHistory).
//!
//! Enabled with the `metrics` feature.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::HistoryMetrics;
pub use snapshot::HistoryMetricsSnapshot;
pub use traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
