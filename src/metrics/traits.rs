//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting*, and *export* into small traits so the
//! history's operations only ever write counters.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │   HistoryMetricsRecorder     │    │  HistoryMetricsReadRecorder  │
//!   │  update / evict / set / del  │    │  recency / identifier / slice│
//!   │  (&mut self paths)           │    │  (&self paths)               │
//!   └──────────────┬───────────────┘    └───────────────┬──────────────┘
//!                  └───────────────┬────────────────────┘
//!                                  ▼
//!                          ┌───────────────┐
//!                          │ HistoryMetrics │
//!                          └───────┬───────┘
//!                                  │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written by mutating history operations.
pub trait HistoryMetricsRecorder {
    fn record_update(&mut self);
    fn record_generated_id(&mut self);
    fn record_reused_id(&mut self);
    fn record_buffer_eviction(&mut self);
    fn record_id_evictions(&mut self, count: u64);
    fn record_direct_set(&mut self);
    fn record_direct_delete(&mut self, found: bool);
    fn record_clear(&mut self);
}

/// Counters written by read-only history operations (interior mutability).
pub trait HistoryMetricsReadRecorder {
    fn record_recency_call(&self);
    fn record_recency_hit(&self);
    fn record_recency_out_of_range(&self);
    fn record_identifier_call(&self);
    fn record_identifier_hit(&self);
    fn record_slice_call(&self);
}

/// Point-in-time snapshot of metrics, for tests and benchmarks.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
