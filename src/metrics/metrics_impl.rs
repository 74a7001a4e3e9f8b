use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::HistoryMetricsSnapshot;
use crate::metrics::traits::{HistoryMetricsReadRecorder, HistoryMetricsRecorder, MetricsReset};

#[derive(Debug, Default, Clone)]
pub struct HistoryMetrics {
    pub update_calls: u64,
    pub generated_ids: u64,
    pub reused_ids: u64,
    pub buffer_evictions: u64,
    pub id_evictions: u64,
    pub direct_set_calls: u64,
    pub direct_delete_calls: u64,
    pub direct_delete_missing: u64,
    pub clear_calls: u64,
    pub recency_calls: MetricsCell,
    pub recency_hits: MetricsCell,
    pub recency_out_of_range: MetricsCell,
    pub identifier_calls: MetricsCell,
    pub identifier_hits: MetricsCell,
    pub slice_calls: MetricsCell,
}

impl HistoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the counters; gauges are filled in by the owning history.
    pub fn to_snapshot(
        &self,
        len: usize,
        id_len: usize,
        capacity: Option<usize>,
    ) -> HistoryMetricsSnapshot {
        let identifier_calls = self.identifier_calls.get();
        let identifier_hits = self.identifier_hits.get();
        HistoryMetricsSnapshot {
            update_calls: self.update_calls,
            generated_ids: self.generated_ids,
            reused_ids: self.reused_ids,
            buffer_evictions: self.buffer_evictions,
            id_evictions: self.id_evictions,
            direct_set_calls: self.direct_set_calls,
            direct_delete_calls: self.direct_delete_calls,
            direct_delete_missing: self.direct_delete_missing,
            recency_calls: self.recency_calls.get(),
            recency_hits: self.recency_hits.get(),
            recency_out_of_range: self.recency_out_of_range.get(),
            identifier_calls,
            identifier_hits,
            identifier_misses: identifier_calls.saturating_sub(identifier_hits),
            slice_calls: self.slice_calls.get(),
            clear_calls: self.clear_calls,
            len,
            id_len,
            capacity,
        }
    }
}

impl HistoryMetricsRecorder for HistoryMetrics {
    fn record_update(&mut self) {
        self.update_calls += 1;
    }

    fn record_generated_id(&mut self) {
        self.generated_ids += 1;
    }

    fn record_reused_id(&mut self) {
        self.reused_ids += 1;
    }

    fn record_buffer_eviction(&mut self) {
        self.buffer_evictions += 1;
    }

    fn record_id_evictions(&mut self, count: u64) {
        self.id_evictions += count;
    }

    fn record_direct_set(&mut self) {
        self.direct_set_calls += 1;
    }

    fn record_direct_delete(&mut self, found: bool) {
        self.direct_delete_calls += 1;
        if !found {
            self.direct_delete_missing += 1;
        }
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl HistoryMetricsReadRecorder for HistoryMetrics {
    fn record_recency_call(&self) {
        self.recency_calls.incr();
    }

    fn record_recency_hit(&self) {
        self.recency_hits.incr();
    }

    fn record_recency_out_of_range(&self) {
        self.recency_out_of_range.incr();
    }

    fn record_identifier_call(&self) {
        self.identifier_calls.incr();
    }

    fn record_identifier_hit(&self) {
        self.identifier_hits.incr();
    }

    fn record_slice_call(&self) {
        self.slice_calls.incr();
    }
}

impl MetricsReset for HistoryMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_derives_identifier_misses() {
        let metrics = HistoryMetrics::new();
        metrics.record_identifier_call();
        metrics.record_identifier_call();
        metrics.record_identifier_hit();

        let snap = metrics.to_snapshot(0, 0, None);
        assert_eq!(snap.identifier_calls, 2);
        assert_eq!(snap.identifier_hits, 1);
        assert_eq!(snap.identifier_misses, 1);
    }

    #[test]
    fn reset_zeroes_counters() {
        let mut metrics = HistoryMetrics::new();
        metrics.record_update();
        metrics.record_direct_delete(false);
        metrics.record_recency_call();
        metrics.reset_metrics();

        let snap = metrics.to_snapshot(3, 3, Some(4));
        assert_eq!(snap.update_calls, 0);
        assert_eq!(snap.direct_delete_missing, 0);
        assert_eq!(snap.recency_calls, 0);
        assert_eq!(snap.len, 3);
        assert_eq!(snap.capacity, Some(4));
    }
}
