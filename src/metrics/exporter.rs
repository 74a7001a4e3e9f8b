use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::HistoryMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for history metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to a collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, name: &str, value: u64) {
        self.write_metric("counter", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        self.write_metric("gauge", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<HistoryMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &HistoryMetricsSnapshot) {
        let counters = [
            ("update_calls_total", snapshot.update_calls),
            ("generated_ids_total", snapshot.generated_ids),
            ("reused_ids_total", snapshot.reused_ids),
            ("buffer_evictions_total", snapshot.buffer_evictions),
            ("id_evictions_total", snapshot.id_evictions),
            ("direct_set_calls_total", snapshot.direct_set_calls),
            ("direct_delete_calls_total", snapshot.direct_delete_calls),
            ("direct_delete_missing_total", snapshot.direct_delete_missing),
            ("recency_calls_total", snapshot.recency_calls),
            ("recency_hits_total", snapshot.recency_hits),
            ("recency_out_of_range_total", snapshot.recency_out_of_range),
            ("identifier_calls_total", snapshot.identifier_calls),
            ("identifier_hits_total", snapshot.identifier_hits),
            ("identifier_misses_total", snapshot.identifier_misses),
            ("slice_calls_total", snapshot.slice_calls),
            ("clear_calls_total", snapshot.clear_calls),
        ];
        for (suffix, value) in counters {
            self.write_counter(&self.metric_name(suffix), value);
        }

        self.write_gauge(&self.metric_name("len"), snapshot.len as u64);
        self.write_gauge(&self.metric_name("id_len"), snapshot.id_len as u64);
        // Unbounded histories have no capacity gauge.
        if let Some(capacity) = snapshot.capacity {
            self.write_gauge(&self.metric_name("capacity"), capacity as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("history", Vec::new());
        let snapshot = HistoryMetricsSnapshot {
            update_calls: 3,
            buffer_evictions: 1,
            len: 2,
            capacity: Some(2),
            ..Default::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE history_update_calls_total counter"));
        assert!(text.contains("history_update_calls_total 3"));
        assert!(text.contains("history_buffer_evictions_total 1"));
        assert!(text.contains("history_len 2"));
        assert!(text.contains("history_capacity 2"));
    }

    #[test]
    fn unbounded_history_omits_capacity() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&HistoryMetricsSnapshot::default());

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("len 0"));
        assert!(!text.contains("capacity"));
    }
}
