#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryMetricsSnapshot {
    pub update_calls: u64,
    pub generated_ids: u64,
    pub reused_ids: u64, // update() with an id already in the identifier map

    pub buffer_evictions: u64,
    pub id_evictions: u64,

    pub direct_set_calls: u64,
    pub direct_delete_calls: u64,
    pub direct_delete_missing: u64,

    pub recency_calls: u64,
    pub recency_hits: u64,
    pub recency_out_of_range: u64,

    pub identifier_calls: u64,
    pub identifier_hits: u64,
    pub identifier_misses: u64,

    pub slice_calls: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub id_len: usize,
    pub capacity: Option<usize>,
}
