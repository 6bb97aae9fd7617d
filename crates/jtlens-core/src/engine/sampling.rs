/// Stride used to thin per-record series: `max(1, floor(n / max_points))`.
///
/// Computed once from the full record count and reused for every series, so
/// the windowed series are thinned by the same factor as the raw one.
pub fn sampling_rate(record_count: usize, max_points: usize) -> usize {
    (record_count / max_points.max(1)).max(1)
}

/// Keep every `rate`-th item, starting with the first.
///
/// This is a deterministic stride, not a statistical resample: a short spike
/// that falls between kept positions does not show up in the output.
pub fn stride_sample<T>(items: impl IntoIterator<Item = T>, rate: usize) -> Vec<T> {
    let rate = rate.max(1);
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % rate == 0)
        .map(|(_, item)| item)
        .collect()
}
