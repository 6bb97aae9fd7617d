use std::collections::BTreeMap;

use crate::engine::stats::percent;
use crate::record::RequestRecord;
use crate::results::{DistributionEntry, ResponseCodeEntry};

/// Histogram ranges as `(label, exclusive upper bound)`; the last range is
/// open-ended.
pub const DISTRIBUTION_RANGES: [(&str, Option<u64>); 6] = [
    ("<100ms", Some(100)),
    ("100-200ms", Some(200)),
    ("200-300ms", Some(300)),
    ("300-500ms", Some(500)),
    ("500ms-1s", Some(1000)),
    (">1s", None),
];

/// Index into [`DISTRIBUTION_RANGES`] of the range holding `elapsed`.
pub fn range_index(elapsed: u64) -> usize {
    DISTRIBUTION_RANGES
        .iter()
        .position(|(_, upper)| upper.map_or(true, |u| elapsed < u))
        .unwrap_or(DISTRIBUTION_RANGES.len() - 1)
}

/// Elapsed-time histogram over every record, in range order.
///
/// With `include_empty` unset, ranges no record falls into are left out.
pub fn elapsed_distribution(
    records: &[RequestRecord],
    include_empty: bool,
) -> Vec<DistributionEntry> {
    let mut counts = [0u64; DISTRIBUTION_RANGES.len()];
    for r in records {
        counts[range_index(r.elapsed)] += 1;
    }

    let total = records.len() as u64;
    DISTRIBUTION_RANGES
        .iter()
        .zip(counts)
        .filter(|(_, count)| include_empty || *count > 0)
        .map(|((label, _), count)| DistributionEntry {
            range: label.to_string(),
            count,
            percentage: format!("{:.1}", percent(count, total)),
        })
        .collect()
}

/// Count and share of each distinct response code, ascending by code.
pub fn response_code_breakdown(records: &[RequestRecord]) -> Vec<ResponseCodeEntry> {
    let mut counts: BTreeMap<u16, u64> = BTreeMap::new();
    for r in records {
        *counts.entry(r.response_code).or_insert(0) += 1;
    }

    let total = records.len() as u64;
    counts
        .into_iter()
        .map(|(response_code, count)| ResponseCodeEntry {
            response_code,
            count,
            percentage: format!("{:.1}", percent(count, total)),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
