use crate::engine::stats::ElapsedStats;
use crate::engine::to_utc;
use crate::error::JtlensError;
use crate::record::RequestRecord;
use crate::results::OutlierEntry;

/// `mean + sigma * stddev` over the full, unsampled input.
pub fn outlier_threshold(stats: &ElapsedStats, sigma: f64) -> f64 {
    stats.mean() + sigma * stats.std_dev()
}

/// Records whose elapsed time is strictly above `threshold`, in the order
/// they are given. Never capped or sampled.
pub fn detect_outliers<'a>(
    records: impl IntoIterator<Item = &'a RequestRecord>,
    threshold: f64,
) -> Result<Vec<OutlierEntry>, JtlensError> {
    records
        .into_iter()
        .filter(|r| r.elapsed as f64 > threshold)
        .map(|r| {
            Ok(OutlierEntry {
                timestamp: to_utc(r.timestamp, 0)?,
                elapsed: r.elapsed,
            })
        })
        .collect()
}
