//! The aggregation engine: a pure function from a complete record set to
//! every derived view in an [`AnalysisReport`].
//!
//! No state survives a call, so concurrent calls on independent inputs need
//! no coordination.

pub mod aggregator;
pub mod distribution;
pub mod outliers;
pub mod sampling;
pub mod stats;
pub mod summary;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::JtlensError;
use crate::record::RequestRecord;
use crate::results::{AnalysisReport, TimeSeriesEntry};

pub use aggregator::{BucketStats, TimeBuckets};
pub use stats::ElapsedStats;

/// Convert epoch milliseconds to a UTC timestamp.
pub(crate) fn to_utc(millis: i64, row: usize) -> Result<DateTime<Utc>, JtlensError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        JtlensError::malformed(row, "timestamp", format!("{millis} is out of range"))
    })
}

/// Stable sort of the records by start time, without touching the caller's
/// slice. Every windowed and series computation reads this view.
pub fn normalize(records: &[RequestRecord]) -> Vec<&RequestRecord> {
    let mut by_time: Vec<&RequestRecord> = records.iter().collect();
    by_time.sort_by_key(|r| r.timestamp);
    by_time
}

/// Per-record series with each elapsed time split into connect, latency and
/// processing phases, thinned by `rate`.
///
/// Inconsistent timings (only possible with `strict_timings` off) saturate
/// the affected phase at 0.
pub fn time_series(
    by_time: &[&RequestRecord],
    rate: usize,
) -> Result<Vec<TimeSeriesEntry>, JtlensError> {
    sampling::stride_sample(by_time.iter(), rate)
        .into_iter()
        .map(|r| {
            Ok(TimeSeriesEntry {
                timestamp: to_utc(r.timestamp, 0)?,
                elapsed: r.elapsed,
                connect: r.connect_time,
                latency: r.latency.saturating_sub(r.connect_time),
                processing: r.elapsed.saturating_sub(r.latency),
                threads: r.active_threads_total,
            })
        })
        .collect()
}

fn check_records(records: &[RequestRecord], config: &AnalysisConfig) -> Result<(), JtlensError> {
    for (i, r) in records.iter().enumerate() {
        let row = i + 1;
        to_utc(r.timestamp, row)?;
        if config.strict_timings {
            r.check_timings(row)?;
        }
    }
    Ok(())
}

/// Derive every analytical view from `records`.
///
/// Fails without partial output if the config is invalid, a timestamp is
/// not representable, or (with `strict_timings`) a record's timings are
/// inconsistent. Row numbers in errors are 1-based positions in `records`.
pub fn analyze(
    records: &[RequestRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, JtlensError> {
    config.validate()?;
    check_records(records, config)?;

    let by_time = normalize(records);
    let elapsed = ElapsedStats::from_records(by_time.iter().copied());
    let rate = sampling::sampling_rate(records.len(), config.max_data_points);
    let buckets = TimeBuckets::from_records(by_time.iter().copied(), config.bucket_width_ms);

    debug!(
        records = records.len(),
        buckets = buckets.len(),
        sampling_rate = rate,
        "aggregating result log"
    );

    let threshold = outliers::outlier_threshold(&elapsed, config.outlier_sigma);

    Ok(AnalysisReport {
        stats: summary::build_stats(&by_time, &elapsed),
        percentile_data: elapsed.percentile_curve(&config.percentile_points),
        time_series: time_series(&by_time, rate)?,
        error_rate_over_time: buckets.error_rate_series(rate)?,
        thread_metrics: buckets.thread_series(rate)?,
        bandwidth_metrics: buckets.bandwidth_series(rate)?,
        response_time_outliers: outliers::detect_outliers(by_time.iter().copied(), threshold)?,
        distribution_data: distribution::elapsed_distribution(
            records,
            config.include_empty_buckets,
        ),
        error_breakdown: distribution::response_code_breakdown(records),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
