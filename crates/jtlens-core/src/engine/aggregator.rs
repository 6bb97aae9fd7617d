use std::collections::BTreeMap;

use crate::engine::sampling::stride_sample;
use crate::engine::to_utc;
use crate::error::JtlensError;
use crate::record::RequestRecord;
use crate::results::{BandwidthMetricsEntry, ErrorRateEntry, ThreadMetricsEntry};

// ---------------------------------------------------------------------------
// BucketStats — per-window accumulator
// ---------------------------------------------------------------------------

/// Totals for the records of a single time window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketStats {
    pub requests: u64,
    pub errors: u64,
    pub sum_elapsed: u64,
    pub sum_threads: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

impl BucketStats {
    fn record(&mut self, r: &RequestRecord) {
        self.requests += 1;
        if !r.success {
            self.errors += 1;
        }
        // Values come straight from the log, so sums saturate instead of wrapping.
        self.sum_elapsed = self.sum_elapsed.saturating_add(r.elapsed);
        self.sum_threads = self.sum_threads.saturating_add(u64::from(r.active_threads_total));
        self.bytes_received = self.bytes_received.saturating_add(r.bytes_received);
        self.bytes_sent = self.bytes_sent.saturating_add(r.bytes_sent);
    }

    /// Percentage of records in the window with `success == false`.
    pub fn error_rate(&self) -> f64 {
        self.errors as f64 / self.requests as f64 * 100.0
    }

    pub fn avg_threads(&self) -> f64 {
        self.sum_threads as f64 / self.requests as f64
    }

    pub fn avg_elapsed(&self) -> f64 {
        self.sum_elapsed as f64 / self.requests as f64
    }
}

/// Start of the epoch-aligned window containing `timestamp`.
pub fn bucket_key(timestamp: i64, width_ms: i64) -> i64 {
    timestamp.div_euclid(width_ms) * width_ms
}

/// Scale a byte sum over a `width_ms` window to bytes per second.
fn bytes_per_second(bytes: u64, width_ms: i64) -> u64 {
    let rate = u128::from(bytes) * 1000 / width_ms.unsigned_abs().max(1) as u128;
    u64::try_from(rate).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// TimeBuckets
// ---------------------------------------------------------------------------

/// Records grouped into fixed-width windows keyed by window start (ms).
///
/// Only windows that received at least one record exist, so every bucket has
/// `requests >= 1` and the per-bucket ratios never divide by zero.
#[derive(Debug, Clone, Default)]
pub struct TimeBuckets {
    buckets: BTreeMap<i64, BucketStats>,
    width_ms: i64,
}

impl TimeBuckets {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a RequestRecord>,
        width_ms: i64,
    ) -> Self {
        let mut buckets: BTreeMap<i64, BucketStats> = BTreeMap::new();
        for r in records {
            buckets
                .entry(bucket_key(r.timestamp, width_ms))
                .or_default()
                .record(r);
        }
        Self { buckets, width_ms }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in ascending window order, thinned by `rate`.
    fn sampled(&self, rate: usize) -> Vec<(&i64, &BucketStats)> {
        stride_sample(self.buckets.iter(), rate)
    }

    pub fn error_rate_series(&self, rate: usize) -> Result<Vec<ErrorRateEntry>, JtlensError> {
        self.sampled(rate)
            .into_iter()
            .map(|(&start, bucket)| {
                Ok(ErrorRateEntry {
                    timestamp: to_utc(start, 0)?,
                    error_rate: bucket.error_rate(),
                })
            })
            .collect()
    }

    pub fn thread_series(&self, rate: usize) -> Result<Vec<ThreadMetricsEntry>, JtlensError> {
        self.sampled(rate)
            .into_iter()
            .map(|(&start, bucket)| {
                Ok(ThreadMetricsEntry {
                    timestamp: to_utc(start, 0)?,
                    thread_count: bucket.avg_threads(),
                    avg_response_time: bucket.avg_elapsed(),
                })
            })
            .collect()
    }

    /// Byte sums per window scaled to bytes per second. With the default
    /// one-second width the sums are reported unchanged.
    pub fn bandwidth_series(
        &self,
        rate: usize,
    ) -> Result<Vec<BandwidthMetricsEntry>, JtlensError> {
        self.sampled(rate)
            .into_iter()
            .map(|(&start, bucket)| {
                Ok(BandwidthMetricsEntry {
                    timestamp: to_utc(start, 0)?,
                    bytes_per_second: bytes_per_second(bucket.bytes_received, self.width_ms),
                    sent_bytes_per_second: bytes_per_second(bucket.bytes_sent, self.width_ms),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
