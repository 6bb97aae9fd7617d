pub mod export;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PerformanceStats — flat summary bundle
// ---------------------------------------------------------------------------

/// Summary statistics for a whole result log.
///
/// Fields documented with a unit or decimal count are pre-formatted display
/// strings; the rest are raw numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PerformanceStats {
    pub total_requests: u64,
    /// Records with the `success` flag set.
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Mean elapsed time, 2 decimals.
    pub average_response_time: String,
    pub max_response_time: u64,
    pub min_response_time: u64,
    pub median_response_time: u64,
    /// Population standard deviation of elapsed time.
    pub standard_deviation: f64,
    /// Share of records with `success == false`, percent, 2 decimals.
    pub error_rate: String,
    pub percentile90: u64,
    pub percentile95: u64,
    pub percentile99: u64,
    pub requests_per_second: f64,
    /// `requests_per_second`, 2 decimals.
    pub avg_throughput: String,
    pub peak_concurrent_users: u32,
    /// Mean of `active_threads_total`, 1 decimal.
    pub avg_threads: String,
    /// Mean connect time, 2 decimals.
    pub avg_connect_time: String,
    /// Mean latency, 2 decimals.
    pub avg_latency: String,
    /// e.g. `"12.34 MB"`.
    pub total_data_transferred: String,
    /// Megabits per second over the test duration, 2 decimals.
    pub total_bandwidth_mbps: String,
    /// e.g. `"1.50 KB"`.
    pub avg_bandwidth_per_request: String,
    /// e.g. `"3.00 seconds"`.
    pub test_duration: String,
    /// Records with `response_code >= 400`.
    pub erroneous_responses: u64,
    /// Share of records with `response_code < 400`, e.g. `"99.50%"`.
    pub successful_response_rate: String,
}

// ---------------------------------------------------------------------------
// Series and breakdown entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PercentilePoint {
    pub percentile: f64,
    pub value: u64,
}

/// One sampled record with its elapsed time split into phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeSeriesEntry {
    pub timestamp: DateTime<Utc>,
    pub elapsed: u64,
    pub connect: u64,
    /// Latency after the connection was established.
    pub latency: u64,
    /// Time after the first byte.
    pub processing: u64,
    pub threads: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ErrorRateEntry {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ThreadMetricsEntry {
    pub timestamp: DateTime<Utc>,
    pub thread_count: f64,
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BandwidthMetricsEntry {
    pub timestamp: DateTime<Utc>,
    /// Bytes received in the window, scaled to a one-second rate.
    pub bytes_per_second: u64,
    /// Bytes sent in the window, scaled to a one-second rate.
    pub sent_bytes_per_second: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutlierEntry {
    pub timestamp: DateTime<Utc>,
    pub elapsed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DistributionEntry {
    pub range: String,
    pub count: u64,
    /// Share of all records, 1 decimal.
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResponseCodeEntry {
    pub response_code: u16,
    pub count: u64,
    /// Share of all records, 1 decimal.
    pub percentage: String,
}

// ---------------------------------------------------------------------------
// AnalysisReport — the complete result bundle
// ---------------------------------------------------------------------------

/// Every view derived from one result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisReport {
    pub stats: PerformanceStats,
    pub percentile_data: Vec<PercentilePoint>,
    pub time_series: Vec<TimeSeriesEntry>,
    pub error_rate_over_time: Vec<ErrorRateEntry>,
    pub thread_metrics: Vec<ThreadMetricsEntry>,
    pub bandwidth_metrics: Vec<BandwidthMetricsEntry>,
    pub response_time_outliers: Vec<OutlierEntry>,
    pub distribution_data: Vec<DistributionEntry>,
    pub error_breakdown: Vec<ResponseCodeEntry>,
}
