use tracing::warn;

use crate::engine::stats::{mean_of, percent, ElapsedStats};
use crate::record::RequestRecord;
use crate::results::PerformanceStats;

/// Bytes per second to megabits per second.
const BYTES_PER_MEGABIT: f64 = 125_000.0;
const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Seconds between the first and last request start. `by_time` must be in
/// ascending timestamp order.
pub fn test_duration_secs(by_time: &[&RequestRecord]) -> f64 {
    match (by_time.first(), by_time.last()) {
        (Some(first), Some(last)) => (last.timestamp - first.timestamp) as f64 / 1000.0,
        _ => 0.0,
    }
}

/// `numerator / seconds`, or 0 for a zero-length test.
fn per_second(numerator: f64, seconds: f64) -> f64 {
    if seconds > 0.0 {
        numerator / seconds
    } else {
        0.0
    }
}

/// Assemble the flat summary bundle.
///
/// `by_time` is the time-ordered view of every record; `elapsed` was computed
/// over the same records.
pub fn build_stats(by_time: &[&RequestRecord], elapsed: &ElapsedStats) -> PerformanceStats {
    let total = by_time.len() as u64;

    let mut successful = 0u64;
    let mut code_errors = 0u64;
    let mut bytes = 0u64;
    let mut peak_threads = 0u32;
    for r in by_time {
        if r.success {
            successful += 1;
        }
        if !r.is_successful_response() {
            code_errors += 1;
        }
        bytes = bytes.saturating_add(r.total_bytes());
        peak_threads = peak_threads.max(r.active_threads_total);
    }
    let failed = total - successful;
    let total_bytes = bytes as f64;

    let duration = test_duration_secs(by_time);
    if total > 1 && duration == 0.0 {
        warn!(records = total, "all requests share one timestamp; rates reported as 0");
    }
    let rps = per_second(total as f64, duration);

    let avg_bytes_per_request = if total > 0 {
        total_bytes / total as f64
    } else {
        0.0
    };

    PerformanceStats {
        total_requests: total,
        successful_requests: successful,
        failed_requests: failed,
        average_response_time: format!("{:.2}", elapsed.mean()),
        max_response_time: elapsed.max(),
        min_response_time: elapsed.min(),
        median_response_time: elapsed.median(),
        standard_deviation: elapsed.std_dev(),
        error_rate: format!("{:.2}", percent(failed, total)),
        percentile90: elapsed.percentile(90.0),
        percentile95: elapsed.percentile(95.0),
        percentile99: elapsed.percentile(99.0),
        requests_per_second: rps,
        avg_throughput: format!("{rps:.2}"),
        peak_concurrent_users: peak_threads,
        avg_threads: format!(
            "{:.1}",
            mean_of(by_time.iter().map(|r| f64::from(r.active_threads_total)))
        ),
        avg_connect_time: format!(
            "{:.2}",
            mean_of(by_time.iter().map(|r| r.connect_time as f64))
        ),
        avg_latency: format!("{:.2}", mean_of(by_time.iter().map(|r| r.latency as f64))),
        total_data_transferred: format!("{:.2} MB", total_bytes / BYTES_PER_MB),
        total_bandwidth_mbps: format!(
            "{:.2}",
            per_second(total_bytes, duration) / BYTES_PER_MEGABIT
        ),
        avg_bandwidth_per_request: format!("{:.2} KB", avg_bytes_per_request / BYTES_PER_KB),
        test_duration: format!("{duration:.2} seconds"),
        erroneous_responses: code_errors,
        successful_response_rate: format!("{:.2}%", percent(total - code_errors, total)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(records: &[RequestRecord]) -> PerformanceStats {
        let mut by_time: Vec<&RequestRecord> = records.iter().collect();
        by_time.sort_by_key(|r| r.timestamp);
        build_stats(&by_time, &ElapsedStats::from_records(records))
    }

    #[test]
    fn empty_input_is_zeroed_not_nan() {
        let s = summarize(&[]);
        assert_eq!(s.total_requests, 0);
        assert_eq!(s.error_rate, "0.00");
        assert_eq!(s.average_response_time, "0.00");
        assert_eq!(s.requests_per_second, 0.0);
        assert_eq!(s.avg_throughput, "0.00");
        assert_eq!(s.total_bandwidth_mbps, "0.00");
        assert_eq!(s.avg_bandwidth_per_request, "0.00 KB");
        assert_eq!(s.total_data_transferred, "0.00 MB");
        assert_eq!(s.test_duration, "0.00 seconds");
        assert_eq!(s.successful_response_rate, "0.00%");
        assert_eq!(s.avg_threads, "0.0");
        assert_eq!(s.percentile99, 0);
    }

    #[test]
    fn throughput_and_duration() {
        let records: Vec<RequestRecord> =
            (0..4).map(|i| RequestRecord::new(i * 1000, 100)).collect();
        let s = summarize(&records);
        assert_eq!(s.test_duration, "3.00 seconds");
        assert!((s.requests_per_second - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.avg_throughput, "1.33");
    }

    #[test]
    fn duration_uses_time_order_not_input_order() {
        let records = vec![
            RequestRecord::new(5_000, 1),
            RequestRecord::new(1_000, 1),
            RequestRecord::new(3_000, 1),
        ];
        let s = summarize(&records);
        assert_eq!(s.test_duration, "4.00 seconds");
    }

    #[test]
    fn zero_duration_reports_zero_rates() {
        let records: Vec<RequestRecord> = (0..3)
            .map(|_| RequestRecord {
                bytes_received: 1_000,
                ..RequestRecord::new(42, 10)
            })
            .collect();
        let s = summarize(&records);
        assert_eq!(s.requests_per_second, 0.0);
        assert_eq!(s.total_bandwidth_mbps, "0.00");
        assert_eq!(s.test_duration, "0.00 seconds");
    }

    #[test]
    fn success_flag_and_response_code_are_tracked_separately() {
        let records = vec![
            RequestRecord {
                success: false,
                response_code: 200,
                ..RequestRecord::new(0, 10)
            },
            RequestRecord::new(1_000, 10),
        ];
        let s = summarize(&records);
        assert_eq!(s.failed_requests, 1);
        assert_eq!(s.error_rate, "50.00");
        assert_eq!(s.erroneous_responses, 0);
        assert_eq!(s.successful_response_rate, "100.00%");
    }

    #[test]
    fn code_errors_count_records_at_or_above_400() {
        let records: Vec<RequestRecord> = [200u16, 404, 404, 500]
            .iter()
            .enumerate()
            .map(|(i, &code)| RequestRecord {
                response_code: code,
                ..RequestRecord::new(i as i64, 10)
            })
            .collect();
        let s = summarize(&records);
        assert_eq!(s.erroneous_responses, 3);
        assert_eq!(s.successful_response_rate, "25.00%");
        // success flags were all true
        assert_eq!(s.error_rate, "0.00");
    }

    #[test]
    fn byte_totals_and_bandwidth() {
        // 2 records, 1 second apart, 1 MiB total
        let records = vec![
            RequestRecord {
                bytes_received: 500_000,
                bytes_sent: 24_288,
                ..RequestRecord::new(0, 10)
            },
            RequestRecord {
                bytes_received: 500_000,
                bytes_sent: 24_288,
                ..RequestRecord::new(1_000, 10)
            },
        ];
        let s = summarize(&records);
        assert_eq!(s.total_data_transferred, "1.00 MB");
        assert_eq!(s.avg_bandwidth_per_request, "512.00 KB");
        // 1_048_576 B/s / 125_000 = 8.388...
        assert_eq!(s.total_bandwidth_mbps, "8.39");
    }

    #[test]
    fn byte_totals_saturate_on_huge_values() {
        let records = vec![
            RequestRecord {
                bytes_received: u64::MAX,
                bytes_sent: 1,
                ..RequestRecord::new(0, 10)
            },
            RequestRecord {
                bytes_received: u64::MAX,
                ..RequestRecord::new(1_000, 10)
            },
        ];
        let s = summarize(&records);
        let expected_mb = u64::MAX as f64 / BYTES_PER_MB;
        assert_eq!(s.total_data_transferred, format!("{expected_mb:.2} MB"));
    }

    #[test]
    fn timing_and_thread_means() {
        let records = vec![
            RequestRecord {
                connect_time: 10,
                latency: 40,
                active_threads_total: 3,
                ..RequestRecord::new(0, 100)
            },
            RequestRecord {
                connect_time: 5,
                latency: 25,
                active_threads_total: 8,
                ..RequestRecord::new(1_000, 100)
            },
        ];
        let s = summarize(&records);
        assert_eq!(s.avg_connect_time, "7.50");
        assert_eq!(s.avg_latency, "32.50");
        assert_eq!(s.avg_threads, "5.5");
        assert_eq!(s.peak_concurrent_users, 8);
    }

    #[test]
    fn elapsed_statistics_are_carried_through() {
        let records: Vec<RequestRecord> = [100u64, 100, 100, 1000]
            .iter()
            .enumerate()
            .map(|(i, &v)| RequestRecord::new(i as i64 * 1000, v))
            .collect();
        let s = summarize(&records);
        assert_eq!(s.average_response_time, "325.00");
        assert_eq!(s.min_response_time, 100);
        assert_eq!(s.max_response_time, 1000);
        assert_eq!(s.median_response_time, 100);
        assert_eq!(s.percentile90, 1000);
        assert!((s.standard_deviation - 389.711).abs() < 0.001);
    }
}
