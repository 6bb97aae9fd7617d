use super::{AnalysisReport, PerformanceStats};

/// Summary rows as `(metric, value)` pairs, in display order.
fn summary_rows(s: &PerformanceStats) -> Vec<(&'static str, String)> {
    vec![
        ("total_requests", s.total_requests.to_string()),
        ("successful_requests", s.successful_requests.to_string()),
        ("failed_requests", s.failed_requests.to_string()),
        ("error_rate", format!("{}%", s.error_rate)),
        ("successful_response_rate", s.successful_response_rate.clone()),
        ("erroneous_responses", s.erroneous_responses.to_string()),
        ("average_response_time", format!("{} ms", s.average_response_time)),
        ("median_response_time", format!("{} ms", s.median_response_time)),
        ("min_response_time", format!("{} ms", s.min_response_time)),
        ("max_response_time", format!("{} ms", s.max_response_time)),
        ("standard_deviation", format!("{:.2} ms", s.standard_deviation)),
        ("percentile90", format!("{} ms", s.percentile90)),
        ("percentile95", format!("{} ms", s.percentile95)),
        ("percentile99", format!("{} ms", s.percentile99)),
        ("avg_connect_time", format!("{} ms", s.avg_connect_time)),
        ("avg_latency", format!("{} ms", s.avg_latency)),
        ("throughput", format!("{} req/s", s.avg_throughput)),
        ("peak_concurrent_users", s.peak_concurrent_users.to_string()),
        ("avg_threads", s.avg_threads.clone()),
        ("total_data_transferred", s.total_data_transferred.clone()),
        ("total_bandwidth", format!("{} Mbps", s.total_bandwidth_mbps)),
        ("avg_bandwidth_per_request", s.avg_bandwidth_per_request.clone()),
        ("test_duration", s.test_duration.clone()),
    ]
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

/// Export the full report as pretty-printed JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Export the summary as a two-column `metric,value` CSV, followed by one
/// `p<N>` row per percentile point.
pub fn export_csv(report: &AnalysisReport) -> String {
    let mut out = String::from("metric,value\n");
    for (metric, value) in summary_rows(&report.stats) {
        out.push_str(&format!("{},{}\n", metric, csv_escape(&value)));
    }
    for p in &report.percentile_data {
        out.push_str(&format!("p{},{}\n", p.percentile, p.value));
    }
    out
}

/// Wrap a field value in quotes and escape any embedded quotes.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Text export
// ---------------------------------------------------------------------------

/// Render a plain-text summary for terminals: headline metrics, the
/// percentile curve, the elapsed-time distribution and response codes.
pub fn export_text(report: &AnalysisReport) -> String {
    let mut out = String::from("Summary\n");
    for (metric, value) in summary_rows(&report.stats) {
        out.push_str(&format!("  {metric:<28}{value}\n"));
    }

    out.push_str("\nPercentiles\n");
    for p in &report.percentile_data {
        let name = format!("p{}", p.percentile);
        out.push_str(&format!("  {name:<28}{} ms\n", p.value));
    }

    out.push_str("\nResponse time distribution\n");
    for d in &report.distribution_data {
        out.push_str(&format!(
            "  {:<28}{:>8}  {:>6}%\n",
            d.range, d.count, d.percentage
        ));
    }

    out.push_str("\nResponse codes\n");
    for e in &report.error_breakdown {
        out.push_str(&format!(
            "  {:<28}{:>8}  {:>6}%\n",
            e.response_code, e.count, e.percentage
        ));
    }

    out.push_str(&format!(
        "\nOutliers: {} (time series points: {})\n",
        report.response_time_outliers.len(),
        report.time_series.len()
    ));

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::engine::analyze;
    use crate::record::RequestRecord;

    fn make_report() -> AnalysisReport {
        let records: Vec<RequestRecord> = [(200u16, 120u64), (200, 80), (404, 300), (500, 1500)]
            .iter()
            .enumerate()
            .map(|(i, &(code, elapsed))| RequestRecord {
                response_code: code,
                success: code < 400,
                bytes_received: 2048,
                active_threads_total: 4,
                ..RequestRecord::new(1_700_000_000_000 + i as i64 * 500, elapsed)
            })
            .collect();
        analyze(&records, &AnalysisConfig::default()).expect("analyze should succeed")
    }

    // -----------------------------------------------------------------------
    // JSON
    // -----------------------------------------------------------------------

    #[test]
    fn export_json_is_valid_json() {
        let json_str = export_json(&make_report()).expect("export_json should not fail");
        let parsed: serde_json::Value =
            serde_json::from_str(&json_str).expect("output should be valid JSON");
        assert!(parsed.get("stats").is_some());
        assert!(parsed.get("time_series").is_some());
        assert!(parsed.get("error_breakdown").is_some());
        assert_eq!(parsed["stats"]["total_requests"], 4);
    }

    #[test]
    fn export_json_round_trips() {
        let report = make_report();
        let json_str = export_json(&report).expect("export_json should not fail");
        let back: AnalysisReport = serde_json::from_str(&json_str).expect("should deserialize");
        assert_eq!(back, report);
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    #[test]
    fn export_csv_has_header_and_metrics() {
        let csv = export_csv(&make_report());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("metric,value"));
        assert!(csv.contains("total_requests,4\n"));
        assert!(csv.contains("erroneous_responses,2\n"));
        assert!(csv.contains("error_rate,50.00%\n"));
    }

    #[test]
    fn export_csv_lists_percentiles() {
        let csv = export_csv(&make_report());
        assert!(csv.contains("p50,"));
        assert!(csv.contains("p99.9,"));
        assert!(csv.contains("p100,1500"));
    }

    #[test]
    fn csv_escape_quotes_fields_with_commas() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    #[test]
    fn export_text_contains_sections() {
        let text = export_text(&make_report());
        assert!(text.starts_with("Summary"));
        assert!(text.contains("Percentiles"));
        assert!(text.contains("Response time distribution"));
        assert!(text.contains("Response codes"));
        assert!(text.contains("test_duration"));
        assert!(text.contains("1.50 seconds"));
    }

    #[test]
    fn export_text_lists_each_response_code() {
        let text = export_text(&make_report());
        assert!(text.contains("  200"));
        assert!(text.contains("  404"));
        assert!(text.contains("  500"));
    }
}
