use serde::{Deserialize, Serialize};

use crate::error::JtlensError;

/// One executed request as logged by the load generator.
///
/// All durations are milliseconds. `timestamp` is the request start time in
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestRecord {
    pub timestamp: i64,
    /// Total round-trip time.
    pub elapsed: u64,
    /// Logical request name.
    pub label: String,
    pub response_code: u16,
    pub success: bool,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub active_threads_in_group: u32,
    pub active_threads_total: u32,
    /// Time to first byte.
    pub latency: u64,
    /// Connection establishment time.
    pub connect_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub idle_time: u64,
}

impl RequestRecord {
    /// Build a record with the given start time and elapsed time; every
    /// other field is zeroed and the request is marked successful with 200.
    pub fn new(timestamp: i64, elapsed: u64) -> Self {
        Self {
            timestamp,
            elapsed,
            label: String::new(),
            response_code: 200,
            success: true,
            bytes_received: 0,
            bytes_sent: 0,
            active_threads_in_group: 0,
            active_threads_total: 0,
            latency: 0,
            connect_time: 0,
            url: None,
            idle_time: 0,
        }
    }

    /// Check `connect_time <= latency <= elapsed`.
    ///
    /// `row` is only used to locate the record in the returned error.
    pub fn check_timings(&self, row: usize) -> Result<(), JtlensError> {
        if self.latency > self.elapsed {
            return Err(JtlensError::malformed(
                row,
                "latency",
                format!(
                    "exceeds elapsed ({} ms > {} ms)",
                    self.latency, self.elapsed
                ),
            ));
        }
        if self.connect_time > self.latency {
            return Err(JtlensError::malformed(
                row,
                "connect_time",
                format!(
                    "exceeds latency ({} ms > {} ms)",
                    self.connect_time, self.latency
                ),
            ));
        }
        Ok(())
    }

    /// Response bytes plus request bytes, saturating at `u64::MAX`.
    pub fn total_bytes(&self) -> u64 {
        self.bytes_received.saturating_add(self.bytes_sent)
    }

    /// Whether the response code is below the HTTP client-error range.
    pub fn is_successful_response(&self) -> bool {
        self.response_code < 400
    }
}
