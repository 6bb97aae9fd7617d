use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::JtlensError;

/// Percentile points reported in the percentile curve.
pub const DEFAULT_PERCENTILE_POINTS: [f64; 7] = [50.0, 75.0, 90.0, 95.0, 99.0, 99.9, 100.0];

/// Tunables for [`crate::engine::analyze`].
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AnalysisConfig {
    /// Target upper bound on points in each per-record series.
    pub max_data_points: usize,
    /// Width of the epoch-aligned time windows (ms).
    pub bucket_width_ms: i64,
    /// Outlier threshold is `mean + outlier_sigma * stddev`.
    pub outlier_sigma: f64,
    pub percentile_points: Vec<f64>,
    /// Emit all six distribution buckets, including those with no records.
    pub include_empty_buckets: bool,
    /// Reject records violating `connect_time <= latency <= elapsed`.
    pub strict_timings: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_data_points: 300,
            bucket_width_ms: 1000,
            outlier_sigma: 2.0,
            percentile_points: DEFAULT_PERCENTILE_POINTS.to_vec(),
            include_empty_buckets: true,
            strict_timings: true,
        }
    }
}

impl AnalysisConfig {
    /// Check every field is within range; returns the first problem found.
    pub fn validate(&self) -> Result<(), JtlensError> {
        if self.max_data_points == 0 {
            return Err(JtlensError::Validation(
                "max_data_points must be at least 1".to_string(),
            ));
        }
        if self.bucket_width_ms <= 0 {
            return Err(JtlensError::Validation(format!(
                "bucket_width_ms must be positive (got {})",
                self.bucket_width_ms
            )));
        }
        if !self.outlier_sigma.is_finite() || self.outlier_sigma < 0.0 {
            return Err(JtlensError::Validation(format!(
                "outlier_sigma must be a non-negative number (got {})",
                self.outlier_sigma
            )));
        }
        if let Some(p) = self
            .percentile_points
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(JtlensError::Validation(format!(
                "percentile point {p} is outside 0..=100"
            )));
        }
        Ok(())
    }
}

/// Read an [`AnalysisConfig`] from a JSON file and validate it.
pub async fn read_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, JtlensError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let config: AnalysisConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
