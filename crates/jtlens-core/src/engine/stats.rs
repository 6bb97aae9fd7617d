use crate::record::RequestRecord;
use crate::results::PercentilePoint;

// ---------------------------------------------------------------------------
// ElapsedStats — shared primitives over the elapsed field
// ---------------------------------------------------------------------------

/// Elapsed-time statistics computed once per analysis and shared by the
/// summary, percentile and outlier passes.
#[derive(Debug, Clone)]
pub struct ElapsedStats {
    /// Elapsed values in ascending order.
    sorted: Vec<u64>,
    mean: f64,
    std_dev: f64,
}

impl ElapsedStats {
    /// Sort the elapsed values and accumulate sum and sum of squares in a
    /// single traversal.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RequestRecord>) -> Self {
        let mut sorted = Vec::new();
        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        for r in records {
            let v = r.elapsed as f64;
            sum += v;
            sum_sq += v * v;
            sorted.push(r.elapsed);
        }
        sorted.sort_unstable();

        let n = sorted.len();
        if n == 0 {
            return Self {
                sorted,
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let mean = sum / n as f64;
        // Rounding can push the variance a hair below zero for constant input.
        let variance = (sum_sq / n as f64 - mean * mean).max(0.0);

        Self {
            sorted,
            mean,
            std_dev: variance.sqrt(),
        }
    }

    pub fn count(&self) -> usize {
        self.sorted.len()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn min(&self) -> u64 {
        self.sorted.first().copied().unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.sorted.last().copied().unwrap_or(0)
    }

    /// Nearest-rank percentile: the value at index `floor(n * p / 100)`,
    /// clamped to `n - 1`. Percentile 100 is therefore always the maximum.
    ///
    /// Returns 0 when there are no values.
    pub fn percentile(&self, p: f64) -> u64 {
        let n = self.sorted.len();
        if n == 0 {
            return 0;
        }
        let idx = (n as f64 * (p / 100.0)).floor() as usize;
        self.sorted[idx.min(n - 1)]
    }

    /// Value at index `floor(n / 2)`; for even `n` this is the upper of the
    /// two middle values rather than their average.
    pub fn median(&self) -> u64 {
        self.sorted.get(self.sorted.len() / 2).copied().unwrap_or(0)
    }

    pub fn percentile_curve(&self, points: &[f64]) -> Vec<PercentilePoint> {
        points
            .iter()
            .map(|&percentile| PercentilePoint {
                percentile,
                value: self.percentile(percentile),
            })
            .collect()
    }
}

/// Arithmetic mean of `values`, or 0 when empty.
pub fn mean_of(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `100 * part / whole`, or 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
