//! Descriptive statistics
//!
//! Mean, sample standard deviation, median and quantiles over plain `f64`
//! slices. Shared by the statistics endpoint and the dashboard charts.

use super::error::StatsError;
use super::loader::Dataset;
use super::types::Column;
use serde::{Deserialize, Serialize};

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between closest ranks
///
/// `q` is clamped to [0, 1]. NaN values sort last and should be filtered
/// out by the caller.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Compute mean, sample std and median, rejecting empty input and NaN results
pub fn summarize(column: &str, values: &[f64]) -> Result<Summary, StatsError> {
    let mean = mean(values).ok_or_else(|| StatsError::Empty(column.to_string()))?;
    let std = sample_std(values).ok_or_else(|| StatsError::InsufficientData {
        column: column.to_string(),
        found: values.len(),
    })?;
    let median = median(values).ok_or_else(|| StatsError::Empty(column.to_string()))?;

    for (statistic, value) in [("mean", mean), ("std", std), ("median", median)] {
        if !value.is_finite() {
            return Err(StatsError::NonFinite {
                column: column.to_string(),
                statistic: statistic.to_string(),
            });
        }
    }

    Ok(Summary { mean, std, median })
}

impl Dataset {
    /// Summary statistics over every value of an allowed column
    pub fn summarize(&self, column: Column) -> Result<Summary, StatsError> {
        summarize(column.as_str(), &self.values(column))
    }
}
