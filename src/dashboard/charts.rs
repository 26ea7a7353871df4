//! Chart Models
//!
//! The five fixed dashboard charts, computed from a `Table`. Each builder
//! checks its own columns so one failing chart never blocks the others.

use serde::Serialize;
use thiserror::Error;

use super::table::Table;
use crate::dataset::{quantile, sample_std, AGE_GROUP_30_COLUMN};

/// Bins used by the Age histogram
pub const HISTOGRAM_BINS: usize = 20;

/// Points sampled along the density overlay
const KDE_POINTS: usize = 200;

/// Why a single chart could not be drawn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no usable values in column(s): {0}")]
    NoData(String),

    #[error("{0}")]
    Degenerate(String),
}

/// A fully computed chart, ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line(SeriesChart),
    Scatter(SeriesChart),
    Histogram(Histogram),
    BoxPlot(BoxPlot),
    Regression(Regression),
}

impl Chart {
    pub fn x_label(&self) -> &str {
        match self {
            Chart::Line(c) | Chart::Scatter(c) => &c.x_label,
            Chart::Histogram(h) => &h.x_label,
            Chart::BoxPlot(b) => &b.x_label,
            Chart::Regression(r) => &r.x_label,
        }
    }

    pub fn y_label(&self) -> &str {
        match self {
            Chart::Line(c) | Chart::Scatter(c) => &c.y_label,
            Chart::Histogram(_) => "Frequency",
            Chart::BoxPlot(b) => &b.y_label,
            Chart::Regression(r) => &r.y_label,
        }
    }
}

/// Points for a line or scatter plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesChart {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

/// One histogram bar, closed on the left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub x_label: String,
    pub bins: Vec<Bin>,
    /// Density estimate scaled to bar counts; empty when it cannot be estimated
    pub density: Vec<(f64, f64)>,
}

/// Five-number summary of one box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<BoxStats>,
}

/// Least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regression {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub fit: LinearFit,
    /// Pearson correlation coefficient
    pub correlation: f64,
}

/// One slot of the dashboard: a chart or the reason it is missing
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub title: &'static str,
    pub result: Result<Chart, ChartError>,
}

/// Build all five charts; failures are logged and kept per panel
pub fn render_charts(table: &Table) -> Vec<ChartPanel> {
    let panels = vec![
        ChartPanel {
            title: "Line Plot of Age",
            result: age_line(table),
        },
        ChartPanel {
            title: "Scatter Plot of Height vs. Weight",
            result: height_weight_scatter(table),
        },
        ChartPanel {
            title: "Histogram of Age",
            result: age_histogram(table),
        },
        ChartPanel {
            title: "Box Plot of Weight by Age Group (Under 30 vs. 30 and Above)",
            result: weight_by_age_band(table),
        },
        ChartPanel {
            title: "Height vs. Weight Linear Relationship",
            result: height_weight_regression(table),
        },
    ];

    for panel in &panels {
        if let Err(e) = &panel.result {
            tracing::warn!(chart = panel.title, error = %e, "Chart skipped");
        }
    }

    panels
}

fn require(table: &Table, columns: &[&str]) -> Result<(), ChartError> {
    let missing = table.missing_columns(columns);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChartError::MissingColumns(missing))
    }
}

/// Rows where both columns are numeric
fn numeric_pairs(table: &Table, x: &str, y: &str) -> Vec<(f64, f64)> {
    table
        .numeric(x)
        .into_iter()
        .zip(table.numeric(y))
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
        .collect()
}

/// Age by row index
pub fn age_line(table: &Table) -> Result<Chart, ChartError> {
    require(table, &["Age"])?;

    let points: Vec<(f64, f64)> = table
        .numeric("Age")
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|age| (i as f64, age)))
        .collect();

    if points.is_empty() {
        return Err(ChartError::NoData("Age".to_string()));
    }

    Ok(Chart::Line(SeriesChart {
        x_label: "Index".to_string(),
        y_label: "Age".to_string(),
        points,
    }))
}

/// Height against Weight
pub fn height_weight_scatter(table: &Table) -> Result<Chart, ChartError> {
    require(table, &["Height", "Weight"])?;

    let points = numeric_pairs(table, "Height", "Weight");
    if points.is_empty() {
        return Err(ChartError::NoData("Height, Weight".to_string()));
    }

    Ok(Chart::Scatter(SeriesChart {
        x_label: "Height".to_string(),
        y_label: "Weight".to_string(),
        points,
    }))
}

/// Distribution of Age with a density overlay
pub fn age_histogram(table: &Table) -> Result<Chart, ChartError> {
    require(table, &["Age"])?;

    let ages: Vec<f64> = table.numeric("Age").into_iter().flatten().collect();
    if ages.is_empty() {
        return Err(ChartError::NoData("Age".to_string()));
    }

    let bins = histogram(&ages, HISTOGRAM_BINS);
    let bin_width = bins.first().map(|b| b.end - b.start).unwrap_or(1.0);
    let (lo, hi) = (bins[0].start, bins[bins.len() - 1].end);

    // Scale density to counts so the curve sits on the bars
    let scale = ages.len() as f64 * bin_width;
    let density = gaussian_kde(&ages, lo, hi, KDE_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    Ok(Chart::Histogram(Histogram {
        x_label: "Age".to_string(),
        bins,
        density,
    }))
}

/// Weight grouped by the Under 30 / 30 and Above split
pub fn weight_by_age_band(table: &Table) -> Result<Chart, ChartError> {
    require(table, &[AGE_GROUP_30_COLUMN, "Weight"])?;

    let mut grouped: Vec<(String, Vec<f64>)> = Vec::new();
    for (label, weight) in table
        .text(AGE_GROUP_30_COLUMN)
        .into_iter()
        .zip(table.numeric("Weight"))
    {
        let (Some(label), Some(weight)) = (label, weight) else {
            continue;
        };
        match grouped.iter_mut().find(|(l, _)| *l == label) {
            Some((_, values)) => values.push(weight),
            None => grouped.push((label, vec![weight])),
        }
    }

    if grouped.is_empty() {
        return Err(ChartError::NoData(format!("{}, Weight", AGE_GROUP_30_COLUMN)));
    }

    let groups = grouped
        .into_iter()
        .filter_map(|(label, values)| box_stats(label, &values))
        .collect();

    Ok(Chart::BoxPlot(BoxPlot {
        x_label: "Age Group".to_string(),
        y_label: "Weight".to_string(),
        groups,
    }))
}

/// Height against Weight with a fitted line and Pearson r
pub fn height_weight_regression(table: &Table) -> Result<Chart, ChartError> {
    require(table, &["Height", "Weight"])?;

    let points = numeric_pairs(table, "Height", "Weight");
    if points.is_empty() {
        return Err(ChartError::NoData("Height, Weight".to_string()));
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();

    let fit = linear_fit(&xs, &ys).ok_or_else(|| {
        ChartError::Degenerate("cannot fit a line: Height needs at least two distinct values".to_string())
    })?;

    let correlation = pearson_correlation(&xs, &ys).ok_or_else(|| {
        ChartError::Degenerate("correlation undefined: Height or Weight is constant".to_string())
    })?;

    Ok(Chart::Regression(Regression {
        x_label: "Height".to_string(),
        y_label: "Weight".to_string(),
        points,
        fit,
        correlation,
    }))
}

/// Equal-width bins over [min, max]; the last bin includes max.
/// A single distinct value is widened to [v - 0.5, v + 0.5].
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

/// Gaussian kernel density over [lo, hi] with Scott's rule bandwidth
///
/// Returns an empty curve when the bandwidth is zero (fewer than two values
/// or no spread).
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
    let Some(std) = sample_std(values) else {
        return Vec::new();
    };
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    if !(bandwidth > 0.0) || points < 2 {
        return Vec::new();
    }

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let sum: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}

/// Quartiles, 1.5 IQR whiskers and outliers of one group
pub fn box_stats(label: impl Into<String>, values: &[f64]) -> Option<BoxStats> {
    let q1 = quantile(values, 0.25)?;
    let median = quantile(values, 0.5)?;
    let q3 = quantile(values, 0.75)?;

    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside = values.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let whisker_low = inside.clone().fold(f64::INFINITY, f64::min);
    let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max);

    let mut outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();
    outliers.sort_by(|a, b| a.total_cmp(b));

    Some(BoxStats {
        label: label.into(),
        count: values.len(),
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Ordinary least squares, `None` when x has no spread
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|a| (a - mean_x).powi(2)).sum();
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mean_x) * (b - mean_y)).sum();

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Calculate Pearson correlation coefficient
///
/// Returns a value between -1 and 1, or `None` when either side is constant
/// or the inputs are empty or of different lengths.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }

    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        None
    } else {
        Some((numerator / denominator).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> Table {
        Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0, "Age": 20.0, "Age_Group_30": "Under 30"},
            {"Height": 160.0, "Weight": 60.0, "Age": 35.0, "Age_Group_30": "30 and Above"},
            {"Height": 170.0, "Weight": 70.0, "Age": 40.0, "Age_Group_30": "30 and Above"},
            {"Height": 180.0, "Weight": 85.0, "Age": 25.0, "Age_Group_30": "Under 30"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_all_charts_render() {
        let panels = render_charts(&sample_table());
        assert_eq!(panels.len(), 5);
        assert!(panels.iter().all(|p| p.result.is_ok()));
    }

    #[test]
    fn test_missing_column_only_affects_its_chart() {
        let table = Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0, "Age": 20.0},
            {"Height": 160.0, "Weight": 62.0, "Age": 35.0}
        ]))
        .unwrap();

        let panels = render_charts(&table);
        let failed: Vec<&str> = panels
            .iter()
            .filter(|p| p.result.is_err())
            .map(|p| p.title)
            .collect();

        assert_eq!(
            failed,
            vec!["Box Plot of Weight by Age Group (Under 30 vs. 30 and Above)"]
        );
        assert_eq!(
            panels[3].result.as_ref().unwrap_err(),
            &ChartError::MissingColumns(vec!["Age_Group_30".to_string()])
        );
    }

    #[test]
    fn test_age_line_keeps_row_index() {
        let table = Table::from_json(json!([
            {"Age": 20.0}, {"Age": null}, {"Age": 40.0}
        ]))
        .unwrap();

        let Chart::Line(line) = age_line(&table).unwrap() else {
            panic!("expected a line chart");
        };
        assert_eq!(line.points, vec![(0.0, 20.0), (2.0, 40.0)]);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram(&values, HISTOGRAM_BINS);

        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[19].end, 99.0);
        // max lands in the last, closed bin
        assert_eq!(bins[19].count, 5);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[42.0, 42.0], 20);
        assert_eq!(bins[0].start, 41.5);
        assert_eq!(bins[19].end, 42.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let curve = gaussian_kde(&values, -20.0, 30.0, 501);
        let step = 50.0 / 500.0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area was {}", area);
    }

    #[test]
    fn test_kde_empty_without_spread() {
        assert!(gaussian_kde(&[3.0, 3.0, 3.0], 0.0, 5.0, 10).is_empty());
        assert!(gaussian_kde(&[3.0], 0.0, 5.0, 10).is_empty());
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let stats = box_stats("Under 30", &[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();

        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_groups_in_appearance_order() {
        let Chart::BoxPlot(plot) = weight_by_age_band(&sample_table()).unwrap() else {
            panic!("expected a box plot");
        };
        let labels: Vec<&str> = plot.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Under 30", "30 and Above"]);
        assert_eq!(plot.groups[0].count, 2);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.at(10.0) - 21.0).abs() < 1e-9);

        assert_eq!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]), None);
    }

    #[test]
    fn test_pearson_correlation_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let r = pearson_correlation(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pearson_correlation_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        let r = pearson_correlation(&x, &y).unwrap();
        assert!((r + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pearson_correlation_undefined() {
        assert_eq!(pearson_correlation(&[], &[]), None);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[5.0, 5.0]), None);
    }

    #[test]
    fn test_regression_on_constant_height_is_isolated() {
        let table = Table::from_json(json!([
            {"Height": 150.0, "Weight": 50.0, "Age": 20.0, "Age_Group_30": "Under 30"},
            {"Height": 150.0, "Weight": 60.0, "Age": 35.0, "Age_Group_30": "30 and Above"}
        ]))
        .unwrap();

        let panels = render_charts(&table);
        assert!(matches!(panels[4].result, Err(ChartError::Degenerate(_))));
        assert!(panels[..4].iter().all(|p| p.result.is_ok()));
    }
}
