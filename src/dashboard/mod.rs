//! Dashboard Client
//!
//! Pulls the dataset and statistics from the data service and turns them
//! into a report: the table, an optional statistics summary, and five charts.
//!
//! ## Flow
//!
//! 1. Fetch `/data` - any failure halts the dashboard
//! 2. Require a non-empty list of objects - otherwise halt
//! 3. Require Height, Age, Weight and Age_Group_30 - otherwise halt
//! 4. Table
//! 5. Statistics for the requested column - failures are shown, not fatal
//! 6. Charts - each one fails on its own

mod charts;
mod client;
mod report;
mod svg;
mod table;

pub use charts::{
    age_histogram, age_line, box_stats, gaussian_kde, height_weight_regression,
    height_weight_scatter, histogram, linear_fit, pearson_correlation, render_charts, weight_by_age_band, Bin,
    BoxPlot, BoxStats, Chart, ChartError, ChartPanel, Histogram, LinearFit, Regression,
    SeriesChart, HISTOGRAM_BINS,
};
pub use client::{ApiClient, ClientError, DataSource, StatisticsReply};
pub use report::{render_html, render_text};
pub use table::Table;

use thiserror::Error;

use crate::dataset::{Column, Summary, AGE_GROUP_30_COLUMN};

/// Columns the dashboard cannot do without
pub const REQUIRED_COLUMNS: [&str; 4] = ["Height", "Age", "Weight", AGE_GROUP_30_COLUMN];

/// Errors that stop the dashboard from rendering at all
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to fetch data from server: {0}")]
    Fetch(#[from] ClientError),

    #[error("Expected a list of records, got {0}")]
    NotAList(&'static str),

    #[error("Row {index} is a {kind}, expected an object")]
    RowNotObject { index: usize, kind: &'static str },

    #[error("The dataset is empty")]
    EmptyDataset,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Result of asking the server for one column's statistics
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticsOutcome {
    Summary { column: Column, summary: Summary },
    /// The server answered with an error message
    Rejected { column: Column, message: String },
    /// The request itself failed
    Failed { column: Column, message: String },
}

impl StatisticsOutcome {
    pub fn column(&self) -> Column {
        match self {
            StatisticsOutcome::Summary { column, .. }
            | StatisticsOutcome::Rejected { column, .. }
            | StatisticsOutcome::Failed { column, .. } => *column,
        }
    }
}

/// Everything a rendered dashboard shows
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub table: Table,
    pub statistics: Option<StatisticsOutcome>,
    pub charts: Vec<ChartPanel>,
}

/// Steps 1-3: fetch `/data` and validate it into a table
pub async fn load_table(source: &dyn DataSource) -> Result<Table, DashboardError> {
    let payload = source.fetch_data().await?;
    let table = Table::from_json(payload)?;

    let missing = table.missing_columns(&REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns(missing));
    }

    tracing::info!(
        rows = table.len(),
        columns = table.columns().len(),
        "Dataset fetched"
    );
    Ok(table)
}

/// Step 5: never fails, every outcome is something to display
pub async fn request_statistics(source: &dyn DataSource, column: Column) -> StatisticsOutcome {
    match source.fetch_statistics(column).await {
        Ok(StatisticsReply::Summary(summary)) => StatisticsOutcome::Summary { column, summary },
        Ok(StatisticsReply::Error(message)) => {
            tracing::warn!(column = %column, error = %message, "Server rejected statistics request");
            StatisticsOutcome::Rejected { column, message }
        }
        Err(e) => {
            tracing::warn!(column = %column, error = %e, "Statistics request failed");
            StatisticsOutcome::Failed {
                column,
                message: format!("Failed to fetch statistics: {}", e),
            }
        }
    }
}

/// Run the whole sequence. Only steps 1-3 can abort it.
pub async fn build(
    source: &dyn DataSource,
    column: Option<Column>,
) -> Result<Dashboard, DashboardError> {
    let table = load_table(source).await?;

    let statistics = match column {
        Some(column) => Some(request_statistics(source, column).await),
        None => None,
    };

    let charts = render_charts(&table);

    Ok(Dashboard {
        table,
        statistics,
        charts,
    })
}
