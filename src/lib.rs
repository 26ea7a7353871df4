//! # Obesity Dash
//!
//! A small data service and dashboard over an obesity survey dataset.
//!
//! ## Modules
//!
//! - [`dataset`]: CSV loading, row cleaning, derived age groups and summary statistics
//! - [`api`]: REST API server with Axum serving the cleaned rows and statistics
//! - [`dashboard`]: client that fetches from the API and renders tables and charts
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use obesity_dash::dataset::{Column, Dataset};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Dataset::load(Path::new("data/obesity_data.csv"))?;
//!     let summary = dataset.summarize(Column::Height)?;
//!
//!     println!(
//!         "Height: mean {:.2}, std {:.2}, median {:.2}",
//!         summary.mean, summary.std, summary.median
//!     );
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod logging;

// Re-export top-level types for convenience
pub use dataset::{
    AgeBand, AgeGroup, CellValue, Column, Dataset, DatasetError, Record, StatsError, Summary,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use dashboard::{ApiClient, ClientError, Dashboard, DashboardError, DataSource};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, DatasetConfig, LoggingConfig};
