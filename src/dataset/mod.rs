//! Dataset
//!
//! The cleaned obesity table held in memory for the lifetime of the server.
//!
//! ## Loading rules
//!
//! - The header must name `Height`, `Weight` and `Age`
//! - Repeated header names become `name.1`, `name.2`, ...
//! - Rows with a missing cell in any column are dropped
//! - Rows whose `Height`, `Weight` or `Age` is not numeric are dropped
//! - `Age_Group` and `Age_Group_30` are derived once, at load time

mod error;
mod loader;
mod stats;
mod types;

pub use error::{DatasetError, DatasetResult, StatsError};
pub use loader::Dataset;
pub use stats::{mean, median, quantile, sample_std, summarize, Summary};
pub use types::{
    AgeBand, AgeGroup, CellValue, Column, Record, UnknownColumn, AGE_GROUP_30_COLUMN,
    AGE_GROUP_COLUMN,
};
