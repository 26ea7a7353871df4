//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

/// GET / response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /statistics request
///
/// The column stays a string here so an unknown name can be reported
/// by name instead of failing deserialization.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsRequest {
    pub column: String,
}

/// POST /statistics response
pub use crate::dataset::Summary as StatisticsResponse;

/// GET /health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when no rows survived cleaning
    pub status: String,
    /// Rows served by /data
    pub rows: usize,
    /// Rows removed while loading
    pub dropped_rows: usize,
    /// Source columns in header order
    pub columns: Vec<String>,
    /// Server uptime
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}
