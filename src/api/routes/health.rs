//! Health Routes
//!
//! - GET / - Liveness probe with a fixed acknowledgement
//! - GET /health - Dataset and uptime details

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, MessageResponse};
use crate::api::state::AppState;

/// Fixed acknowledgement returned by the liveness probe
pub const ROOT_MESSAGE: &str = "Obesity data API is working!";

/// GET /
///
/// Returns 200 while the process is serving, no dataset checks.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// GET /health
///
/// Full health status with dataset details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = &state.dataset;

    // An empty table still serves /data but every statistic will fail
    let status = if dataset.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        rows: dataset.len(),
        dropped_rows: dataset.dropped_rows(),
        columns: dataset.columns().to_vec(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::dataset::Dataset;

    #[tokio::test]
    async fn test_root() {
        let Json(body) = root().await;
        assert_eq!(body.message, ROOT_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_reports_empty_dataset_as_degraded() {
        let dataset = Dataset::from_csv_str("Height,Weight,Age\n,50,20").unwrap();
        let state = Arc::new(AppState::new(Arc::new(dataset), ApiConfig::default()));

        let Json(body) = full_health(State(state)).await;
        assert_eq!(body.status, "degraded");
        assert_eq!(body.rows, 0);
        assert_eq!(body.dropped_rows, 1);
        assert_eq!(body.columns, vec!["Height", "Weight", "Age"]);
    }
}
