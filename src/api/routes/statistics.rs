//! Statistics Route
//!
//! - POST /statistics - Mean, standard deviation and median of one column

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{StatisticsRequest, StatisticsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::Column;

/// POST /statistics
///
/// The column must be one of Height, Age or Weight; anything else is a 404.
/// A column that cannot be summarised (no rows, a single row) is a 500.
/// A body the JSON extractor rejects keeps the extractor's status
/// (400 bad syntax, 422 missing or mistyped `column`, 415 no JSON content type).
pub async fn post_statistics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatisticsRequest>, JsonRejection>,
) -> ApiResult<Json<StatisticsResponse>> {
    let Json(req) = payload.map_err(ApiError::Validation)?;
    let column: Column = req.column.parse()?;

    let summary = state.dataset.summarize(column)?;

    tracing::info!(
        column = %column,
        mean = summary.mean,
        std = summary.std,
        median = summary.median,
        "Statistics computed"
    );

    Ok(Json(summary))
}
