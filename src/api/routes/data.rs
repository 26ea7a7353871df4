//! Data Route
//!
//! - GET /data - The cleaned dataset, one JSON object per row

use axum::{extract::State, Json};
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::dataset::Dataset;

/// Serializes the shared dataset's rows without cloning them
pub struct DatasetRows(Arc<Dataset>);

impl Serialize for DatasetRows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.records())
    }
}

/// GET /data
///
/// Rows in file order. Keys are the source columns in header order,
/// then `Age_Group` and `Age_Group_30`.
pub async fn get_data(State(state): State<Arc<AppState>>) -> Json<DatasetRows> {
    tracing::debug!(rows = state.dataset.len(), "Serving dataset");
    Json(DatasetRows(Arc::clone(&state.dataset)))
}
