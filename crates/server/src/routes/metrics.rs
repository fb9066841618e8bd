//! Live metrics for the results screen.

use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use hackvote_core::MetricsSnapshot;

use crate::error::Result;
use crate::services::MetricsAggregator;
use crate::state::AppState;

/// Aggregate a fresh metrics snapshot. Served at `/metrics` and `/results`.
#[instrument(skip_all)]
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<MetricsSnapshot>> {
    let snapshot = MetricsAggregator::new(state.store())
        .snapshot(Utc::now())
        .await?;
    Ok(Json(snapshot))
}
