//! Saved result endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{ProgressEntry, ProgressListResponse};
use crate::routes::auth::AuthenticatedPlayer;
use crate::AppState;

/// GET /api/progress
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
) -> Result<Json<ProgressListResponse>> {
    let records = state.db.get_progress(auth.player_id).await?;
    Ok(Json(ProgressListResponse {
        records: records.iter().map(|r| r.to_api_entry()).collect(),
    }))
}

/// GET /api/progress/:activity
pub async fn get_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
    Path(activity): Path<String>,
) -> Result<Json<ProgressEntry>> {
    let record = state
        .db
        .get_activity_progress(auth.player_id, &activity)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No saved result for '{}'", activity)))?;
    Ok(Json(record.to_api_entry()))
}
