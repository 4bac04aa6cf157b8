use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use catalog_model::JobId;

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// Poll a publish job. Read-only; the registry is the source of truth.
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let id = JobId(id);
    let job = state
        .jobs
        .get(id)
        .ok_or_else(|| AppError::not_found(format!("Job {id} not found")))?;
    Ok(Json(job))
}
