use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::response::JobAccepted;
use crate::state::AppState;

/// POST /webhook/upwork-jobs
///
/// Runs one job posting through the pipeline. The body is handed over raw
/// so a malformed document fails at the validate stage rather than as
/// axum's own rejection.
pub async fn receive_job(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<JobAccepted>> {
    let outcome = state.pipeline.run_bytes(&body).await?;

    Ok(Json(JobAccepted::new(outcome.record_id, outcome.notified)))
}
