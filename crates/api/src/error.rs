use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use jobrelay_pipeline::{PipelineFailure, Stage};

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the webhook error body
/// `{"status": "error", "stage": ..., "reason": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A run of the job-intake pipeline ended in a failed stage.
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Pipeline(failure) = self;

        // Validation is the caller's fault; everything else is an upstream
        // service failing on our behalf.
        let status = match failure.stage {
            Stage::Validate => StatusCode::BAD_REQUEST,
            Stage::Generate | Stage::Persist => StatusCode::BAD_GATEWAY,
        };

        let body = json!({
            "status": "error",
            "stage": failure.stage,
            "reason": failure.reason,
        });

        (status, axum::Json(body)).into_response()
    }
}
