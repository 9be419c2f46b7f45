use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Inbound webhook routes.
///
/// ```text
/// POST /webhook/upwork-jobs      run one job through the pipeline
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook/upwork-jobs", post(webhook::receive_job))
}
