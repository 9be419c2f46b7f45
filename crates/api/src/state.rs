use std::sync::Arc;

use jobrelay_pipeline::Pipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). It carries no
/// per-run data; each webhook run owns its own entities.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, read once at startup.
    pub config: Arc<ServerConfig>,
    /// The job-intake pipeline wired to its outbound services.
    pub pipeline: Arc<Pipeline>,
}
