//! Narrow interfaces to the three outbound services.
//!
//! The pipeline depends only on these traits; the HTTP clients in
//! `jobrelay-clients` implement them, and tests substitute in-memory fakes.
//! Implementations must be safe to share across concurrent runs.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{GenerationError, NotificationError, PersistenceError};
use crate::proposal::GenerationRequest;
use crate::record::JobStatus;

/// Generative text service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the raw generated text. May be empty; callers decide what
    /// empty means.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Tabular store holding job records as rows of named fields.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a new row and return its store-assigned identifier.
    async fn create(&self, fields: Map<String, Value>) -> Result<String, PersistenceError>;

    /// Overwrite the status column of an existing row.
    async fn update_status(&self, record_id: &str, status: JobStatus)
        -> Result<(), PersistenceError>;
}

/// Team messaging channel.
#[async_trait]
pub trait MessagePoster: Send + Sync {
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotificationError>;
}
