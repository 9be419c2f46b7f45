//! Error kinds produced by the job-intake pipeline stages.
//!
//! Each stage has its own error type so the orchestrator can report the
//! stage that failed together with the reason, verbatim.

/// The inbound payload is malformed. Client-caused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field (`body` when the payload itself is wrong).
    pub field: String,
    /// Human-readable description of the defect.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The generative text service failed or returned nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("empty response")]
    EmptyResponse,

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Writing to (or updating) the tabular store failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
}

/// Posting to the messaging channel failed. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The messaging API accepted the request but refused it (e.g. `channel_not_found`).
    #[error("rejected by messaging service: {0}")]
    Rejected(String),

    #[error("messaging service returned HTTP {0}")]
    Http(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
