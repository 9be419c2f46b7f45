//! Pipeline Orchestrator.
//!
//! Sequences one webhook run through its states:
//!
//! ```text
//! received -> validated -> generated -> built -> stored -> notified
//!     \           \             \                  \
//!      `-----------`-------------`------------------`--> failed(stage, reason)
//! ```
//!
//! Validation, generation and persistence failures end the run and are
//! reported with their stage. A notification failure does not: the record
//! is already durable, so the run succeeds with `notified = false`.
//!
//! Every outbound call is bounded by [`PipelineSettings::call_timeout`]. A
//! call that runs over fails its own stage; the run is never cut short from
//! outside.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use jobrelay_core::capability::{MessagePoster, RecordStore, TextGenerator};
use jobrelay_core::error::{GenerationError, NotificationError, PersistenceError, ValidationError};
use jobrelay_core::job::{parse_body, validate_payload};
use jobrelay_core::proposal::DEFAULT_MAX_OUTPUT_TOKENS;
use jobrelay_core::record::{JobRecord, JobStatus};

use crate::generator::ProposalGenerator;
use crate::notifier::Notifier;
use crate::persistence::PersistenceClient;

/// Default bound on a single outbound call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// States and failures
// ---------------------------------------------------------------------------

/// Progress of a single run, used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Received,
    Validated,
    Generated,
    Built,
    Stored,
    Notified,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Generated => "generated",
            Self::Built => "built",
            Self::Stored => "stored",
            Self::Notified => "notified",
        })
    }
}

/// Stage at which a run failed fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validate,
    Generate,
    Persist,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Generate => "generate",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of a run: the stage and the component's own reason.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{stage} failed: {reason}")]
pub struct PipelineFailure {
    pub stage: Stage,
    pub reason: String,
    /// The record in its `failed` state, when the run got far enough to
    /// build one.
    pub record: Option<Box<JobRecord>>,
}

impl PipelineFailure {
    pub fn new(stage: Stage, err: impl fmt::Display) -> Self {
        Self {
            stage,
            reason: err.to_string(),
            record: None,
        }
    }

    fn with_record(mut self, record: JobRecord) -> Self {
        self.record = Some(Box::new(record));
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub record_id: String,
    /// `false` when the channel post failed; the record is stored regardless.
    pub notified: bool,
    pub record: JobRecord,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Messaging channel that receives job summaries.
    pub channel: String,
    /// Output cap for proposal generation.
    pub max_output_tokens: u32,
    /// Request a match score for every job.
    pub scoring_enabled: bool,
    /// Bound on each outbound call.
    pub call_timeout: Duration,
}

impl PipelineSettings {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            scoring_enabled: false,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Most outbound calls one run can make: generate, create, post and
    /// status patch, plus the score request when scoring is on.
    pub fn outbound_calls(&self) -> u32 {
        if self.scoring_enabled {
            5
        } else {
            4
        }
    }

    /// Longest a run can spend waiting on outbound services.
    pub fn run_budget(&self) -> Duration {
        self.call_timeout.saturating_mul(self.outbound_calls())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The job-intake pipeline. Holds no per-run state; share behind `Arc` and
/// call [`Pipeline::run`] concurrently.
pub struct Pipeline {
    generator: ProposalGenerator,
    persistence: PersistenceClient,
    notifier: Notifier,
    scoring_enabled: bool,
    call_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        store: Arc<dyn RecordStore>,
        poster: Arc<dyn MessagePoster>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            generator: ProposalGenerator::new(text, settings.max_output_tokens),
            persistence: PersistenceClient::new(store),
            notifier: Notifier::new(poster, settings.channel),
            scoring_enabled: settings.scoring_enabled,
            call_timeout: settings.call_timeout,
        }
    }

    /// Process one inbound job payload end to end.
    pub async fn run(&self, raw: &Value) -> Result<PipelineOutcome, PipelineFailure> {
        async {
            tracing::debug!(state = %RunState::Received, "Job webhook received");
            self.run_stages(raw).await
        }
        .instrument(run_span())
        .await
    }

    /// Process a raw request body. A body that is not JSON fails at the
    /// validate stage like any other invalid payload.
    pub async fn run_bytes(&self, body: &[u8]) -> Result<PipelineOutcome, PipelineFailure> {
        async {
            tracing::debug!(state = %RunState::Received, bytes = body.len(), "Job webhook received");
            let raw = parse_body(body).map_err(rejected)?;
            self.run_stages(&raw).await
        }
        .instrument(run_span())
        .await
    }

    async fn run_stages(&self, raw: &Value) -> Result<PipelineOutcome, PipelineFailure> {
        let job = validate_payload(raw).map_err(rejected)?;
        tracing::Span::current().record("source_id", job.source_id.as_str());
        tracing::info!(state = %RunState::Validated, title = %job.title, "Job payload validated");

        let draft = bounded(self.call_timeout, self.generator.generate(&job), |limit| {
            GenerationError::Timeout(format!("no reply within {limit:?}"))
        })
        .await
        .map_err(|e| {
            tracing::error!(stage = %Stage::Generate, error = %e, "Proposal generation failed");
            PipelineFailure::new(Stage::Generate, e)
        })?;
        tracing::info!(
            state = %RunState::Generated,
            proposal_len = draft.text().len(),
            "Proposal generated",
        );

        let score = if self.scoring_enabled {
            tokio::time::timeout(self.call_timeout, self.generator.score(&job))
                .await
                .unwrap_or_else(|_| {
                    tracing::warn!(limit = ?self.call_timeout, "Job scoring timed out");
                    None
                })
        } else {
            None
        };

        let mut record = JobRecord::build(job, &draft);
        record.score = score;
        tracing::debug!(state = %RunState::Built, status = %record.status, "Job record built");

        let stored = bounded(self.call_timeout, self.persistence.store(&mut record), |limit| {
            PersistenceError::Network(format!("no response within {limit:?}"))
        })
        .await;
        let record_id = match stored {
            Ok(id) => id,
            Err(e) => {
                // No retry queue: the generated proposal is dropped here.
                record.fail(format!("{}: {e}", Stage::Persist));
                tracing::error!(
                    stage = %Stage::Persist,
                    status = %record.status,
                    error = %e,
                    "Job record write failed",
                );
                return Err(PipelineFailure::new(Stage::Persist, e).with_record(record));
            }
        };
        tracing::info!(state = %RunState::Stored, record_id = %record_id, "Job persisted");

        let posted = bounded(self.call_timeout, self.notifier.notify(&record), |limit| {
            NotificationError::Transport(format!("no response within {limit:?}"))
        })
        .await;
        let notified = match posted {
            Ok(message) => {
                record.status = JobStatus::Notified;
                tracing::info!(
                    state = %RunState::Notified,
                    channel = %message.channel,
                    "Job summary posted",
                );
                let patched =
                    bounded(self.call_timeout, self.persistence.mark_notified(&record), |limit| {
                        PersistenceError::Network(format!("no response within {limit:?}"))
                    })
                    .await;
                if let Err(e) = patched {
                    tracing::warn!(record_id = %record_id, error = %e, "Failed to mark record notified");
                }
                true
            }
            Err(e) => {
                tracing::warn!(
                    channel = %self.notifier.channel(),
                    error = %e,
                    "Job summary not posted; record remains stored",
                );
                false
            }
        };

        Ok(PipelineOutcome {
            record_id,
            notified,
            record,
        })
    }
}

fn run_span() -> tracing::Span {
    tracing::info_span!(
        "job_run",
        run_id = %Uuid::new_v4(),
        source_id = tracing::field::Empty,
    )
}

fn rejected(err: ValidationError) -> PipelineFailure {
    tracing::warn!(stage = %Stage::Validate, error = %err, "Rejected job payload");
    PipelineFailure::new(Stage::Validate, err)
}

/// Await an outbound call, turning an overrun of `limit` into that call's
/// own error.
async fn bounded<T, E>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
    elapsed: impl FnOnce(Duration) -> E,
) -> Result<T, E> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or_else(|_| Err(elapsed(limit)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
