//! In-memory substitutes for the outbound services.
//!
//! Each fake records every call so tests can assert on how many outbound
//! requests a run made and with what content.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use jobrelay_core::capability::{MessagePoster, RecordStore, TextGenerator};
use jobrelay_core::error::{GenerationError, NotificationError, PersistenceError};
use jobrelay_core::proposal::GenerationRequest;
use jobrelay_core::record::JobStatus;
use jobrelay_core::scoring::SCORING_SYSTEM_MESSAGE;
use jobrelay_pipeline::{Pipeline, PipelineSettings};

pub const CHANNEL: &str = "C0JOBS";
pub const PROPOSAL_TEXT: &str = "Hello, I have built many scrapers in Python and can start today.";

// ---------------------------------------------------------------------------
// Text generator
// ---------------------------------------------------------------------------

pub struct FakeGenerator {
    reply: Result<String, GenerationError>,
    score_reply: Result<String, GenerationError>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_result(Ok(text.to_string()))
    }

    pub fn with_result(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            score_reply: Ok("72".to_string()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_score_reply(mut self, reply: Result<String, GenerationError>) -> Self {
        self.score_reply = reply;
        self
    }

    /// Answer every request only after `delay`.
    pub fn slowed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn proposal_requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.system != SCORING_SYSTEM_MESSAGE)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if request.system == SCORING_SYSTEM_MESSAGE {
            self.score_reply.clone()
        } else {
            self.reply.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStore {
    create_error: Option<PersistenceError>,
    update_error: Option<PersistenceError>,
    delay: Option<Duration>,
    pub rows: Mutex<Vec<(String, Map<String, Value>)>>,
    pub status_updates: Mutex<Vec<(String, JobStatus)>>,
}

impl FakeStore {
    pub fn failing(err: PersistenceError) -> Self {
        Self {
            create_error: Some(err),
            ..Self::default()
        }
    }

    pub fn failing_updates(err: PersistenceError) -> Self {
        Self {
            update_error: Some(err),
            ..Self::default()
        }
    }

    /// Answer row creation only after `delay`.
    pub fn slowed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn row(&self, index: usize) -> (String, Map<String, Value>) {
        self.rows.lock().unwrap()[index].clone()
    }

    /// Current status of a row, with status patches applied.
    pub fn status_of(&self, id: &str) -> Option<Value> {
        let patched = self
            .status_updates
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, status)| json!(status.as_str()));
        patched.or_else(|| {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|(row_id, _)| row_id == id)
                .map(|(_, fields)| fields["Status"].clone())
        })
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn create(&self, fields: Map<String, Value>) -> Result<String, PersistenceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        let mut rows = self.rows.lock().unwrap();
        let id = format!("rec{:04}", rows.len() + 1);
        rows.push((id.clone(), fields));
        Ok(id)
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: JobStatus,
    ) -> Result<(), PersistenceError> {
        if let Some(err) = &self.update_error {
            return Err(err.clone());
        }
        self.status_updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), status));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message poster
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakePoster {
    error: Option<NotificationError>,
    delay: Option<Duration>,
    pub posts: Mutex<Vec<(String, String)>>,
}

impl FakePoster {
    pub fn failing(err: NotificationError) -> Self {
        Self {
            error: Some(err),
            ..Self::default()
        }
    }

    /// Answer every post only after `delay`.
    pub fn slowed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl MessagePoster for FakePoster {
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        self.posts
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub generator: Arc<FakeGenerator>,
    pub store: Arc<FakeStore>,
    pub poster: Arc<FakePoster>,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn new(generator: FakeGenerator, store: FakeStore, poster: FakePoster) -> Self {
        Self::with_settings(generator, store, poster, PipelineSettings::new(CHANNEL))
    }

    pub fn with_settings(
        generator: FakeGenerator,
        store: FakeStore,
        poster: FakePoster,
        settings: PipelineSettings,
    ) -> Self {
        let generator = Arc::new(generator);
        let store = Arc::new(store);
        let poster = Arc::new(poster);
        let pipeline = Pipeline::new(generator.clone(), store.clone(), poster.clone(), settings);
        Self {
            generator,
            store,
            poster,
            pipeline,
        }
    }

    /// All services succeed.
    pub fn healthy() -> Self {
        Self::new(
            FakeGenerator::replying(PROPOSAL_TEXT),
            FakeStore::default(),
            FakePoster::default(),
        )
    }

    pub fn outbound_calls(&self) -> usize {
        self.generator.calls() + self.store.row_count() + self.poster.calls()
    }
}

/// The reference job payload.
pub fn scraper_job() -> Value {
    json!({
        "title": "Build a scraper",
        "description": "Need Python scraper for site X",
        "budget": 500,
        "skills": ["python", "scraping"],
        "source_id": "job-123"
    })
}
