#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use jobrelay_api::config::ServerConfig;
use jobrelay_api::router::build_app_router;
use jobrelay_api::state::AppState;
use jobrelay_core::capability::{MessagePoster, RecordStore, TextGenerator};
use jobrelay_core::error::{GenerationError, NotificationError, PersistenceError};
use jobrelay_core::proposal::GenerationRequest;
use jobrelay_core::record::JobStatus;
use jobrelay_pipeline::Pipeline;

pub const PROPOSAL_TEXT: &str = "Hello, I have built many scrapers in Python and can start today.";

/// Build a test `ServerConfig` with placeholder credentials and default
/// limits.
pub fn test_config() -> ServerConfig {
    test_config_with(&[])
}

/// Like [`test_config`], with some variables overridden.
pub fn test_config_with(overrides: &[(&'static str, &'static str)]) -> ServerConfig {
    let mut vars = HashMap::from([
        ("HOST", "127.0.0.1"),
        ("PORT", "0"),
        ("OPENAI_API_KEY", "sk-test"),
        ("AIRTABLE_API_KEY", "pat-test"),
        ("AIRTABLE_BASE_ID", "appBASE"),
        ("AIRTABLE_TABLE_ID", "tblJOBS"),
        ("SLACK_BOT_TOKEN", "xoxb-test"),
        ("SLACK_CHANNEL_ID", "C0JOBS"),
    ]);
    vars.extend(overrides.iter().copied());
    let lookup = |key: &str| vars.get(key).map(|v| v.to_string());
    ServerConfig::from_lookup(&lookup).unwrap()
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

pub struct FakeGenerator {
    reply: Result<String, GenerationError>,
    pub calls: Mutex<usize>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_result(Ok(text.to_string()))
    }

    pub fn with_result(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone()
    }
}

#[derive(Default)]
pub struct FakeStore {
    error: Option<PersistenceError>,
    pub rows: Mutex<Vec<Map<String, Value>>>,
}

impl FakeStore {
    pub fn failing(err: PersistenceError) -> Self {
        Self {
            error: Some(err),
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn create(&self, fields: Map<String, Value>) -> Result<String, PersistenceError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(fields);
        Ok(format!("rec{:04}", rows.len()))
    }

    async fn update_status(&self, _id: &str, _status: JobStatus) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePoster {
    error: Option<NotificationError>,
    delay: Option<Duration>,
    pub posts: Mutex<Vec<String>>,
}

impl FakePoster {
    pub fn failing(err: NotificationError) -> Self {
        Self {
            error: Some(err),
            ..Self::default()
        }
    }

    /// Answer every post only after `delay`.
    pub fn slowed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl MessagePoster for FakePoster {
    async fn post(&self, _channel: &str, text: &str) -> Result<(), NotificationError> {
        self.posts.lock().unwrap().push(text.to_string());
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
// App construction
// ---------------------------------------------------------------------------

/// Services behind a test app, kept so tests can inspect outbound traffic.
pub struct TestApp {
    pub router: Router,
    pub generator: Arc<FakeGenerator>,
    pub store: Arc<FakeStore>,
    pub poster: Arc<FakePoster>,
}

/// Build the full application router with all middleware layers over the
/// given fake services.
pub fn build_test_app(generator: FakeGenerator, store: FakeStore, poster: FakePoster) -> TestApp {
    build_test_app_with_config(test_config(), generator, store, poster)
}

pub fn build_test_app_with_config(
    config: ServerConfig,
    generator: FakeGenerator,
    store: FakeStore,
    poster: FakePoster,
) -> TestApp {
    let generator = Arc::new(generator);
    let store = Arc::new(store);
    let poster = Arc::new(poster);

    let pipeline = Pipeline::new(
        generator.clone(),
        store.clone(),
        poster.clone(),
        config.pipeline_settings(),
    );
    let state = AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
    };

    TestApp {
        router: build_app_router(state),
        generator,
        store,
        poster,
    }
}

/// A test app where every outbound service succeeds.
pub fn healthy_app() -> TestApp {
    build_test_app(
        FakeGenerator::replying(PROPOSAL_TEXT),
        FakeStore::default(),
        FakePoster::default(),
    )
}

pub fn scraper_job() -> Value {
    json!({
        "title": "Build a scraper",
        "description": "Need Python scraper for site X",
        "budget": 500,
        "skills": ["python", "scraping"],
        "source_id": "job-123"
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body with a JSON content type.
pub async fn post_raw(app: Router, path: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, path: &str, body: &Value) -> Response {
    post_raw(app, path, body.to_string()).await
}
