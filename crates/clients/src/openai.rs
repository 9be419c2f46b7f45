//! OpenAI chat-completions client implementing [`TextGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use jobrelay_core::capability::TextGenerator;
use jobrelay_core::error::GenerationError;
use jobrelay_core::proposal::GenerationRequest;

use crate::config::{self, ConfigError};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    /// | Env Var           | Default                     |
    /// |-------------------|-----------------------------|
    /// | `OPENAI_API_KEY`  | required                    |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`               |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: config::required(lookup, "OPENAI_API_KEY")?,
            model: config::or_default(lookup, "OPENAI_MODEL", DEFAULT_MODEL),
            base_url: config::base_url(config::or_default(
                lookup,
                "OPENAI_BASE_URL",
                DEFAULT_BASE_URL,
            )),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        tracing::debug!(status, model = %self.config.model, "Chat completion response");

        if !(200..300).contains(&status) {
            return Err(classify_status(status, text));
        }
        extract_content(&text)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(err.to_string())
    } else {
        GenerationError::Transport(err.to_string())
    }
}

/// Map a non-2xx status to the matching generation error.
fn classify_status(status: u16, body: String) -> GenerationError {
    match status {
        401 | 403 => GenerationError::Unauthorized(body),
        429 => GenerationError::RateLimited(body),
        _ => GenerationError::Upstream { status, body },
    }
}

/// Pull the first choice's content out of a completion body.
///
/// A `null` content is returned as an empty string; the caller decides that
/// an empty reply is a failure.
fn extract_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| GenerationError::Malformed("response has no choices".into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
