//! Slack Web API client implementing [`MessagePoster`].
//!
//! Slack reports most failures with HTTP 200 and `"ok": false`, so both the
//! status code and the body flag are checked.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use jobrelay_core::capability::MessagePoster;
use jobrelay_core::error::NotificationError;

use crate::config::{self, ConfigError};

pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub base_url: String,
}

impl SlackConfig {
    /// | Env Var            | Default                 |
    /// |--------------------|-------------------------|
    /// | `SLACK_BOT_TOKEN`  | required                |
    /// | `SLACK_CHANNEL_ID` | required                |
    /// | `SLACK_BASE_URL`   | `https://slack.com/api` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bot_token: config::required(lookup, "SLACK_BOT_TOKEN")?,
            channel_id: config::required(lookup, "SLACK_CHANNEL_ID")?,
            base_url: config::base_url(config::or_default(
                lookup,
                "SLACK_BASE_URL",
                DEFAULT_BASE_URL,
            )),
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

pub struct SlackClient {
    client: reqwest::Client,
    config: SlackConfig,
}

impl SlackClient {
    pub fn new(config: SlackConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MessagePoster for SlackClient {
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.config.base_url))
            .bearer_auth(&self.config.bot_token)
            .json(&json!({
                "channel": channel,
                "text": text,
                "unfurl_links": false,
            }))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        check_ok(&body)
    }
}

/// Interpret a `chat.postMessage` body.
fn check_ok(body: &str) -> Result<(), NotificationError> {
    let parsed: PostMessageResponse = serde_json::from_str(body)
        .map_err(|e| NotificationError::Rejected(format!("unreadable response: {e}")))?;
    if parsed.ok {
        Ok(())
    } else {
        Err(NotificationError::Rejected(
            parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
