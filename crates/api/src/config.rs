use std::time::Duration;

use jobrelay_clients::config::{self, ConfigError};
use jobrelay_clients::{AirtableConfig, OpenAiConfig, SlackConfig};
use jobrelay_core::proposal::DEFAULT_MAX_OUTPUT_TOKENS;
use jobrelay_pipeline::PipelineSettings;

/// Server configuration loaded from environment variables.
///
/// Read once at startup. Missing credentials are a startup error, never a
/// per-request one.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Whole-request timeout in seconds (default: `180`). Must exceed the
    /// time a run can spend on outbound calls.
    pub request_timeout_secs: u64,
    /// Per outbound call timeout in seconds (default: `30`).
    pub outbound_timeout_secs: u64,
    /// Output cap for proposal generation (default: `500`).
    pub proposal_max_tokens: u32,
    /// Score jobs before storing them (default: `false`).
    pub scoring_enabled: bool,
    pub openai: OpenAiConfig,
    pub airtable: AirtableConfig,
    pub slack: SlackConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default   |
    /// |-------------------------|-----------|
    /// | `HOST`                  | `0.0.0.0` |
    /// | `PORT`                  | `8000`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `180`     |
    /// | `OUTBOUND_TIMEOUT_SECS` | `30`      |
    /// | `PROPOSAL_MAX_TOKENS`   | `500`     |
    /// | `SCORING_ENABLED`       | `false`   |
    ///
    /// Service credentials are documented on [`OpenAiConfig`],
    /// [`AirtableConfig`] and [`SlackConfig`].
    ///
    /// `REQUEST_TIMEOUT_SECS` is rejected unless it is larger than the
    /// outbound timeout times the number of outbound calls in one run, so a
    /// slow service always fails its own stage before the request times out.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let loaded = Self {
            host: config::or_default(lookup, "HOST", "0.0.0.0"),
            port: config::parsed_or(lookup, "PORT", 8000)?,
            request_timeout_secs: config::parsed_or(lookup, "REQUEST_TIMEOUT_SECS", 180)?,
            outbound_timeout_secs: config::parsed_or(lookup, "OUTBOUND_TIMEOUT_SECS", 30)?,
            proposal_max_tokens: config::parsed_or(
                lookup,
                "PROPOSAL_MAX_TOKENS",
                DEFAULT_MAX_OUTPUT_TOKENS,
            )?,
            scoring_enabled: config::parsed_or(lookup, "SCORING_ENABLED", false)?,
            openai: OpenAiConfig::from_lookup(lookup)?,
            airtable: AirtableConfig::from_lookup(lookup)?,
            slack: SlackConfig::from_lookup(lookup)?,
        };
        loaded.check_timeouts()?;
        Ok(loaded)
    }

    fn check_timeouts(&self) -> Result<(), ConfigError> {
        if self.outbound_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "OUTBOUND_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let settings = self.pipeline_settings();
        let budget = settings.run_budget();
        if Duration::from_secs(self.request_timeout_secs) <= budget {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: self.request_timeout_secs.to_string(),
                reason: format!(
                    "must exceed {} outbound calls of {}s each ({}s)",
                    settings.outbound_calls(),
                    self.outbound_timeout_secs,
                    budget.as_secs(),
                ),
            });
        }
        Ok(())
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            channel: self.slack.channel_id.clone(),
            max_output_tokens: self.proposal_max_tokens,
            scoring_enabled: self.scoring_enabled,
            call_timeout: self.outbound_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
