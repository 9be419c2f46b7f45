//! Airtable table client implementing [`RecordStore`].
//!
//! Rows are created with `POST /{base}/{table}` and their status column is
//! patched with `PATCH /{base}/{table}/{record_id}`. `typecast` is enabled
//! so single-select columns accept new option values.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use jobrelay_core::capability::RecordStore;
use jobrelay_core::error::PersistenceError;
use jobrelay_core::record::{JobStatus, COL_STATUS};

use crate::config::{self, ConfigError};

pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_id: String,
    pub base_url: String,
}

impl AirtableConfig {
    /// | Env Var             | Default                       |
    /// |---------------------|-------------------------------|
    /// | `AIRTABLE_API_KEY`  | required                      |
    /// | `AIRTABLE_BASE_ID`  | required                      |
    /// | `AIRTABLE_TABLE_ID` | required                      |
    /// | `AIRTABLE_BASE_URL` | `https://api.airtable.com/v0` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: config::required(lookup, "AIRTABLE_API_KEY")?,
            base_id: config::required(lookup, "AIRTABLE_BASE_ID")?,
            table_id: config::required(lookup, "AIRTABLE_TABLE_ID")?,
            base_url: config::base_url(config::or_default(
                lookup,
                "AIRTABLE_BASE_URL",
                DEFAULT_BASE_URL,
            )),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.base_id, self.table_id)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    id: Option<String>,
}

pub struct AirtableClient {
    client: reqwest::Client,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, PersistenceError> {
        let response = request
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| PersistenceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PersistenceError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(classify_status(status, body));
        }
        Ok(body)
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn create(&self, fields: Map<String, Value>) -> Result<String, PersistenceError> {
        let request = self
            .client
            .post(self.config.table_url())
            .json(&json!({ "fields": fields, "typecast": true }));

        let body = self.send(request).await?;
        let id = extract_record_id(&body)?;
        tracing::debug!(record_id = %id, table = %self.config.table_id, "Airtable row created");
        Ok(id)
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: JobStatus,
    ) -> Result<(), PersistenceError> {
        let mut fields = Map::new();
        fields.insert(COL_STATUS.into(), status.as_str().into());
        let request = self
            .client
            .patch(format!("{}/{record_id}", self.config.table_url()))
            .json(&json!({ "fields": fields, "typecast": true }));

        self.send(request).await?;
        tracing::debug!(record_id, status = %status, "Airtable row status updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

fn classify_status(status: u16, body: String) -> PersistenceError {
    match status {
        401 | 403 => PersistenceError::Unauthorized(body),
        422 => PersistenceError::Schema(body),
        429 => PersistenceError::RateLimited(body),
        _ => PersistenceError::Upstream { status, body },
    }
}

fn extract_record_id(body: &str) -> Result<String, PersistenceError> {
    let created: CreatedRecord = serde_json::from_str(body)
        .map_err(|e| PersistenceError::Schema(format!("unreadable create response: {e}")))?;
    created
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PersistenceError::Schema("create response has no record id".into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
