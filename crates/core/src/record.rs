//! Job record: the row persisted in the tabular store.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::job::{Budget, JobPayload};
use crate::proposal::ProposalDraft;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Store column names
// ---------------------------------------------------------------------------

pub const COL_SOURCE_ID: &str = "source_id";
pub const COL_URL: &str = "url";
pub const COL_TITLE: &str = "title";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_BUDGET: &str = "budget";
pub const COL_HOURLY_RANGE: &str = "hourlyRange";
pub const COL_ESTIMATED_TIME: &str = "estimatedTime";
pub const COL_SKILLS: &str = "skills";
pub const COL_CLIENT: &str = "client";
pub const COL_PROPOSAL: &str = "Proposal";
pub const COL_SCORE: &str = "Score";
pub const COL_STATUS: &str = "Status";
pub const COL_CREATED: &str = "Created";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Processing status of a job record.
///
/// `pending -> proposal_generated -> stored -> notified`, or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    ProposalGenerated,
    Stored,
    Notified,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ProposalGenerated => "proposal_generated",
            Self::Stored => "stored",
            Self::Notified => "notified",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub budget: Option<Budget>,
    pub skills: Vec<String>,
    pub client: Option<Map<String, Value>>,
    pub url: Option<String>,
    pub hourly_range: Option<String>,
    pub estimated_time: Option<String>,
    pub proposal: String,
    /// Match score (1-100) when scoring is enabled and succeeded.
    pub score: Option<u8>,
    pub status: JobStatus,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    /// Identifier assigned by the store once written.
    pub record_id: Option<String>,
}

impl JobRecord {
    /// Combine a validated payload with its generated proposal.
    ///
    /// Pure; the resulting record has status `proposal_generated`.
    pub fn build(job: JobPayload, draft: &ProposalDraft) -> Self {
        Self {
            source_id: job.source_id,
            title: job.title,
            description: job.description,
            budget: job.budget,
            skills: job.skills,
            client: job.client,
            url: job.url,
            hourly_range: job.hourly_range,
            estimated_time: job.estimated_time,
            proposal: draft.text().to_string(),
            score: None,
            status: JobStatus::ProposalGenerated,
            failure_reason: None,
            created_at: Utc::now(),
            record_id: None,
        }
    }

    /// Mark the record failed, keeping the reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.failure_reason = Some(reason.into());
    }

    /// Render the store field map, writing `status` in the status column.
    ///
    /// Optional values that are absent are left out rather than sent as
    /// nulls.
    pub fn to_fields(&self, status: JobStatus) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(COL_SOURCE_ID.into(), self.source_id.clone().into());
        fields.insert(COL_TITLE.into(), self.title.clone().into());
        fields.insert(COL_DESCRIPTION.into(), self.description.clone().into());

        if let Some(url) = &self.url {
            fields.insert(COL_URL.into(), url.clone().into());
        }
        if let Some(budget) = &self.budget {
            fields.insert(COL_BUDGET.into(), budget.to_string().into());
        }
        if let Some(hourly) = &self.hourly_range {
            fields.insert(COL_HOURLY_RANGE.into(), hourly.clone().into());
        }
        if let Some(estimate) = &self.estimated_time {
            fields.insert(COL_ESTIMATED_TIME.into(), estimate.clone().into());
        }
        if !self.skills.is_empty() {
            fields.insert(COL_SKILLS.into(), self.skills.join(", ").into());
        }
        if let Some(client) = &self.client {
            fields.insert(
                COL_CLIENT.into(),
                Value::Object(client.clone()).to_string().into(),
            );
        }
        if let Some(score) = self.score {
            fields.insert(COL_SCORE.into(), score.into());
        }

        fields.insert(COL_PROPOSAL.into(), self.proposal.clone().into());
        fields.insert(COL_STATUS.into(), status.as_str().into());
        fields.insert(COL_CREATED.into(), self.created_at.to_rfc3339().into());
        fields
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
