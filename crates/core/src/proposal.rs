//! Proposal prompt template and the generated draft.

use chrono::Utc;

use crate::error::GenerationError;
use crate::job::JobPayload;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default cap on generated proposal length, in model tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Sampling temperature for proposals: low, for a steady tone.
pub const PROPOSAL_TEMPERATURE: f32 = 0.2;

/// System message steering tone and length of generated proposals.
pub const PROPOSAL_SYSTEM_MESSAGE: &str = "\
You write brief Upwork cover letters that are spartan, intelligent, friendly, \
professional and approachable. Sound human and warm without excessive \
enthusiasm, complex formatting or filler. Respect the client's time.

Read the job description to understand the client's needs, the required \
skills, the tasks and any unique challenges mentioned.

Reply in plain text only, with no formatting symbols (no pound signs, no \
asterisks). Keep the proposal to around 300 characters. Reply with the \
proposal content and nothing else. If the client's first name is available, \
use it.";

// ---------------------------------------------------------------------------
// Request / draft
// ---------------------------------------------------------------------------

/// A single request to the generative text service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Generated proposal text for one pipeline run.
///
/// The text is guaranteed non-empty: [`ProposalDraft::new`] rejects blank
/// output, so downstream stages never see an empty proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalDraft {
    text: String,
    prompt: String,
    generated_at: Timestamp,
}

impl ProposalDraft {
    /// Wrap generated text, trimming surrounding whitespace.
    ///
    /// Returns [`GenerationError::EmptyResponse`] if nothing remains.
    pub fn new(text: &str, prompt: String) -> Result<Self, GenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(Self {
            text: text.to_string(),
            prompt,
            generated_at: Utc::now(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The prompt that produced this draft, kept for traceability.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn generated_at(&self) -> Timestamp {
        self.generated_at
    }
}

// ---------------------------------------------------------------------------
// Prompt template
// ---------------------------------------------------------------------------

/// Build the user prompt for a job. Deterministic: the same payload always
/// yields the same prompt. Optional sections are omitted when absent.
pub fn build_prompt(job: &JobPayload) -> String {
    let mut prompt = format!(
        "Job title:\n{}\n\nJob description:\n{}\n",
        job.title, job.description
    );

    if let Some(budget) = &job.budget {
        prompt.push_str(&format!("\nProject-based budget:\n{budget}\n"));
    }
    if let Some(hourly) = &job.hourly_range {
        prompt.push_str(&format!("\nHourly range:\n{hourly}\n"));
    }
    if !job.skills.is_empty() {
        prompt.push_str(&format!("\nJob skills:\n{}\n", job.skills.join(", ")));
    }
    if let Some(estimate) = &job.estimated_time {
        prompt.push_str(&format!("\nEstimated time:\n{estimate}\n"));
    }

    prompt
}

/// Build the full generation request for a job's proposal.
pub fn proposal_request(job: &JobPayload, max_output_tokens: u32) -> GenerationRequest {
    GenerationRequest {
        system: PROPOSAL_SYSTEM_MESSAGE.to_string(),
        prompt: build_prompt(job),
        max_output_tokens,
        temperature: PROPOSAL_TEMPERATURE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
