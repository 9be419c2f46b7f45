//! Optional job match scoring.
//!
//! Asks the generative service for a single 1-100 number describing how well
//! a job matches the operator's profile. The score is informational only.

use crate::job::JobPayload;
use crate::proposal::GenerationRequest;

/// Output budget for a score reply; the answer is one short number.
pub const SCORE_MAX_OUTPUT_TOKENS: u32 = 10;

/// Sampling temperature for scoring requests.
pub const SCORE_TEMPERATURE: f32 = 1.0;

pub const SCORING_SYSTEM_MESSAGE: &str = "\
You evaluate Upwork job descriptions and score how well each job matches an \
automation and integration specialist, from 1 (poor match) to 100 (ideal match).

Primary skills (40 points): task automation, API integration, Python, \
no-code/low-code tools, workflow optimization.
Project type and scope (30 points): process automation and system \
integration are ideal; full website builds and design work are a poor fit.
Budget and time commitment (20 points): realistic budgets for the \
complexity, flexible time commitment preferred.
Red flags (deduct 10 points each): vague descriptions, unrealistic \
expectations, SEO or marketing focus, gambling or trading.

Reply with the numeric score only.";

/// Build the scoring request for a job.
pub fn score_request(job: &JobPayload) -> GenerationRequest {
    let budget = job
        .budget
        .map(|b| b.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let hourly = job.hourly_range.as_deref().unwrap_or("N/A");
    let skills = if job.skills.is_empty() {
        "N/A".to_string()
    } else {
        job.skills.join(", ")
    };

    GenerationRequest {
        system: SCORING_SYSTEM_MESSAGE.to_string(),
        prompt: format!(
            "Job Title:\n{}\n\nJob Description:\n{}\n\n\
             Project-based budget:\n{budget}\n\nHourly-based budget:\n{hourly}\n\n\
             Tagged Skills:\n{skills}",
            job.title, job.description
        ),
        max_output_tokens: SCORE_MAX_OUTPUT_TOKENS,
        temperature: SCORE_TEMPERATURE,
    }
}

/// Parse a model reply into a score. Only an integer in `1..=100` counts.
pub fn parse_score(reply: &str) -> Option<u8> {
    reply
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|score| (1..=100).contains(score))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
