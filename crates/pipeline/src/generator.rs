//! Proposal Generator: turns a validated job into a [`ProposalDraft`].

use std::sync::Arc;

use jobrelay_core::capability::TextGenerator;
use jobrelay_core::error::GenerationError;
use jobrelay_core::job::JobPayload;
use jobrelay_core::proposal::{proposal_request, ProposalDraft};
use jobrelay_core::scoring::{parse_score, score_request};

pub struct ProposalGenerator {
    service: Arc<dyn TextGenerator>,
    max_output_tokens: u32,
}

impl ProposalGenerator {
    pub fn new(service: Arc<dyn TextGenerator>, max_output_tokens: u32) -> Self {
        Self {
            service,
            max_output_tokens,
        }
    }

    /// Request a proposal for `job`.
    ///
    /// Exactly one call to the text service; no retries. Blank output is
    /// reported as [`GenerationError::EmptyResponse`].
    pub async fn generate(&self, job: &JobPayload) -> Result<ProposalDraft, GenerationError> {
        let request = proposal_request(job, self.max_output_tokens);
        tracing::debug!(
            source_id = %job.source_id,
            prompt_len = request.prompt.len(),
            max_output_tokens = request.max_output_tokens,
            "Requesting proposal",
        );

        let text = self.service.generate(&request).await?;
        ProposalDraft::new(&text, request.prompt)
    }

    /// Ask the text service for a match score.
    ///
    /// Any failure, including an unparseable reply, yields `None`.
    pub async fn score(&self, job: &JobPayload) -> Option<u8> {
        match self.service.generate(&score_request(job)).await {
            Ok(reply) => {
                let score = parse_score(&reply);
                if score.is_none() {
                    tracing::warn!(source_id = %job.source_id, reply = %reply, "Unparseable job score");
                }
                score
            }
            Err(e) => {
                tracing::warn!(source_id = %job.source_id, error = %e, "Job scoring failed");
                None
            }
        }
    }
}
