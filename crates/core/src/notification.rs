//! Rendering of the channel summary posted after a job is stored.

use chrono::Utc;

use crate::record::JobRecord;
use crate::types::Timestamp;

/// Maximum description length in the summary, in characters.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 280;

/// Maximum proposal length in the summary, in characters.
pub const PROPOSAL_EXCERPT_CHARS: usize = 500;

/// A rendered message and where it went.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub channel: String,
    pub text: String,
    pub sent_at: Timestamp,
}

impl NotificationMessage {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Truncate to at most `max_chars` characters, appending `…` when cut.
///
/// Counts `char`s, so multi-byte text is never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].trim_end().to_string();
            cut.push('…');
            cut
        }
    }
}

/// Render the human-readable summary for a stored record.
///
/// Links to the posting URL when known, otherwise names the source id.
pub fn render_summary(record: &JobRecord) -> String {
    let mut text = format!("*New Upwork job:* {}\n", record.title);

    match &record.url {
        Some(url) => text.push_str(&format!("<{url}|View posting> ({})\n", record.source_id)),
        None => text.push_str(&format!("Source: {}\n", record.source_id)),
    }
    if let Some(budget) = &record.budget {
        text.push_str(&format!("Budget: {budget}\n"));
    }
    if let Some(score) = record.score {
        text.push_str(&format!("Match score: {score}/100\n"));
    }
    if let Some(id) = &record.record_id {
        text.push_str(&format!("Record: {id}\n"));
    }

    text.push_str(&format!(
        "\n*Description*\n{}\n\n*Proposal draft*\n{}",
        truncate_chars(&record.description, DESCRIPTION_EXCERPT_CHARS),
        truncate_chars(&record.proposal, PROPOSAL_EXCERPT_CHARS),
    ));
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
