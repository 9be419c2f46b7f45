//! Notifier: posts a summary of a stored job to the team channel.

use std::sync::Arc;

use jobrelay_core::capability::MessagePoster;
use jobrelay_core::error::NotificationError;
use jobrelay_core::notification::{render_summary, NotificationMessage};
use jobrelay_core::record::JobRecord;

pub struct Notifier {
    poster: Arc<dyn MessagePoster>,
    channel: String,
}

impl Notifier {
    pub fn new(poster: Arc<dyn MessagePoster>, channel: impl Into<String>) -> Self {
        Self {
            poster,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Render and post the summary for `record`.
    pub async fn notify(&self, record: &JobRecord) -> Result<NotificationMessage, NotificationError> {
        let text = render_summary(record);
        self.poster.post(&self.channel, &text).await?;
        Ok(NotificationMessage::new(self.channel.clone(), text))
    }
}
