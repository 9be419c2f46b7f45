//! Response bodies for the webhook endpoint.

use serde::Serialize;

/// Body of a `200` webhook response.
///
/// `notified` is `false` when the job was stored but the channel post
/// failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAccepted {
    pub status: &'static str,
    pub record_id: String,
    pub notified: bool,
}

impl JobAccepted {
    pub fn new(record_id: String, notified: bool) -> Self {
        Self {
            status: "ok",
            record_id,
            notified,
        }
    }
}
