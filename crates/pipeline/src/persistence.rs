//! Persistence Client: writes job records to the tabular store.
//!
//! Every call to [`PersistenceClient::store`] creates a new row. There is no
//! lookup by `source_id` and no dedup; submitting the same job twice yields
//! two rows.

use std::sync::Arc;

use jobrelay_core::capability::RecordStore;
use jobrelay_core::error::PersistenceError;
use jobrelay_core::record::{JobRecord, JobStatus};

pub struct PersistenceClient {
    store: Arc<dyn RecordStore>,
}

impl PersistenceClient {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Write `record` as a new row and return the store-assigned id.
    ///
    /// On success the record carries the id and status `stored`. On failure
    /// it is left untouched.
    pub async fn store(&self, record: &mut JobRecord) -> Result<String, PersistenceError> {
        let id = self
            .store
            .create(record.to_fields(JobStatus::Stored))
            .await?;

        record.record_id = Some(id.clone());
        record.status = JobStatus::Stored;
        tracing::info!(record_id = %id, source_id = %record.source_id, "Job record stored");
        Ok(id)
    }

    /// Patch the stored row's status to `notified`.
    pub async fn mark_notified(&self, record: &JobRecord) -> Result<(), PersistenceError> {
        let Some(id) = record.record_id.as_deref() else {
            return Err(PersistenceError::Schema(
                "record has no store id to update".into(),
            ));
        };
        self.store.update_status(id, JobStatus::Notified).await
    }
}
