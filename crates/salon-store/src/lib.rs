//! Submission record store: a key-value store queryable by moderation
//! status, sorted newest-first. `SubmissionStore` is the seam a database
//! implementation would fill; `MemoryStore` is the in-process default.

use std::collections::HashMap;

use async_trait::async_trait;
use salon_core::models::{Submission, SubmissionStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn create(&self, submission: Submission) -> Submission;

    async fn get(&self, id: Uuid) -> Option<Submission>;

    /// List submissions, optionally filtered by status, newest first.
    async fn list(&self, status: Option<SubmissionStatus>) -> Vec<Submission>;

    /// Update moderation status. Returns the updated record, or `None` if
    /// the id is unknown.
    async fn set_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
        rejected_reason: Option<String>,
    ) -> Option<Submission>;
}

/// In-memory store backed by a `RwLock`ed map.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn create(&self, submission: Submission) -> Submission {
        let mut records = self.records.write().await;
        records.insert(submission.id, submission.clone());
        submission
    }

    async fn get(&self, id: Uuid) -> Option<Submission> {
        self.records.read().await.get(&id).cloned()
    }

    async fn list(&self, status: Option<SubmissionStatus>) -> Vec<Submission> {
        let records = self.records.read().await;
        let mut items: Vec<Submission> = records
            .values()
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
        rejected_reason: Option<String>,
    ) -> Option<Submission> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id)?;
        record.status = status;
        record.rejected_reason = rejected_reason;
        Some(record.clone())
    }
}
