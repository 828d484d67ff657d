use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Moderation status of a submission. Only `Approved` items are visible in
/// the public gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A gallery submission record: metadata plus the stored original and its
/// thumbnail. `duration_seconds` is present only for video, and only when the
/// probe produced a parseable duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub media_type: MediaType,
    pub file_path: String,
    pub thumb_path: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub rejected_reason: Option<String>,
}
