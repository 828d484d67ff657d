//! Public gallery: approved submissions only.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use salon_core::models::{MediaType, Submission, SubmissionStatus};
use salon_core::AppError;
use serde::Serialize;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionPublic {
    pub id: Uuid,
    pub title: String,
    pub author_name: String,
    pub tags: Vec<String>,
    pub media_type: MediaType,
    pub thumb_url: String,
    pub detail_url: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    pub id: Uuid,
    pub title: String,
    pub author_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub media_type: MediaType,
    pub thumb_url: String,
    pub media_url: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

fn public_projection(state: &AppState, s: &Submission) -> SubmissionPublic {
    let base = state.config.public_base_url.trim_end_matches('/');
    SubmissionPublic {
        id: s.id,
        title: s.title.clone(),
        author_name: s.author_name.clone(),
        tags: s.tags.clone(),
        media_type: s.media_type,
        thumb_url: state
            .media_url(&s.thumb_path)
            .unwrap_or_else(|| s.thumb_path.clone()),
        detail_url: format!("{}/api/items/{}", base, s.id),
    }
}

pub async fn list_gallery(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SubmissionPublic>>, HttpAppError> {
    let items = state.store.list(Some(SubmissionStatus::Approved)).await;
    let projected = items
        .iter()
        .map(|s| public_projection(&state, s))
        .collect();
    Ok(Json(projected))
}

pub async fn item_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionDetail>, HttpAppError> {
    let submission = state
        .store
        .get(id)
        .await
        .filter(|s| s.status == SubmissionStatus::Approved)
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    Ok(Json(SubmissionDetail {
        id: submission.id,
        title: submission.title.clone(),
        author_name: submission.author_name.clone(),
        description: submission.description.clone(),
        tags: submission.tags.clone(),
        media_type: submission.media_type,
        thumb_url: state
            .media_url(&submission.thumb_path)
            .unwrap_or_else(|| submission.thumb_path.clone()),
        media_url: state
            .media_url(&submission.file_path)
            .unwrap_or_else(|| submission.file_path.clone()),
        duration_seconds: submission.duration_seconds,
        created_at: submission.created_at,
    }))
}
