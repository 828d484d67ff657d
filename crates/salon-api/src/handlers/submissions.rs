//! Submission creation: multipart upload → media pipeline → pending record.

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use salon_core::models::{MediaType, Submission, SubmissionStatus};
use salon_core::AppError;
use salon_processing::sniff_media_type;
use serde::Serialize;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionCreateResponse {
    pub id: Uuid,
    pub status: SubmissionStatus,
}

#[derive(Default)]
struct SubmissionForm {
    title: Option<String>,
    author_name: Option<String>,
    description: String,
    tags: Vec<String>,
    file: Option<UploadedFile>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: bytes::Bytes,
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, HttpAppError> {
    let mut form = SubmissionForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            "title" => form.title = Some(read_text(field).await?),
            "author_name" => form.author_name = Some(read_text(field).await?),
            "description" => form.description = read_text(field).await?,
            "tags" => form.tags = parse_tags(&read_text(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, HttpAppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)).into())
}

#[tracing::instrument(skip(state, multipart))]
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionCreateResponse>), HttpAppError> {
    let form = read_form(multipart).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("title is required".to_string()))?;
    let author_name = form
        .author_name
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("author_name is required".to_string()))?;
    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let media_type = sniff_media_type(&state.config.media, &file.content_type, &file.filename)?;

    let mut source = Cursor::new(file.data);
    let (file_path, thumb_path, duration) = match media_type {
        MediaType::Image => {
            let upload = state
                .pipeline
                .process_image_upload(&mut source, &file.content_type, &file.filename)
                .await?;
            (upload.file_path, upload.thumb_path, None)
        }
        MediaType::Video => {
            let upload = state
                .pipeline
                .process_video_upload(&mut source, &file.content_type, &file.filename)
                .await?;
            (upload.file_path, upload.thumb_path, upload.duration)
        }
    };

    let submission = Submission {
        id: Uuid::new_v4(),
        title,
        author_name,
        description: form.description,
        tags: form.tags,
        media_type,
        file_path: file_path.display().to_string(),
        thumb_path: thumb_path.display().to_string(),
        duration_seconds: duration,
        created_at: Utc::now(),
        status: SubmissionStatus::Pending,
        rejected_reason: None,
    };
    let submission = state.store.create(submission).await;

    tracing::info!(id = %submission.id, media_type = ?media_type, "Submission created");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreateResponse {
            id: submission.id,
            status: submission.status,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_empties_dropped() {
        assert_eq!(parse_tags("a, b , ,c"), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
