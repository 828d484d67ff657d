//! Admin surface: login plus the moderation queue (list, approve, reject).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Form, Json,
};
use salon_core::models::{Submission, SubmissionStatus};
use salon_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{create_token, verify_admin_password, RequireAdmin};
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RejectForm {
    #[serde(default)]
    pub reason: String,
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, HttpAppError> {
    if !verify_admin_password(&payload.password, &state.config.admin_password) {
        return Err(AppError::Unauthorized("Invalid password".to_string()).into());
    }
    let token = create_token(&state.config.jwt_secret, state.config.jwt_ttl_seconds)?;
    Ok(Json(AdminLoginResponse { token }))
}

pub async fn list_submissions(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Submission>>, HttpAppError> {
    Ok(Json(state.store.list(query.status).await))
}

pub async fn approve_submission(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, HttpAppError> {
    let updated = state
        .store
        .set_status(id, SubmissionStatus::Approved, None)
        .await
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    tracing::info!(id = %id, "Submission approved");
    Ok(Json(updated))
}

pub async fn reject_submission(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<RejectForm>,
) -> Result<Json<Submission>, HttpAppError> {
    let reason = if form.reason.is_empty() {
        None
    } else {
        Some(form.reason)
    };
    let updated = state
        .store
        .set_status(id, SubmissionStatus::Rejected, reason)
        .await
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    tracing::info!(id = %id, "Submission rejected");
    Ok(Json(updated))
}
