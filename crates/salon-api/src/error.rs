//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Pipeline and
//! domain errors convert into `HttpAppError` so every failure renders the
//! same JSON shape with a status matching the rejection kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salon_core::AppError;
use salon_processing::MediaError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in salon-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Map each pipeline rejection kind to its client-facing error.
impl From<MediaError> for HttpAppError {
    fn from(err: MediaError) -> Self {
        let app = match err {
            MediaError::UnsupportedMediaType => {
                AppError::UnsupportedMediaType("Unsupported media type".to_string())
            }
            MediaError::FileTooLarge { max_bytes } => {
                AppError::PayloadTooLarge(format!("File exceeds {} bytes", max_bytes))
            }
            MediaError::InvalidMedia(_) => {
                AppError::BadRequest("File could not be decoded as media".to_string())
            }
            MediaError::VideoTooLong {
                duration,
                max_seconds,
            } => AppError::BadRequest(format!(
                "Video is {:.0}s, the maximum is {:.0}s",
                duration, max_seconds
            )),
            MediaError::ThumbnailGenerationFailed(detail) => {
                AppError::Internal(format!("Thumbnail generation failed: {}", detail))
            }
            MediaError::Io(err) => AppError::Internal(err.to_string()),
            MediaError::Task(err) => AppError::Internal(err.to_string()),
        };
        HttpAppError(app)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %err, code = err.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %err, code = err.error_code(), "Request rejected");
        }

        let body = ErrorResponse {
            error: err.client_message(),
            code: err.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: MediaError) -> StatusCode {
        let http: HttpAppError = err.into();
        http.into_response().status()
    }

    #[test]
    fn pipeline_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(MediaError::UnsupportedMediaType),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(MediaError::FileTooLarge { max_bytes: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(MediaError::InvalidMedia("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MediaError::VideoTooLong {
                duration: 200.0,
                max_seconds: 180.0
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MediaError::ThumbnailGenerationFailed("ffmpeg".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let http: HttpAppError =
            MediaError::ThumbnailGenerationFailed("/secret/path exploded".into()).into();
        assert_eq!(http.0.client_message(), "Internal server error");
    }
}
