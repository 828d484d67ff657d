//! Pipeline errors. One variant per rejection kind the caller can map to a
//! client-facing reason, plus ambient I/O failures.

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type")]
    UnsupportedMediaType,

    #[error("File too large (max: {max_bytes} bytes)")]
    FileTooLarge { max_bytes: u64 },

    #[error("Invalid media: {0}")]
    InvalidMedia(String),

    #[error("Video too long: {duration:.1}s (max: {max_seconds:.0}s)")]
    VideoTooLong { duration: f64, max_seconds: f64 },

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailGenerationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
