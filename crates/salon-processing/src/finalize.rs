//! Finalization: move a validated temp file to its permanent,
//! content-addressed location under the upload directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::MediaError;
use crate::spool::SpooledUpload;

/// Permanent location and size of a finalized original file.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub path: PathBuf,
    pub bytes: u64,
}

fn filename_suffix<'a>(filename: &str, candidates: &[(&str, &'a str)]) -> Option<&'a str> {
    let lower = filename.to_lowercase();
    candidates
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, ext)| *ext)
}

/// Target extension for an image: filename suffix first, declared MIME as
/// fallback, `.jpg` when neither classifies.
pub fn image_extension(filename: &str, content_type: &str) -> &'static str {
    if let Some(ext) = filename_suffix(
        filename,
        &[
            (".png", ".png"),
            (".webp", ".webp"),
            (".jpg", ".jpg"),
            (".jpeg", ".jpg"),
        ],
    ) {
        return ext;
    }
    match content_type {
        "image/png" => ".png",
        "image/webp" => ".webp",
        _ => ".jpg",
    }
}

/// Target extension for a video: filename suffix first, declared MIME as
/// fallback. Unlike images there is no safe default container, so an
/// unclassifiable video is a hard failure.
pub fn video_extension(filename: &str, content_type: &str) -> Result<&'static str, MediaError> {
    if let Some(ext) = filename_suffix(filename, &[(".mp4", ".mp4"), (".webm", ".webm")]) {
        return Ok(ext);
    }
    match content_type {
        "video/mp4" => Ok(".mp4"),
        "video/webm" => Ok(".webm"),
        _ => Err(MediaError::UnsupportedMediaType),
    }
}

/// Move the spooled file to `{upload_dir}/{uuid-hex}{ext}`.
///
/// A v4 UUID gives 128 bits of randomness, so collisions are not a concern
/// and no existence check is made. Rename is atomic within a filesystem;
/// if it fails (e.g. cross-device) we fall back to copy + remove, deleting
/// the destination again if the copy itself fails.
pub async fn finalize(
    spool: SpooledUpload,
    upload_dir: &Path,
    extension: &str,
) -> Result<StoredAsset, MediaError> {
    let bytes = spool.bytes();
    let temp_path = spool.into_path();
    let final_path = upload_dir.join(format!("{}{}", Uuid::new_v4().simple(), extension));

    match tokio::fs::rename(&temp_path, &final_path).await {
        Ok(()) => {}
        Err(rename_err) => {
            tracing::debug!(
                from = %temp_path.display(),
                to = %final_path.display(),
                error = %rename_err,
                "Rename failed, falling back to copy"
            );
            if let Err(copy_err) = tokio::fs::copy(&temp_path, &final_path).await {
                let _ = tokio::fs::remove_file(&final_path).await;
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(copy_err.into());
            }
            tokio::fs::remove_file(&temp_path).await?;
        }
    }

    Ok(StoredAsset {
        path: final_path,
        bytes,
    })
}
