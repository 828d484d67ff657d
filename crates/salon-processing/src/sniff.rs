//! Type sniffing: classify an upload as image or video from its declared
//! content type and filename, without trusting either alone.

use salon_core::models::MediaType;
use salon_core::MediaConfig;

use crate::error::MediaError;

fn extension_matches(filename: &str, extensions: &[String]) -> bool {
    let lower = filename.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Classify an upload from its declared MIME type and filename.
///
/// The image check runs before the video check: when the two signals
/// disagree (e.g. a video extension with an image MIME), the upload
/// classifies as an image. Callers rely on this precedence.
pub fn sniff_media_type(
    config: &MediaConfig,
    content_type: &str,
    filename: &str,
) -> Result<MediaType, MediaError> {
    let is_image = config.image_mime_types.iter().any(|m| m == content_type)
        || extension_matches(filename, &config.image_extensions);
    if is_image {
        return Ok(MediaType::Image);
    }

    let is_video = config.video_mime_types.iter().any(|m| m == content_type)
        || extension_matches(filename, &config.video_extensions);
    if is_video {
        return Ok(MediaType::Video);
    }

    Err(MediaError::UnsupportedMediaType)
}
