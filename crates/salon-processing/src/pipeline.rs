//! Pipeline orchestrator: composes sniffing, bounded spooling, finalization,
//! probing, and thumbnailing per upload.
//!
//! Success returns both the final path and the thumbnail path (plus duration
//! for video); any failure aborts the remaining stages, cleans up whatever
//! files this invocation created, and surfaces the first error. Nothing here
//! retries: every failure is bad input or missing external tooling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use salon_core::MediaConfig;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::error::MediaError;
use crate::finalize::{finalize, image_extension, video_extension};
use crate::image_thumb::make_image_thumb;
use crate::probe::MediaProber;
use crate::spool::spool_to_temp;

/// Seek offset for video frame extraction. Skips black lead-in frames.
const FRAME_AT_SECOND: f64 = 1.0;

/// Result of a successful image upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_path: PathBuf,
    pub thumb_path: PathBuf,
    pub bytes: u64,
}

/// Result of a successful video upload. `duration` is `None` when the probe
/// could not determine one.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_path: PathBuf,
    pub thumb_path: PathBuf,
    pub bytes: u64,
    pub duration: Option<f64>,
}

/// Per-upload orchestrator. Stateless between calls; concurrent uploads only
/// share the upload/thumb directories, where every write lands under a fresh
/// random name.
pub struct MediaPipeline {
    config: MediaConfig,
    prober: Arc<dyn MediaProber>,
}

/// Best-effort removal. The caller is already propagating the error that
/// matters, so a failed cleanup is logged and swallowed.
fn discard(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %err, "Cleanup failed");
    }
}

impl MediaPipeline {
    pub fn new(config: MediaConfig, prober: Arc<dyn MediaProber>) -> Self {
        Self { config, prober }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    fn thumb_path_for(&self, final_path: &Path) -> Result<PathBuf, MediaError> {
        let stem = final_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| MediaError::InvalidMedia("final file has no stem".to_string()))?;
        Ok(self.config.thumb_dir.join(format!("{}.jpg", stem)))
    }

    /// Image branch: spool → finalize → thumbnail.
    #[tracing::instrument(skip(self, source))]
    pub async fn process_image_upload<R>(
        &self,
        source: &mut R,
        declared_mime: &str,
        filename: &str,
    ) -> Result<ImageUpload, MediaError>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let spool = spool_to_temp(
            source,
            declared_mime,
            &self.config.image_mime_types,
            self.config.max_image_bytes,
            &self.config.upload_dir,
        )
        .await?;

        let extension = image_extension(filename, declared_mime);
        let asset = finalize(spool, &self.config.upload_dir, extension).await?;

        let thumb_path =
            match make_image_thumb(&asset.path, &self.config.thumb_dir, self.config.thumb_max_width)
                .await
            {
                Ok(path) => path,
                Err(err) => {
                    // Never leave an original without its thumbnail.
                    discard(&asset.path);
                    return Err(err);
                }
            };

        tracing::info!(
            file = %asset.path.display(),
            thumb = %thumb_path.display(),
            bytes = asset.bytes,
            "Image upload processed"
        );
        Ok(ImageUpload {
            file_path: asset.path,
            thumb_path,
            bytes: asset.bytes,
        })
    }

    /// Video branch: spool → finalize → probe → duration ceiling → frame
    /// extraction. The ceiling check runs before extraction so an over-long
    /// video never costs a second decoder invocation.
    #[tracing::instrument(skip(self, source))]
    pub async fn process_video_upload<R>(
        &self,
        source: &mut R,
        declared_mime: &str,
        filename: &str,
    ) -> Result<VideoUpload, MediaError>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let spool = spool_to_temp(
            source,
            declared_mime,
            &self.config.video_mime_types,
            self.config.max_video_bytes,
            &self.config.upload_dir,
        )
        .await?;

        let extension = video_extension(filename, declared_mime)?;
        let asset = finalize(spool, &self.config.upload_dir, extension).await?;

        let duration = self.prober.probe_duration(&asset.path).await;
        if let Some(d) = duration {
            if d > self.config.max_video_seconds {
                discard(&asset.path);
                return Err(MediaError::VideoTooLong {
                    duration: d,
                    max_seconds: self.config.max_video_seconds,
                });
            }
        }

        let thumb_path = self.thumb_path_for(&asset.path)?;
        if let Err(err) = self
            .prober
            .extract_frame(
                &asset.path,
                FRAME_AT_SECOND,
                self.config.thumb_max_width,
                &thumb_path,
            )
            .await
        {
            discard(&asset.path);
            return Err(err);
        }

        tracing::info!(
            file = %asset.path.display(),
            thumb = %thumb_path.display(),
            bytes = asset.bytes,
            duration = ?duration,
            "Video upload processed"
        );
        Ok(VideoUpload {
            file_path: asset.path,
            thumb_path,
            bytes: asset.bytes,
            duration,
        })
    }
}
