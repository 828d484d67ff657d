//! Image thumbnailing: decode, normalize to RGB, proportionally downsize,
//! re-encode as a quality-90 JPEG.

use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::ImageReader;

use crate::error::MediaError;

const JPEG_QUALITY: u8 = 90;

fn decode_error(err: image::ImageError) -> MediaError {
    match err {
        image::ImageError::IoError(io) => MediaError::Io(io),
        other => MediaError::InvalidMedia(other.to_string()),
    }
}

/// Proportional target size: width capped at `max_width`, height rounded.
fn thumb_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let new_height = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, new_height.max(1))
}

/// Derive `{thumb_dir}/{src-stem}.jpg` from the finalized image at `src`.
///
/// Image decode is CPU-bound; it runs off the async pool. A corrupt or
/// truncated image surfaces as [`MediaError::InvalidMedia`].
pub async fn make_image_thumb(
    src: &Path,
    thumb_dir: &Path,
    max_width: u32,
) -> Result<PathBuf, MediaError> {
    let src = src.to_path_buf();
    let stem = src
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| MediaError::InvalidMedia("source file has no stem".to_string()))?;
    let out_path = thumb_dir.join(format!("{}.jpg", stem));

    let out = out_path.clone();
    tokio::task::spawn_blocking(move || -> Result<(), MediaError> {
        let data = std::fs::read(&src)?;
        let img = ImageReader::new(Cursor::new(&data))
            .with_guessed_format()
            .map_err(MediaError::Io)?
            .decode()
            .map_err(decode_error)?;

        // Drop alpha/palette: thumbnails are always 3-channel JPEG.
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let (thumb_w, thumb_h) = thumb_dimensions(width, height, max_width);
        let rgb = if (thumb_w, thumb_h) != (width, height) {
            imageops::resize(&rgb, thumb_w, thumb_h, FilterType::Triangle)
        } else {
            rgb
        };

        let file = std::fs::File::create(&out)?;
        let mut writer = BufWriter::new(file);
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        encoder.encode_image(&rgb).map_err(decode_error)?;
        Ok(())
    })
    .await??;

    Ok(out_path)
}
