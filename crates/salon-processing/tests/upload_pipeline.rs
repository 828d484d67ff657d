//! End-to-end pipeline tests over real temp directories, with a scripted
//! prober standing in for ffmpeg.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use salon_core::MediaConfig;
use salon_processing::{MediaError, MediaPipeline, MediaProber};
use tempfile::TempDir;

/// Scripted prober: returns a fixed duration, counts invocations, and writes
/// a stub thumbnail unless told to fail.
struct FakeProber {
    duration: Option<f64>,
    fail_extract: bool,
    probe_calls: AtomicUsize,
    extract_calls: AtomicUsize,
}

impl FakeProber {
    fn new(duration: Option<f64>) -> Self {
        Self {
            duration,
            fail_extract: false,
            probe_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
        }
    }

    fn failing_extract(duration: Option<f64>) -> Self {
        Self {
            fail_extract: true,
            ..Self::new(duration)
        }
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe_duration(&self, _path: &Path) -> Option<f64> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.duration
    }

    async fn extract_frame(
        &self,
        _path: &Path,
        _at_second: f64,
        _max_width: u32,
        out: &Path,
    ) -> Result<(), MediaError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_extract {
            return Err(MediaError::ThumbnailGenerationFailed(
                "scripted failure".to_string(),
            ));
        }
        std::fs::write(out, b"stub frame").unwrap();
        Ok(())
    }
}

struct Harness {
    _root: TempDir,
    pipeline: MediaPipeline,
    prober: Arc<FakeProber>,
    upload_dir: PathBuf,
    thumb_dir: PathBuf,
}

fn harness(prober: FakeProber) -> Harness {
    let root = TempDir::new().unwrap();
    let config = MediaConfig::with_root(root.path());
    config.ensure_dirs().unwrap();
    let prober = Arc::new(prober);
    Harness {
        upload_dir: config.upload_dir.clone(),
        thumb_dir: config.thumb_dir.clone(),
        pipeline: MediaPipeline::new(config, prober.clone()),
        prober,
        _root: root,
    }
}

fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 251) as u8, (y % 241) as u8, 17])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn wide_jpeg_produces_bounded_thumbnail() {
    let h = harness(FakeProber::new(None));
    let mut source = Cursor::new(jpeg_bytes(2000, 1000));

    let upload = h
        .pipeline
        .process_image_upload(&mut source, "image/jpeg", "photo.jpg")
        .await
        .unwrap();

    assert!(upload.file_path.exists());
    assert!(upload.thumb_path.exists());
    assert_eq!(upload.file_path.extension().unwrap(), "jpg");
    let (w, hgt) = image::image_dimensions(&upload.thumb_path).unwrap();
    assert_eq!(w, 512);
    assert!((255..=257).contains(&hgt), "height was {}", hgt);
}

#[tokio::test]
async fn oversize_image_leaves_no_files_behind() {
    let h = harness(FakeProber::new(None));
    let max = h.pipeline.config().max_image_bytes;
    let mut source = Cursor::new(vec![0u8; (max + 1) as usize]);

    let result = h
        .pipeline
        .process_image_upload(&mut source, "image/jpeg", "big.jpg")
        .await;

    assert!(matches!(result, Err(MediaError::FileTooLarge { .. })));
    assert!(dir_entries(&h.upload_dir).is_empty());
    assert!(dir_entries(&h.thumb_dir).is_empty());
}

#[tokio::test]
async fn corrupt_image_fails_and_removes_original() {
    let h = harness(FakeProber::new(None));
    let mut source = Cursor::new(b"not an image at all".to_vec());

    let result = h
        .pipeline
        .process_image_upload(&mut source, "image/png", "broken.png")
        .await;

    assert!(matches!(result, Err(MediaError::InvalidMedia(_))));
    assert!(dir_entries(&h.upload_dir).is_empty());
}

#[tokio::test]
async fn sequential_identical_uploads_do_not_collide() {
    let h = harness(FakeProber::new(None));
    let bytes = jpeg_bytes(100, 100);

    let mut first = Cursor::new(bytes.clone());
    let a = h
        .pipeline
        .process_image_upload(&mut first, "image/jpeg", "same.jpg")
        .await
        .unwrap();
    let mut second = Cursor::new(bytes);
    let b = h
        .pipeline
        .process_image_upload(&mut second, "image/jpeg", "same.jpg")
        .await
        .unwrap();

    assert_ne!(a.file_path, b.file_path);
    assert_eq!(dir_entries(&h.upload_dir).len(), 2);
}

#[tokio::test]
async fn video_within_ceiling_gets_thumbnail_and_duration() {
    let h = harness(FakeProber::new(Some(42.5)));
    let mut source = Cursor::new(vec![1u8; 4096]);

    let upload = h
        .pipeline
        .process_video_upload(&mut source, "video/mp4", "clip.mp4")
        .await
        .unwrap();

    assert_eq!(upload.duration, Some(42.5));
    assert!(upload.file_path.exists());
    assert!(upload.thumb_path.exists());
    assert_eq!(upload.file_path.extension().unwrap(), "mp4");
    assert_eq!(upload.thumb_path.extension().unwrap(), "jpg");
    assert_eq!(
        upload.file_path.file_stem().unwrap(),
        upload.thumb_path.file_stem().unwrap()
    );
    assert_eq!(h.prober.extract_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn over_long_video_is_deleted_without_frame_extraction() {
    // Probed 200s against the 180s default ceiling.
    let h = harness(FakeProber::new(Some(200.0)));
    let mut source = Cursor::new(vec![1u8; 4096]);

    let result = h
        .pipeline
        .process_video_upload(&mut source, "video/mp4", "clip.mp4")
        .await;

    assert!(matches!(
        result,
        Err(MediaError::VideoTooLong { duration, .. }) if duration == 200.0
    ));
    assert!(dir_entries(&h.upload_dir).is_empty());
    assert_eq!(h.prober.probe_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.prober.extract_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_duration_still_succeeds() {
    let h = harness(FakeProber::new(None));
    let mut source = Cursor::new(vec![1u8; 2048]);

    let upload = h
        .pipeline
        .process_video_upload(&mut source, "video/webm", "clip.webm")
        .await
        .unwrap();

    assert_eq!(upload.duration, None);
    assert!(upload.thumb_path.exists());
    assert_eq!(upload.file_path.extension().unwrap(), "webm");
    assert_eq!(h.prober.extract_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn frame_extraction_failure_removes_original() {
    let h = harness(FakeProber::failing_extract(Some(10.0)));
    let mut source = Cursor::new(vec![1u8; 2048]);

    let result = h
        .pipeline
        .process_video_upload(&mut source, "video/mp4", "clip.mp4")
        .await;

    assert!(matches!(
        result,
        Err(MediaError::ThumbnailGenerationFailed(_))
    ));
    assert!(dir_entries(&h.upload_dir).is_empty());
}

#[tokio::test]
async fn video_without_classifiable_container_fails_before_probe() {
    let h = harness(FakeProber::new(Some(10.0)));
    let mut source = Cursor::new(vec![1u8; 2048]);

    let result = h
        .pipeline
        .process_video_upload(&mut source, "application/octet-stream", "clip")
        .await;

    assert!(matches!(result, Err(MediaError::UnsupportedMediaType)));
    assert!(dir_entries(&h.upload_dir).is_empty());
    assert_eq!(h.prober.probe_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversize_video_leaves_no_files_behind() {
    let h = harness(FakeProber::new(Some(10.0)));
    let max = h.pipeline.config().max_video_bytes;
    let mut source = Cursor::new(vec![0u8; (max + 1) as usize]);

    let result = h
        .pipeline
        .process_video_upload(&mut source, "video/mp4", "big.mp4")
        .await;

    assert!(matches!(result, Err(MediaError::FileTooLarge { .. })));
    assert!(dir_entries(&h.upload_dir).is_empty());
    assert_eq!(h.prober.probe_calls.load(Ordering::SeqCst), 0);
}
