//! Configuration module
//!
//! Environment-driven configuration with code defaults. `MediaConfig` is the
//! subset consumed by the processing pipeline; `Config` adds the server and
//! auth settings used by the API crate.

use std::env;
use std::path::{Path, PathBuf};

const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;
const MAX_VIDEO_SECONDS: f64 = 180.0;
const THUMB_MAX_WIDTH: u32 = 512;
const FFMPEG_TIMEOUT_SECONDS: u64 = 30;
const JWT_TTL_SECONDS: i64 = 3600;

/// Media pipeline configuration: directories, allow-sets, and ceilings.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub media_root: PathBuf,
    pub upload_dir: PathBuf,
    pub thumb_dir: PathBuf,
    pub image_mime_types: Vec<String>,
    pub video_mime_types: Vec<String>,
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
    pub max_video_seconds: f64,
    pub thumb_max_width: u32,
    pub ffmpeg_path: String,
    pub ffmpeg_timeout_seconds: u64,
}

impl MediaConfig {
    /// Build a config rooted at `media_root` with the default allow-sets and
    /// ceilings. Used directly by tests; `from_env` layers env overrides on top.
    pub fn with_root(media_root: impl Into<PathBuf>) -> Self {
        let media_root = media_root.into();
        let upload_dir = media_root.join("uploads");
        let thumb_dir = media_root.join("thumbs");
        Self {
            media_root,
            upload_dir,
            thumb_dir,
            image_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            video_mime_types: vec!["video/mp4".to_string(), "video/webm".to_string()],
            image_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            video_extensions: vec!["mp4".to_string(), "webm".to_string()],
            max_image_bytes: MAX_IMAGE_BYTES,
            max_video_bytes: MAX_VIDEO_BYTES,
            max_video_seconds: MAX_VIDEO_SECONDS,
            thumb_max_width: THUMB_MAX_WIDTH,
            ffmpeg_path: "ffmpeg".to_string(),
            ffmpeg_timeout_seconds: FFMPEG_TIMEOUT_SECONDS,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
        let mut config = Self::with_root(media_root);

        if let Ok(dir) = env::var("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("THUMB_DIR") {
            config.thumb_dir = PathBuf::from(dir);
        }
        if let Ok(mb) = env::var("MAX_IMAGE_MB") {
            config.max_image_bytes = mb.parse::<u64>()? * 1024 * 1024;
        }
        if let Ok(mb) = env::var("MAX_VIDEO_MB") {
            config.max_video_bytes = mb.parse::<u64>()? * 1024 * 1024;
        }
        if let Ok(secs) = env::var("MAX_VIDEO_SECONDS") {
            config.max_video_seconds = secs.parse()?;
        }
        if let Ok(width) = env::var("THUMB_MAX_WIDTH") {
            config.thumb_max_width = width.parse()?;
        }
        if let Ok(path) = env::var("FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }
        if let Ok(secs) = env::var("FFMPEG_TIMEOUT_SECONDS") {
            config.ffmpeg_timeout_seconds = secs.parse()?;
        }
        Ok(config)
    }

    /// Create the media root, upload, and thumbnail directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.media_root)?;
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.thumb_dir)?;
        Ok(())
    }

    /// Path of a stored file relative to the media root, for URL building.
    pub fn media_relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.media_root)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }
}

/// Application configuration (media pipeline + server + auth).
#[derive(Clone, Debug)]
pub struct Config {
    pub media: MediaConfig,
    pub server_port: u16,
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
    pub admin_password: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let media = MediaConfig::from_env()?;

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            media,
            server_port,
            public_base_url,
            cors_origins,
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string()),
            jwt_ttl_seconds: env::var("JWT_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(JWT_TTL_SECONDS),
        })
    }
}
