//! Shared application state handed to every handler.

use std::sync::Arc;

use salon_core::Config;
use salon_processing::MediaPipeline;
use salon_store::SubmissionStore;

pub struct AppState {
    pub config: Config,
    pub pipeline: MediaPipeline,
    pub store: Arc<dyn SubmissionStore>,
}

impl AppState {
    /// Absolute URL for a stored media file, or `None` if the path is not
    /// under the media root.
    pub fn media_url(&self, path: &str) -> Option<String> {
        let rel = self
            .config
            .media
            .media_relative(std::path::Path::new(path))?;
        Some(format!(
            "{}/media/{}",
            self.config.public_base_url.trim_end_matches('/'),
            rel
        ))
    }
}
