use std::sync::Arc;
use std::time::Duration;

use salon_api::setup::{build_router, start_server};
use salon_api::state::AppState;
use salon_api::telemetry::init_telemetry;
use salon_core::Config;
use salon_processing::{FfmpegProber, MediaPipeline};
use salon_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    init_telemetry();

    let config = Config::from_env()?;
    config.media.ensure_dirs()?;

    let prober = Arc::new(FfmpegProber::new(
        config.media.ffmpeg_path.clone(),
        Duration::from_secs(config.media.ffmpeg_timeout_seconds),
    ));
    let pipeline = MediaPipeline::new(config.media.clone(), prober);
    let store = Arc::new(MemoryStore::new());

    let port = config.server_port;
    let state = Arc::new(AppState {
        config,
        pipeline,
        store,
    });

    start_server(port, build_router(state)).await
}
