//! Router assembly and server startup.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, gallery, health, submissions};
use crate::state::AppState;

/// Margin over the video ceiling for multipart framing and metadata fields.
/// The pipeline's own byte ceiling stays the enforcer.
const BODY_LIMIT_MARGIN: u64 = 2 * 1024 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = (state.config.media.max_video_bytes + BODY_LIMIT_MARGIN) as usize;
    let media_dir = ServeDir::new(&state.config.media.media_root);
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/admin/login", post(admin::admin_login))
        .route("/api/submissions", post(submissions::create_submission))
        .route("/api/gallery", get(gallery::list_gallery))
        .route("/api/items/{id}", get(gallery::item_detail))
        .route("/api/admin/submissions", get(admin::list_submissions))
        .route(
            "/api/admin/submissions/{id}/approve",
            post(admin::approve_submission),
        )
        .route(
            "/api/admin/submissions/{id}/reject",
            post(admin::reject_submission),
        )
        .nest_service("/media", media_dir)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, router: Router) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port = port, "Server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
