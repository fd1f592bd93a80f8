//! HTTP and WebSocket routes.

mod api;
mod session;
mod ws;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// The bundled viewer assets.
pub fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Create the main router with all routes.
pub fn create_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let static_dir = static_dir.unwrap_or_else(default_static_dir);

    Router::new()
        // Generation and analysis
        .route("/api/chat", post(api::chat))
        .route("/api/generate", post(api::generate))
        .route("/api/recommendations", post(api::recommendations))
        .route("/api/traits/generate", post(api::generate_trait))
        .route("/api/generate-image", post(api::generate_image))
        .route("/api/analyze-performance", post(api::analyze_performance))
        // Session
        .route("/api/catalog", get(session::get_catalog))
        .route("/api/assembly", get(session::get_assembly))
        .route("/api/assembly/:slot/drop", post(session::drop_trait))
        .route("/api/session/recommendations", get(session::get_recommendations))
        .route(
            "/api/preferences",
            get(session::get_preferences).put(session::put_preferences),
        )
        .route("/api/robot", get(session::get_robot).put(session::put_robot))
        .route("/api/robot/image", post(session::robot_image))
        .route("/api/robots/base/:env", get(session::base_robot))
        // Simulation stream
        .route("/ws/simulation", get(ws::simulation_handler))
        // Static files (serve index.html as fallback)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        // CORS for development
        .layer(CorsLayer::permissive())
        .with_state(state)
}
