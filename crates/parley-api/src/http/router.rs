//! Axum router configuration with middleware.
//!
//! Static assets are served from the configured directory under `/static`
//! when it exists; otherwise only the page and API routes are mounted.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/create_chat", post(handlers::chat::create_chat))
        .route("/api/send_message", post(handlers::chat::send_message))
        .route("/health", get(health_check));

    if state.static_dir.is_dir() {
        tracing::info!(path = %state.static_dir.display(), "Static file serving enabled");
        router = router.nest_service("/static", ServeDir::new(&state.static_dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /health - Liveness check with the number of chats in memory.
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let chats = state.chat_service.chat_count().await?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chats": chats,
    })))
}
