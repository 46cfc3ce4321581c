//! HTTP surface
//!
//! Thin transport over the triage pipeline: the ticket listing, the
//! classify-and-answer operation, and liveness endpoints, with permissive
//! CORS for browser frontends.

pub mod handlers;
pub mod state;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::errors::{Result, TriageError};

pub use state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/tickets", get(handlers::get_tickets))
        .route("/api/classify_answer", post(handlers::classify_answer))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(bind: &str, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(TriageError::Io)?;
    info!(addr = %bind, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(TriageError::Io)?;

    Ok(())
}
