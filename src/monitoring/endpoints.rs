use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// Create monitoring router with health endpoints
pub fn monitoring_router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

/// Basic health check endpoint. Does not call the provider.
async fn health_check() -> impl IntoResponse {
    let health = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "thix_invoice_relay"
    });

    (StatusCode::OK, axum::Json(health))
}
