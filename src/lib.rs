use axum::{middleware as axum_middleware, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod domains;
pub mod monitoring;
pub mod security;
pub mod state;

use api::create_api_router;
use monitoring::monitoring_router;
use security::security_headers_middleware;
use state::AppState;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    let static_dir = Path::new(&app_state.config.app.static_dir).to_path_buf();

    Router::new()
        // Página de pago
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .merge(monitoring_router())
        .merge(create_api_router())
        // Remaining assets straight from the static directory
        .fallback_service(ServeDir::new(static_dir))
        .with_state(app_state)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}
