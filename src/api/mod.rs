pub mod payment_invoice;

use axum::{routing::post, Router};
use std::sync::Arc;

use crate::state::AppState;

/// Creates the API router with all REST endpoints
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/create-payment-invoice",
        post(payment_invoice::create_payment_invoice),
    )
}
