use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::Json as ResponseJson,
};
use shared::AppError;
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::domains::payments::{InvoiceRequest, InvoiceResult};
use crate::state::AppState;

/// POST /create-payment-invoice
///
/// Syncs the demo user with Thix, creates the invoice for it and returns the
/// provider's invoice id.
pub async fn create_payment_invoice(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Result<ResponseJson<InvoiceResult>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("payment_invoice", request_id = %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            error!(error = %rejection.body_text(), "Rejected invoice request body");
            AppError::bad_request(rejection.body_text())
        })?;

        info!(
            description = ?request.description,
            amount = ?request.amount,
            currency = ?request.currency,
            merchant_ref_id = ?request.merchant_ref_id,
            "Received invoice request"
        );

        let invoice_id = app_state
            .invoice_relay
            .create_invoice(&app_state.demo_identity, request)
            .await
            .map_err(|e| {
                error!(error = %e, "Invoice request failed");
                e
            })?;

        info!(invoice_id = %invoice_id, "Invoice request completed");
        Ok::<_, AppError>(ResponseJson(InvoiceResult { invoice_id }))
    }
    .instrument(span)
    .await
}
