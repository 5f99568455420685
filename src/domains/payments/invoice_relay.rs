use shared::{AppError, Result, ServiceClient};
use tracing::{debug, error, info};

use super::entity_resolver::EntityResolver;
use super::models::{InvoiceCreated, InvoiceRequest, ProviderInvoicePayload, UserIdentity};

pub const PAYMENT_CREATE_ENDPOINT: &str = "/order/payment/create";

/// Creates provider invoices on behalf of a resolved user entity.
#[derive(Clone)]
pub struct InvoiceRelay {
    client: ServiceClient,
    resolver: EntityResolver,
}

impl InvoiceRelay {
    pub fn new(client: ServiceClient) -> Self {
        let resolver = EntityResolver::new(client.clone());
        Self { client, resolver }
    }

    /// Resolves the entity for `identity`, then creates the invoice.
    ///
    /// A resolution failure aborts before the invoice call is made.
    pub async fn create_invoice(
        &self,
        identity: &UserIdentity,
        request: InvoiceRequest,
    ) -> Result<String> {
        debug!("Phase 1: resolving entity");
        let user_entity_id = self.resolver.resolve_user_entity(identity).await?;

        debug!("Phase 2: creating invoice");
        let payload = ProviderInvoicePayload::new(request, user_entity_id);
        info!(payload = ?payload, "Sending invoice to provider");

        let body = self
            .client
            .post(PAYMENT_CREATE_ENDPOINT, &payload)
            .await?
            .into_success_body("payment_create")?;

        let invoice_id = parse_invoice_id(&body)?;
        info!(invoice_id = %invoice_id, "Invoice created");
        Ok(invoice_id)
    }
}

fn parse_invoice_id(body: &str) -> Result<String> {
    serde_json::from_str::<InvoiceCreated>(body)
        .map(InvoiceCreated::into_invoice_id)
        .map_err(|e| {
            error!(error = %e, body = %body, "Invoice id missing from provider response");
            AppError::parse("could not locate invoice identifier in provider response")
        })
}
