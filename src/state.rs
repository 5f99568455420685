use shared::{Config, Result, ServiceClient};

use crate::domains::payments::{InvoiceRelay, UserIdentity};

/// Estado compartido de la aplicación.
/// Solo lectura tras el arranque; cada petición trabaja con sus propias copias.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub invoice_relay: InvoiceRelay,
    pub demo_identity: UserIdentity,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = ServiceClient::from_config(&config.thix)?;
        let invoice_relay = InvoiceRelay::new(client);
        let demo_identity = UserIdentity::from(&config.demo_user);

        tracing::info!(
            base_url = %config.thix.base_url,
            timeout_seconds = config.thix.timeout_seconds,
            max_retries = config.thix.max_retries,
            "Thix client configured"
        );

        Ok(AppState {
            config,
            invoice_relay,
            demo_identity,
        })
    }
}
