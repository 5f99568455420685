pub mod entity_resolver;
pub mod invoice_relay;
pub mod models;

pub use entity_resolver::EntityResolver;
pub use invoice_relay::InvoiceRelay;
pub use models::{InvoiceRequest, InvoiceResult, UserIdentity};
