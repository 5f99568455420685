use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared::config::DemoUserConfig;

// ============================================================================
// CLIENT-FACING MODELS
// ============================================================================

/// Invoice request as submitted by the payment page.
///
/// Nothing is validated locally: fields are forwarded with whatever JSON type
/// the browser used, absent or null fields are left out of the provider
/// payload, and the provider decides whether to reject it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub description: Option<Value>,
    pub amount: Option<Amount>,
    pub currency: Option<Value>,
    pub merchant_ref_id: Option<Value>,
}

/// Amount as sent by the browser: normally a JSON number or a numeric
/// string, but any other value is accepted and stringified as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

// Integral floats below this bound print without a fractional part.
const MAX_EXACT_INTEGRAL: f64 = 1e15;

impl Amount {
    /// String form sent to the provider, which only accepts string amounts.
    pub fn to_provider_string(&self) -> String {
        match self {
            Amount::Number(number) => number_to_string(number),
            Amount::Text(text) => text.clone(),
            Amount::Other(value) => value.to_string(),
        }
    }
}

/// `10.0` and `1e2` become `"10"` and `"100"`, the way a browser prints them.
fn number_to_string(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() < MAX_EXACT_INTEGRAL =>
        {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResult {
    #[serde(rename = "invoiceId")]
    pub invoice_id: String,
}

// ============================================================================
// PROVIDER MODELS: USER AUTOSYNC
// ============================================================================

/// Identity synced with the provider before an invoice can be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub third_party_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&DemoUserConfig> for UserIdentity {
    fn from(config: &DemoUserConfig) -> Self {
        Self {
            third_party_id: config.third_party_id.clone(),
            first_name: config.first_name.clone(),
            last_name: config.last_name.clone(),
            email: config.email.clone(),
            phone: config.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserSyncRequest<'a> {
    pub users: [&'a UserIdentity; 1],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSyncResponse {
    #[serde(default)]
    pub entities_created: Vec<EntityRecord>,
    #[serde(default)]
    pub entities_existing: Vec<EntityRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    pub third_party_id: Option<String>,
    pub entity_id: Option<String>,
}

impl UserSyncResponse {
    /// Finds the record for `third_party_id`, looking at freshly created
    /// entities before existing ones.
    pub fn find(&self, third_party_id: &str) -> Option<&EntityRecord> {
        self.entities_created
            .iter()
            .chain(self.entities_existing.iter())
            .find(|record| record.third_party_id.as_deref() == Some(third_party_id))
    }
}

// ============================================================================
// PROVIDER MODELS: INVOICE CREATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInvoicePayload {
    pub invoice: InvoiceDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_ref_id: Option<Value>,
    pub user_entity_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

impl ProviderInvoicePayload {
    pub fn new(request: InvoiceRequest, user_entity_id: String) -> Self {
        Self {
            invoice: InvoiceDetails {
                description: request.description,
                amount: request.amount.as_ref().map(Amount::to_provider_string),
            },
            currency: request.currency,
            merchant_ref_id: request.merchant_ref_id,
            user_entity_id,
        }
    }
}

/// The provider reports the new invoice id in one of three shapes. Variants
/// are tried in declaration order, so `invoice_id` wins over `invoice.id`,
/// which wins over `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InvoiceCreated {
    Flat { invoice_id: String },
    Nested { invoice: NestedInvoice },
    Bare { id: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NestedInvoice {
    pub id: String,
}

impl InvoiceCreated {
    pub fn into_invoice_id(self) -> String {
        match self {
            InvoiceCreated::Flat { invoice_id } => invoice_id,
            InvoiceCreated::Nested { invoice } => invoice.id,
            InvoiceCreated::Bare { id } => id,
        }
    }
}
