//! Error handling for the invoice relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AppError>;

/// Body returned to the browser client on any failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Payment provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Entity resolution error: {message}")]
    Resolution { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Timeout error: {operation}")]
    Timeout { operation: String },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    #[error("Provider request failed: {operation}")]
    Transport { operation: String },
}

impl AppError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
        }
    }

    pub fn transport(operation: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
        }
    }

    /// Only malformed client input is reported as a client error; every
    /// other failure is an internal error from the browser's point of view.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Provider { .. } => "PROVIDER_ERROR",
            AppError::Resolution { .. } => "RESOLUTION_ERROR",
            AppError::Parse { .. } => "PARSE_ERROR",
            AppError::Configuration { .. } => "CONFIG_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Timeout { .. } => "TIMEOUT",
            AppError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            AppError::Transport { .. } => "TRANSPORT_ERROR",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "Invalid invoice request",
            AppError::Resolution { .. } => "Failed to resolve user entity",
            _ => "Failed to create payment invoice",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ErrorResponse {
            error: self.summary().to_string(),
            code: self.error_code().to_string(),
            details: Some(self.to_string()),
        };

        tracing::error!("API Error: {} - {}", self.error_code(), self);

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn provider_error_is_internal_with_message_in_details() {
        let (status, body) = body_of(AppError::provider(400, "bad currency")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "PROVIDER_ERROR");
        assert_eq!(body.error, "Failed to create payment invoice");
        assert!(body.details.unwrap().contains("bad currency"));
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let (status, body) = body_of(AppError::bad_request("expected value")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "BAD_REQUEST");
    }

    #[test]
    fn every_request_scoped_failure_is_500() {
        let errors = [
            AppError::resolution("no record"),
            AppError::parse("no id"),
            AppError::timeout("autosync"),
            AppError::service_unavailable("thix"),
            AppError::transport("request to thix/order/payment/create failed"),
        ];
        for error in errors {
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
