//! HTTP client for the Thix payment provider API

use crate::{config::ThixConfig, error::AppError, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    api_key: String,
    service_name: String,
    max_retries: u32,
}

/// Status and raw body of a provider response.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: String,
}

impl ServiceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            service_name: "thix".to_string(),
            max_retries,
        })
    }

    pub fn from_config(config: &ThixConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.max_retries,
        )
    }

    /// POST a JSON body with the api key header attached.
    ///
    /// Only failures to connect are retried: the request never reached the
    /// provider, so repeating it cannot create a duplicate invoice.
    pub async fn post<T>(&self, endpoint: &str, body: &T) -> Result<ProviderReply>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt = 0;

        let response = loop {
            let result = self
                .client
                .post(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        error = %e,
                        "Connection to {} failed, retrying",
                        self.service_name
                    );
                }
                Err(e) => return Err(self.map_reqwest_error(endpoint, e)),
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(endpoint, e))?;

        debug!(endpoint = %endpoint, status = %status, "Provider responded");

        Ok(ProviderReply { status, body })
    }

    fn map_reqwest_error(&self, endpoint: &str, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::timeout(format!("Request to {}{} timed out", self.service_name, endpoint))
        } else if error.is_connect() {
            AppError::service_unavailable(&self.service_name)
        } else {
            // reqwest errors quote the url; keep it in the logs only.
            error!(endpoint = %endpoint, error = %error, "Request to {} failed", self.service_name);
            AppError::transport(format!("request to {}{} failed", self.service_name, endpoint))
        }
    }
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body of a successful reply, or a provider error carrying
    /// only the provider's `message` field. The raw body is logged here and
    /// goes no further.
    pub fn into_success_body(self, operation: &str) -> Result<String> {
        if self.is_success() {
            return Ok(self.body);
        }

        error!(
            operation = %operation,
            status = %self.status,
            body = %self.body,
            "Provider returned an error"
        );

        let message = provider_message(&self.body)
            .unwrap_or_else(|| format!("HTTP {}", self.status.as_u16()));
        Err(AppError::provider(self.status.as_u16(), message))
    }
}

/// Extracts the `message` field of a provider error body, if any.
pub fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|message| message.as_str())
        .map(str::to_string)
}
