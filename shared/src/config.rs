//! Configuration management for the invoice relay

use crate::{error::AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub thix: ThixConfig,
    pub demo_user: DemoUserConfig,
    pub app: AppConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ThixConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

// The api key must never reach the logs.
impl std::fmt::Debug for ThixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThixConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Placeholder identity synced with the provider for every invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUserConfig {
    pub third_party_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_key = lookup("THIX_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::configuration("THIX_API_KEY must be set"))?;

        Ok(Config {
            thix: ThixConfig {
                api_key,
                base_url: var("THIX_API_BASE_URL", "https://api.thix.xyz")
                    .trim_end_matches('/')
                    .to_string(),
                timeout_seconds: parse_var("THIX_TIMEOUT_SECONDS", &var("THIX_TIMEOUT_SECONDS", "15"))?,
                max_retries: parse_var("THIX_MAX_RETRIES", &var("THIX_MAX_RETRIES", "1"))?,
            },
            demo_user: DemoUserConfig {
                third_party_id: var("DEMO_THIRD_PARTY_ID", "demo-user-001"),
                first_name: var("DEMO_FIRST_NAME", "Demo"),
                last_name: var("DEMO_LAST_NAME", "Player"),
                email: var("DEMO_EMAIL", "demo.player@example.com"),
                phone: var("DEMO_PHONE", "+10000000000"),
            },
            app: AppConfig {
                environment: var("ENVIRONMENT", "development"),
                port: parse_var("PORT", &var("PORT", "3000"))?,
                static_dir: var("STATIC_DIR", "static"),
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::configuration(format!("{} has an invalid value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("THIX_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = config_from(&[("THIX_API_KEY", "   ")]).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = config_from(&[("THIX_API_KEY", "sk_test")]).unwrap();

        assert_eq!(config.thix.api_key, "sk_test");
        assert_eq!(config.thix.timeout_seconds, 15);
        assert_eq!(config.thix.max_retries, 1);
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.app.static_dir, "static");
        assert_eq!(config.demo_user.third_party_id, "demo-user-001");
        assert_eq!(config.app.environment, "development");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[
            ("THIX_API_KEY", "sk_test"),
            ("THIX_API_BASE_URL", "http://localhost:9000/"),
        ])
        .unwrap();
        assert_eq!(config.thix.base_url, "http://localhost:9000");
    }

    #[test]
    fn invalid_numbers_are_configuration_errors() {
        let err = config_from(&[("THIX_API_KEY", "sk_test"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let config = config_from(&[("THIX_API_KEY", "sk_live_secret")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk_live_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
