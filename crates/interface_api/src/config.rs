//! API configuration

use core_kernel::Currency;
use serde::Deserialize;
use uuid::Uuid;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Company the server books for; generated at startup when absent
    pub company_id: Option<Uuid>,
    /// Currency of batches and of the ledger book
    pub currency: Currency,
    /// Prefix of petty cash references
    pub sequence_prefix: String,
    /// Zero-padded width of the reference number
    pub sequence_padding: usize,
    /// Seeds the standard chart of accounts and journals at startup
    pub seed_chart_of_accounts: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            company_id: None,
            currency: Currency::GTQ,
            sequence_prefix: "CC/".to_string(),
            sequence_padding: 5,
            seed_chart_of_accounts: true,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// Variables use the `API_` prefix (e.g. `API_PORT`, `API_SEQUENCE_PREFIX`);
    /// missing ones keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.currency, Currency::GTQ);
        assert_eq!(config.sequence_prefix, "CC/");
        assert_eq!(config.sequence_padding, 5);
        assert!(config.company_id.is_none());
        assert!(config.seed_chart_of_accounts);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: ApiConfig = serde_json::from_str(r#"{"port": 9090, "currency": "USD"}"#).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.sequence_padding, 5);
    }
}
