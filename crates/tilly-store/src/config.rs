//! # Application Configuration
//!
//! Invoice template, currency symbol and store name, kept in `config.json`.
//!
//! ## Example Config File
//! ```json
//! {
//!   "invoice_template": "Invoice\n{order_time}\n{items}\nTotal: {currency} {total:.2f}\n",
//!   "currency_symbol": "GHS",
//!   "store_name": "Tilly POS"
//! }
//! ```
//!
//! Missing keys take their defaults and unknown keys are ignored, so config
//! files written by older versions keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilly_core::{InvoiceRenderer, DEFAULT_CURRENCY_SYMBOL, DEFAULT_INVOICE_TEMPLATE};
use tracing::{debug, error, info};

use crate::error::StoreResult;
use crate::json_file::{load_json_if_exists, save_json};

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Layout used for every invoice.
    #[serde(default = "default_invoice_template")]
    pub invoice_template: String,

    /// Printed before every amount on the invoice.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Value of `{store_name}`.
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

fn default_invoice_template() -> String {
    DEFAULT_INVOICE_TEMPLATE.to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_store_name() -> String {
    "Tilly POS".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            invoice_template: default_invoice_template(),
            currency_symbol: default_currency_symbol(),
            store_name: default_store_name(),
        }
    }
}

impl AppConfig {
    /// Loads `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> StoreResult<Self> {
        match load_json_if_exists(path)? {
            Some(config) => {
                info!(?path, "Loaded config");
                Ok(config)
            }
            None => {
                debug!(?path, "Config file not found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        })
    }

    /// Writes the whole config to `path`.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        save_json(path, self)?;
        info!(?path, "Config saved");
        Ok(())
    }

    /// Renderer carrying this config's currency symbol and store name.
    pub fn renderer(&self) -> InvoiceRenderer {
        InvoiceRenderer::new(self.currency_symbol.as_str()).with_store_name(self.store_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default() {
        let config: AppConfig = serde_json::from_str(r#"{"currency_symbol": "$"}"#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.invoice_template, DEFAULT_INVOICE_TEMPLATE);
        assert_eq!(config.store_name, "Tilly POS");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config: AppConfig =
            serde_json::from_str(r#"{"invoice_template": "{items}{total}", "theme": "dark"}"#)
                .unwrap();
        assert_eq!(config.invoice_template, "{items}{total}");
    }

    #[test]
    fn test_load_or_default_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(AppConfig::load(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            store_name: "Asanka Local".to_string(),
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
