//! Configuration for the betting ledger

use crate::error::{Error, Result};
use crate::types::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Banks to create when the ledger opens, in creation order
    ///
    /// The first entry is the founding bank: the default context for the
    /// single-bank history and last-outcome queries.
    pub banks: Vec<BankConfig>,
}

/// One bank to create at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Bank address
    pub address: String,

    /// Human-readable name, shown by the selection UI
    pub name: String,

    /// Initial deposit in the smallest currency unit
    pub initial_deposit: Amount,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "bank-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            banks: vec![BankConfig {
                address: "bank-0001".to_string(),
                name: "Founding Bank".to_string(),
                initial_deposit: 50_000,
            }],
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// Overrides the founding bank of the default configuration.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(address) = std::env::var("BANK_ADDRESS") {
            config.banks[0].address = address;
        }

        if let Ok(name) = std::env::var("BANK_NAME") {
            config.banks[0].name = name;
        }

        if let Ok(deposit) = std::env::var("BANK_INITIAL_DEPOSIT") {
            config.banks[0].initial_deposit = deposit
                .parse()
                .map_err(|e| Error::Config(format!("Invalid BANK_INITIAL_DEPOSIT: {}", e)))?;
        }

        Ok(config)
    }

    /// Check that the bank roster is usable
    pub fn validate(&self) -> Result<()> {
        if self.banks.is_empty() {
            return Err(Error::Config("At least one bank is required".to_string()));
        }

        let mut seen = HashSet::new();
        for bank in &self.banks {
            if !seen.insert(bank.address.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate bank address: {}",
                    bank.address
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "bank-core");
        assert_eq!(config.banks.len(), 1);
        assert_eq!(config.banks[0].initial_deposit, 50_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_roster() {
        let config = Config {
            banks: vec![],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_addresses() {
        let mut config = Config::default();
        config.banks.push(config.banks[0].clone());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(
            &path,
            r#"
service_name = "bank-core"
service_version = "0.1.0"

[[banks]]
address = "bank-a"
name = "Bank A"
initial_deposit = 75000
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.banks[0].address, "bank-a");
        assert_eq!(config.banks[0].initial_deposit, 75_000);
    }
}
