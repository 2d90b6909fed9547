//! Module configuration
//!
//! Values come from a JSON file or defaults, and can be overridden from the
//! environment (`LSM_AUTHORITY`, `LSM_MODULE_ACCOUNT_PREFIX`).

use lsm_core::AccAddress;
use lsm_host::pools::{module_address, GOV_MODULE_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LiquidError, LiquidResult};

pub const ENV_AUTHORITY: &str = "LSM_AUTHORITY";
pub const ENV_MODULE_ACCOUNT_PREFIX: &str = "LSM_MODULE_ACCOUNT_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidConfig {
    /// Only this address may update params
    #[serde(default = "default_authority")]
    pub authority: AccAddress,

    /// Custodial module accounts are named `{prefix}{record_id}`
    #[serde(default = "default_module_account_prefix")]
    pub module_account_prefix: String,
}

fn default_authority() -> AccAddress {
    module_address(GOV_MODULE_NAME)
}

fn default_module_account_prefix() -> String {
    "tokenizeshare_".to_string()
}

impl Default for LiquidConfig {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            module_account_prefix: default_module_account_prefix(),
        }
    }
}

impl LiquidConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> LiquidResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> LiquidResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of `self`
    pub fn with_env_overrides(self) -> LiquidResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> LiquidResult<Self> {
        if let Some(authority) = lookup(ENV_AUTHORITY) {
            self.authority = AccAddress::new(authority)?;
        }
        if let Some(prefix) = lookup(ENV_MODULE_ACCOUNT_PREFIX) {
            self.module_account_prefix = prefix;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> LiquidResult<()> {
        if self.module_account_prefix.is_empty() {
            return Err(LiquidError::InvalidRequest(
                "module account prefix cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LiquidConfig::default();
        assert_eq!(config.authority, module_address("gov"));
        assert_eq!(config.module_account_prefix, "tokenizeshare_");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LiquidConfig::from_json(r#"{"authority":"council"}"#).unwrap();
        assert_eq!(config.authority.as_str(), "council");
        assert_eq!(config.module_account_prefix, "tokenizeshare_");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"module_account_prefix":"custody_"}}"#).unwrap();

        let config = LiquidConfig::from_file(file.path()).unwrap();
        assert_eq!(config.module_account_prefix, "custody_");
    }

    #[test]
    fn test_overrides() {
        let config = LiquidConfig::default()
            .with_overrides(|key| match key {
                ENV_AUTHORITY => Some("admin".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.authority.as_str(), "admin");

        let bad = LiquidConfig::default().with_overrides(|key| match key {
            ENV_MODULE_ACCOUNT_PREFIX => Some(String::new()),
            _ => None,
        });
        assert!(bad.is_err());
    }
}
