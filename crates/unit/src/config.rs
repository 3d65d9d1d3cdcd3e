//! Adapter configuration, read from the environment.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};

pub const DEFAULT_API_URL: &str = "https://api.s.unit.sh";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DEPOSIT_PRODUCT: &str = "checking";

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub timeout_secs: u64,
    /// Deposit product used when opening customer accounts.
    pub deposit_product: String,
}

impl std::fmt::Debug for UnitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("deposit_product", &self.deposit_product)
            .finish()
    }
}

impl UnitConfig {
    /// Loads `.env` if present, then reads `UNIT_API_URL`, `UNIT_API_TOKEN`,
    /// `UNIT_TIMEOUT_SECS` and `UNIT_DEPOSIT_PRODUCT`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Only the token is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_token = read("UNIT_API_TOKEN")
            .ok_or_else(|| UnitError::config("UNIT_API_TOKEN is not set"))?;
        let api_url = read("UNIT_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = match read("UNIT_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                UnitError::config(format!("UNIT_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let deposit_product =
            read("UNIT_DEPOSIT_PRODUCT").unwrap_or_else(|| DEFAULT_DEPOSIT_PRODUCT.to_string());

        Ok(Self {
            api_url,
            api_token,
            timeout_secs,
            deposit_product,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = UnitConfig::from_lookup(lookup(&[("UNIT_API_TOKEN", "secret")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.deposit_product, "checking");
    }

    #[test]
    fn reads_overrides() {
        let config = UnitConfig::from_lookup(lookup(&[
            ("UNIT_API_TOKEN", "secret"),
            ("UNIT_API_URL", "https://api.unit.co/"),
            ("UNIT_TIMEOUT_SECS", "5"),
            ("UNIT_DEPOSIT_PRODUCT", "savings"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.unit.co");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.deposit_product, "savings");
    }

    #[test]
    fn requires_token() {
        let err = UnitConfig::from_lookup(lookup(&[("UNIT_API_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, UnitError::Config(_)));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = UnitConfig::from_lookup(lookup(&[
            ("UNIT_API_TOKEN", "secret"),
            ("UNIT_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("UNIT_TIMEOUT_SECS"));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = UnitConfig::from_lookup(lookup(&[("UNIT_API_TOKEN", "secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
