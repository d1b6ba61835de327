use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::time::Duration;

use crate::inputs::IntoZakatDecimal;
use crate::types::ZakatError;

/// Grams of gold that make up the Nisab.
pub const NISAB_GOLD_GRAMS: Decimal = dec!(85);
/// Gold price per gram the default Nisab value was derived from.
pub const DEFAULT_GOLD_PRICE_PER_GRAM: Decimal = dec!(70);
/// 85 g of gold at 70 per gram.
pub const DEFAULT_NISAB_VALUE: Decimal = dec!(5950);
/// 2.5%.
pub const DEFAULT_ZAKAT_RATE: Decimal = dec!(0.025);

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Parameters of the Zakat calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatConfig {
    /// Minimum zakat base (inclusive) at which Zakat is owed.
    pub nisab_value: Decimal,
    pub zakat_rate: Decimal,
}

impl Default for ZakatConfig {
    fn default() -> Self {
        ZakatConfig {
            nisab_value: DEFAULT_NISAB_VALUE,
            zakat_rate: DEFAULT_ZAKAT_RATE,
        }
    }
}

impl std::str::FromStr for ZakatConfig {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: ZakatConfig = serde_json::from_str(s)
            .map_err(|e| ZakatError::Configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl ZakatConfig {
    pub fn builder() -> ZakatConfigBuilder {
        ZakatConfigBuilder::default()
    }

    pub fn new(nisab_value: impl IntoZakatDecimal, zakat_rate: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        let config = Self {
            nisab_value: nisab_value.into_zakat_decimal()?,
            zakat_rate: zakat_rate.into_zakat_decimal()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Derives the Nisab from a gold price (85 g of gold), keeping the default rate.
    pub fn from_gold_price(price_per_gram: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        Self::builder().gold_price(price_per_gram).build()
    }

    pub fn validate(&self) -> Result<(), ZakatError> {
        if self.nisab_value < Decimal::ZERO {
            return Err(ZakatError::Configuration("Nisab value must be non-negative".to_string()));
        }
        if self.zakat_rate <= Decimal::ZERO || self.zakat_rate > Decimal::ONE {
            return Err(ZakatError::Configuration(format!(
                "Zakat rate must be in (0, 1], got {}",
                self.zakat_rate
            )));
        }
        Ok(())
    }

    /// Loads overrides from `ZAKAT_NISAB_VALUE` and `ZAKAT_RATE`; unset variables keep defaults.
    pub fn from_env() -> Result<Self, ZakatError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ZakatError> {
        let mut builder = Self::builder();
        if let Some(nisab) = lookup("ZAKAT_NISAB_VALUE") {
            builder = builder.nisab_value(nisab);
        }
        if let Some(rate) = lookup("ZAKAT_RATE") {
            builder = builder.zakat_rate(rate);
        }
        builder.build()
    }

    pub fn try_from_json(path: &str) -> Result<Self, ZakatError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ZakatError::Configuration(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    pub fn with_nisab_value(mut self, nisab_value: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.nisab_value = nisab_value.into_zakat_decimal()?;
        self.validate()?;
        Ok(self)
    }

    pub fn with_zakat_rate(mut self, zakat_rate: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.zakat_rate = zakat_rate.into_zakat_decimal()?;
        self.validate()?;
        Ok(self)
    }
}

// ========== ZakatConfigBuilder ==========

/// Builder for [`ZakatConfig`]. Conversion errors are collected and reported by `build`.
#[derive(Debug, Default)]
pub struct ZakatConfigBuilder {
    nisab_value: Option<Decimal>,
    gold_price: Option<Decimal>,
    zakat_rate: Option<Decimal>,
    errors: Vec<ZakatError>,
}

impl ZakatConfigBuilder {
    fn record(&mut self, value: impl IntoZakatDecimal) -> Option<Decimal> {
        match value.into_zakat_decimal() {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    pub fn nisab_value(mut self, value: impl IntoZakatDecimal) -> Self {
        self.nisab_value = self.record(value);
        self
    }

    /// Sets the Nisab from a gold price per gram. An explicit `nisab_value` wins.
    pub fn gold_price(mut self, price_per_gram: impl IntoZakatDecimal) -> Self {
        self.gold_price = self.record(price_per_gram);
        self
    }

    pub fn zakat_rate(mut self, rate: impl IntoZakatDecimal) -> Self {
        self.zakat_rate = self.record(rate);
        self
    }

    pub fn build(mut self) -> Result<ZakatConfig, ZakatError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        if let Some(price) = self.gold_price
            && price < Decimal::ZERO
        {
            return Err(ZakatError::Configuration("Gold price must be non-negative".to_string()));
        }

        let nisab_value = self
            .nisab_value
            .or_else(|| self.gold_price.map(|price| price * NISAB_GOLD_GRAMS))
            .unwrap_or(DEFAULT_NISAB_VALUE);

        let config = ZakatConfig {
            nisab_value,
            zakat_rate: self.zakat_rate.unwrap_or(DEFAULT_ZAKAT_RATE),
        };
        config.validate()?;
        Ok(config)
    }
}

// ========== ClientConfig ==========

/// Settings for talking to the audit backend.
///
/// Built explicitly and handed to the client at construction time; nothing in
/// the network layer reads the environment on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Substitute sample data when a call fails instead of surfacing the error.
    pub allow_fallback: bool,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            allow_fallback: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Reads `SHARIAH_AUDIT_API_URL`, `SHARIAH_AUDIT_ALLOW_FALLBACK` and
    /// `SHARIAH_AUDIT_TIMEOUT_MS`.
    ///
    /// Without an API URL the client runs in demo mode: fallback is allowed
    /// unless explicitly disabled.
    pub fn from_env() -> Result<Self, ZakatError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ZakatError> {
        let api_url = lookup("SHARIAH_AUDIT_API_URL").filter(|url| !url.trim().is_empty());
        let demo_mode = api_url.is_none();

        let allow_fallback = match lookup("SHARIAH_AUDIT_ALLOW_FALLBACK") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ZakatError::Configuration(format!("Invalid SHARIAH_AUDIT_ALLOW_FALLBACK value: {}", raw))
            })?,
            None => demo_mode,
        };

        let request_timeout_ms = match lookup("SHARIAH_AUDIT_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ZakatError::Configuration(format!("Invalid SHARIAH_AUDIT_TIMEOUT_MS value: {}", e))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        let config = Self {
            api_base_url: api_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            allow_fallback,
            request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ZakatError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ZakatError::Configuration(format!(
                "API base URL must be http(s), got {:?}",
                self.api_base_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ZakatError::Configuration("Request timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `{base}/{path}` with exactly one separating slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The health endpoint lives beside the API root, not under it.
    pub fn health_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let root = base.strip_suffix("/api").unwrap_or(base);
        format!("{}/health", root)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ZakatConfig::default();
        assert_eq!(config.nisab_value, dec!(5950));
        assert_eq!(config.zakat_rate, dec!(0.025));
        assert_eq!(DEFAULT_GOLD_PRICE_PER_GRAM * NISAB_GOLD_GRAMS, DEFAULT_NISAB_VALUE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ZakatConfig::new(-1, dec!(0.025)).is_err());
        assert!(ZakatConfig::new(5950, 0).is_err());
        assert!(ZakatConfig::new(5950, 2).is_err());
        assert!(ZakatConfig::new(0, 1).is_ok());
    }

    #[test]
    fn test_builder_gold_price() {
        let config = ZakatConfig::from_gold_price(100).unwrap();
        assert_eq!(config.nisab_value, dec!(8500));

        let explicit = ZakatConfig::builder().gold_price(100).nisab_value(1000).build().unwrap();
        assert_eq!(explicit.nisab_value, dec!(1000));

        assert!(ZakatConfig::builder().gold_price(-5).build().is_err());
        assert!(ZakatConfig::builder().zakat_rate("abc").build().is_err());
    }

    #[test]
    fn test_parse_json() {
        let config: ZakatConfig = r#"{"nisab_value": 8500}"#.parse().unwrap();
        assert_eq!(config.nisab_value, dec!(8500));
        assert_eq!(config.zakat_rate, dec!(0.025));

        assert!(r#"{"zakat_rate": 5}"#.parse::<ZakatConfig>().is_err());
    }

    #[test]
    fn test_zakat_config_from_lookup() {
        let config = ZakatConfig::from_lookup(lookup(&[("ZAKAT_NISAB_VALUE", "6000")])).unwrap();
        assert_eq!(config.nisab_value, dec!(6000));
        assert_eq!(config.zakat_rate, dec!(0.025));

        assert!(ZakatConfig::from_lookup(lookup(&[("ZAKAT_RATE", "lots")])).is_err());
    }

    #[test]
    fn test_client_config_demo_mode_without_url() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.allow_fallback);
        assert_eq!(config.request_timeout_ms, 5000);
    }

    #[test]
    fn test_client_config_with_url_surfaces_errors_by_default() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SHARIAH_AUDIT_API_URL", "https://audit.example.com/api"),
            ("SHARIAH_AUDIT_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert!(!config.allow_fallback);
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));

        let forced = ClientConfig::from_lookup(lookup(&[
            ("SHARIAH_AUDIT_API_URL", "https://audit.example.com/api"),
            ("SHARIAH_AUDIT_ALLOW_FALLBACK", "yes"),
        ]))
        .unwrap();
        assert!(forced.allow_fallback);

        assert!(ClientConfig::from_lookup(lookup(&[("SHARIAH_AUDIT_ALLOW_FALLBACK", "maybe")])).is_err());
    }

    #[test]
    fn test_endpoints() {
        let config = ClientConfig::new("http://localhost:5000/api/");
        assert_eq!(config.endpoint("/audit"), "http://localhost:5000/api/audit");
        assert_eq!(config.health_url(), "http://localhost:5000/health");

        let bare = ClientConfig::new("https://backend.example.com");
        assert_eq!(bare.health_url(), "https://backend.example.com/health");
        assert!(ClientConfig::new("ftp://x").validate().is_err());
    }
}
