//! Persistent CLI configuration.
//!
//! Loaded from `~/.config/shariah-audit/config.toml` on Linux,
//! `~/Library/Application Support/shariah-audit/config.toml` on macOS or
//! `%APPDATA%\shariah-audit\config.toml` on Windows. Command-line flags win
//! over file values, which win over the environment and built-in defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shariah_audit::config::DEFAULT_API_BASE_URL;
use shariah_audit::{ClientConfig, ZakatConfig, ZakatError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Backend base URL, e.g. `http://localhost:5000/api`.
    pub api_url: Option<String>,
    /// Serve sample data when the backend fails.
    pub allow_fallback: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub nisab_value: Option<Decimal>,
    pub zakat_rate: Option<Decimal>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

/// Values given on the command line for this run.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub allow_fallback: bool,
    pub timeout_ms: Option<u64>,
}

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shariah-audit"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads the default config file, or defaults if it is missing or broken.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("Could not determine config directory");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)?;
        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Writes a starter file at the default location.
    pub fn create_sample() -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let sample = CliConfig {
            api_url: Some(DEFAULT_API_BASE_URL.to_string()),
            allow_fallback: Some(true),
            timeout_ms: Some(5000),
            nisab_value: None,
            zakat_rate: None,
            enable_logging: Some(false),
        };
        sample.save_to(&path)?;
        Ok(path)
    }

    /// Zakat parameters: file values over `ZAKAT_NISAB_VALUE` / `ZAKAT_RATE`.
    pub fn zakat_config(&self) -> Result<ZakatConfig, ZakatError> {
        self.zakat_config_with(ZakatConfig::from_env()?)
    }

    fn zakat_config_with(&self, mut base: ZakatConfig) -> Result<ZakatConfig, ZakatError> {
        if let Some(nisab) = self.nisab_value {
            base = base.with_nisab_value(nisab)?;
        }
        if let Some(rate) = self.zakat_rate {
            base = base.with_zakat_rate(rate)?;
        }
        Ok(base)
    }

    /// Client settings: flags over file values over the `SHARIAH_AUDIT_*` environment.
    pub fn client_config(&self, overrides: &Overrides) -> Result<ClientConfig, ZakatError> {
        self.client_config_with(ClientConfig::from_env()?, overrides)
    }

    fn client_config_with(&self, mut base: ClientConfig, overrides: &Overrides) -> Result<ClientConfig, ZakatError> {
        if let Some(url) = overrides.api_url.as_ref().or(self.api_url.as_ref()) {
            base.api_base_url = url.clone();
        }
        if overrides.allow_fallback {
            base.allow_fallback = true;
        } else if let Some(allow) = self.allow_fallback {
            base.allow_fallback = allow;
        }
        if let Some(timeout_ms) = overrides.timeout_ms.or(self.timeout_ms) {
            base.request_timeout_ms = timeout_ms;
        }
        base.validate()?;
        Ok(base)
    }

    pub fn logging_enabled(&self) -> bool {
        self.enable_logging.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.api_url.is_none());
        assert!(!config.logging_enabled());
    }

    #[test]
    fn test_kebab_case_keys() {
        let config = CliConfig {
            api_url: Some("https://audit.example.com/api".to_string()),
            timeout_ms: Some(1500),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("api-url"));
        assert!(toml_str.contains("timeout-ms = 1500"));
    }

    #[test]
    fn test_load_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CliConfig::load_from(&dir.path().join("absent.toml")), CliConfig::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "api-url = [").unwrap();
        assert_eq!(CliConfig::load_from(&broken), CliConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = CliConfig {
            allow_fallback: Some(true),
            nisab_value: Some(dec!(6000)),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(CliConfig::load_from(&path), config);
    }

    #[test]
    fn test_flags_override_file() {
        let file = CliConfig {
            api_url: Some("http://file.example/api".to_string()),
            allow_fallback: Some(false),
            timeout_ms: Some(1000),
            ..Default::default()
        };
        let overrides = Overrides {
            api_url: Some("http://flag.example/api".to_string()),
            allow_fallback: true,
            timeout_ms: None,
        };

        let config = file.client_config_with(ClientConfig::default(), &overrides).unwrap();
        assert_eq!(config.api_base_url, "http://flag.example/api");
        assert!(config.allow_fallback);
        assert_eq!(config.request_timeout_ms, 1000);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let file = CliConfig {
            zakat_rate: Some(dec!(1.5)),
            ..Default::default()
        };
        assert!(file.zakat_config_with(ZakatConfig::default()).is_err());

        let file = CliConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(file.client_config_with(ClientConfig::default(), &Overrides::default()).is_err());
    }
}
