use super::currency::Currency;
use super::metrics::DateStyle;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBP_BASE_URL: &str = "http://api.nbp.pl";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NbpProviderConfig {
    pub base_url: String,
}

impl Default for NbpProviderConfig {
    fn default() -> Self {
        NbpProviderConfig {
            base_url: DEFAULT_NBP_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub nbp: NbpProviderConfig,
}

fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default)]
    pub date_style: DateStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: Currency::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            date_style: DateStyle::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to
    /// defaults when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "ratewatch", "ratewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  nbp:
    base_url: "http://example.com/nbp"
currency: "EUR"
lookback_days: 90
date_style: locale
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.nbp.base_url, "http://example.com/nbp");
        assert_eq!(config.currency, Currency::Eur);
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.date_style, DateStyle::Locale);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: uah").unwrap();
        assert_eq!(config.currency, Currency::Uah);
        assert_eq!(config.providers.nbp.base_url, DEFAULT_NBP_BASE_URL);
        assert_eq!(config.lookback_days, 365);
        assert_eq!(config.date_style, DateStyle::Iso);

        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.currency, Currency::Usd);
    }

    #[test]
    fn test_unsupported_currency_is_rejected() {
        let result = serde_yaml::from_str::<AppConfig>("currency: GBP");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "currency: EUR\nlookback_days: 30\n")?;

        let config = AppConfig::load_from_path(&path)?;
        assert_eq!(config.currency, Currency::Eur);
        assert_eq!(config.lookback_days, 30);

        let missing = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(missing.unwrap_err().to_string().contains("Failed to read"));
        Ok(())
    }
}
