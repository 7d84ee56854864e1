use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sec_filings_core::service::{ServiceSettings, DEFAULT_API_VERSION, DEFAULT_SYMBOLS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub tickers: TickersConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickersConfig {
    /// SEC `company_tickers.json` dataset.
    pub path: PathBuf,
    /// Symbols listed by `GET /tickers/`.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_base_path() -> String {
    "/sec".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_version")]
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: default_api_version(),
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Response settings for the query service.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            api_version: self.api.version.clone(),
            symbols: self.tickers.symbols.clone(),
            base_path: self.server.base_path.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    let base = &config.server.base_path;
    if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
        anyhow::bail!(
            "server.base_path must be empty or start with '/' and not end with '/': '{}'",
            base
        );
    }

    if config.api.version.trim().is_empty() {
        anyhow::bail!("api.version must not be empty");
    }

    match config.logging.format.as_str() {
        "pretty" | "json" => {}
        other => anyhow::bail!(
            "Unknown logging format: '{}'. Must be pretty or json.",
            other
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[db]
path = "./data/sec.sqlite"

[tickers]
path = "./config/company_tickers.json"

[server]
bind = "127.0.0.1:5000"
"#;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        validate(&config).unwrap();
        assert_eq!(config.server.base_path, "/sec");
        assert_eq!(config.api.version, "0.1");
        assert_eq!(config.tickers.symbols.len(), 7);
        assert_eq!(config.tickers.symbols[0], "GOOG");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");

        let settings = config.service_settings();
        assert_eq!(settings.base_path, "/sec");
        assert_eq!(settings.api_version, "0.1");
    }

    #[test]
    fn test_empty_base_path_allowed() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.server.base_path = String::new();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_base_path_rejected() {
        for bad in ["sec", "/sec/"] {
            let mut config: Config = toml::from_str(MINIMAL).unwrap();
            config.server.base_path = bad.to_string();
            assert!(validate(&config).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_bad_logging_format_rejected() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.logging.format = "xml".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("logging format"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sec.toml");
        std::fs::write(
            &path,
            format!("{}\n[api]\nversion = \"0.2\"\n[logging]\nformat = \"json\"\n", MINIMAL),
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.api.version, "0.2");
        assert_eq!(config.logging.format, "json");
    }
}
