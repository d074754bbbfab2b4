//! Configuration management for brandprofiler
//!
//! All tunables live in `./config/brandprofiler.toml`. The defaults are the
//! embedded template; no hardcoded fallback values exist in source code.

use serde::Deserialize;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/brandprofiler.toml";

/// Default configuration file content - the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/brandprofiler.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty or zero")]
    EmptyRequired { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub search: SearchConfig,
    pub batch: BatchConfig,
}

/// HTTP fetch policy shared by the website fetcher and the search fallback
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_redirects: u32,
    pub max_body_bytes: usize,
}

/// Fallback search source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    pub query_suffix: String,
    pub min_response_bytes: usize,
    pub cooldown_ms: u64,
}

/// Batch pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub item_delay_ms: u64,
    pub min_rating: f64,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to the
    /// embedded template when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            tracing::info!("No config file at {}, using built-in defaults", CONFIG_PATH);
            Self::defaults()
        }
    }

    /// Parse the embedded default template
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.max_body_bytes".to_string(),
            });
        }
        if !self.search.base_url.starts_with("http://") && !self.search.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl {
                field: "search.base_url".to_string(),
                url: self.search.base_url.clone(),
            });
        }
        if self.search.min_response_bytes == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "search.min_response_bytes".to_string(),
            });
        }
        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        io::stdin().is_terminal()
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("No configuration file found. Create {}? [Y/n] ", CONFIG_PATH);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok(), "Default config should parse: {:?}", config.err());
    }

    #[test]
    fn test_default_config_validates() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.validate().is_ok(), "Default config should validate");
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.http.max_redirects, 2);
        assert_eq!(config.http.request_timeout_secs, 10);
        assert_eq!(config.http.max_body_bytes, 200_000);
        assert_eq!(config.search.min_response_bytes, 500);
        assert_eq!(config.batch.item_delay_ms, 800);
    }

    #[test]
    fn test_rejects_empty_user_agent() {
        let config_str = r#"
[http]
user_agent = ""
request_timeout_secs = 10
max_redirects = 2
max_body_bytes = 200000

[search]
base_url = "https://www.google.com/search"
query_suffix = "cleaning"
min_response_bytes = 500
cooldown_ms = 1000

[batch]
item_delay_ms = 800
min_rating = 3.0
"#;
        let config: AppConfig = toml::from_str(config_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRequired { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_search_url() {
        let config_str = r#"
[http]
user_agent = "test/1.0"
request_timeout_secs = 10
max_redirects = 2
max_body_bytes = 200000

[search]
base_url = "ftp://example.com"
query_suffix = "cleaning"
min_response_bytes = 500
cooldown_ms = 1000

[batch]
item_delay_ms = 800
min_rating = 3.0
"#;
        let config: AppConfig = toml::from_str(config_str).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));
    }
}
