//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the bill search service, supporting TOML files
//! and environment variable overrides with validation and type-safe access.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables, CLI arguments
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, path verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables (`BILL_SEARCH_*`)
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use bill_context_search::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{BillSearchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Base document settings
    pub document: DocumentConfig,
    /// Keyword search behavior
    pub search: SearchConfig,
    /// Semantic context selection behavior
    pub context: ContextConfig,
    /// Answer generation (LLM) settings
    pub llm: LlmConfig,
    /// Remote fetch settings
    pub fetch: FetchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request payload size in MB (uploads included)
    pub max_payload_size_mb: usize,
    /// Enable CORS for web frontends
    pub enable_cors: bool,
}

/// Base document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the base bill text, read once at process start
    pub base_path: PathBuf,
    /// Human-readable title shown on the index page
    pub title: String,
}

/// Keyword search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lines of context included before and after a matching line
    pub context_lines: usize,
    /// Maximum query length accepted by the API
    pub max_query_length: usize,
}

/// Semantic context selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum number of relevant paragraphs to keep
    pub max_paragraphs: usize,
    /// Maximum total characters of selected context
    pub max_chars: usize,
}

/// Answer generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub api_url: String,
    /// API key; usually supplied via BILL_SEARCH_LLM_API_KEY
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Remote file fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Download URL template; `{id}` is replaced with the extracted file id
    pub download_url_template: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum download size in MB
    pub max_download_size_mb: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| BillSearchError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| BillSearchError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("BILL_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BILL_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| BillSearchError::Config {
                message: "Invalid port number in BILL_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(path) = std::env::var("BILL_SEARCH_DOCUMENT_PATH") {
            self.document.base_path = PathBuf::from(path);
        }
        if let Ok(api_key) = std::env::var("BILL_SEARCH_LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Ok(api_url) = std::env::var("BILL_SEARCH_LLM_API_URL") {
            self.llm.api_url = api_url;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(BillSearchError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.context.max_paragraphs == 0 {
            return Err(BillSearchError::ValidationFailed {
                field: "context.max_paragraphs".to_string(),
                reason: "Must keep at least one paragraph".to_string(),
            });
        }

        if self.context.max_chars == 0 {
            return Err(BillSearchError::ValidationFailed {
                field: "context.max_chars".to_string(),
                reason: "Context budget must be greater than zero".to_string(),
            });
        }

        if self.search.max_query_length == 0 {
            return Err(BillSearchError::ValidationFailed {
                field: "search.max_query_length".to_string(),
                reason: "Maximum query length must be greater than zero".to_string(),
            });
        }

        if !self.fetch.download_url_template.contains("{id}") {
            return Err(BillSearchError::ValidationFailed {
                field: "fetch.download_url_template".to_string(),
                reason: "Template must contain an {id} placeholder".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BillSearchError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_payload_size_mb: 25,
                enable_cors: true,
            },
            document: DocumentConfig {
                base_path: PathBuf::from("faa_bill.txt"),
                title: "FAA Reauthorization Bill Search Tool".to_string(),
            },
            search: SearchConfig {
                context_lines: 2,
                max_query_length: 500,
            },
            context: ContextConfig {
                max_paragraphs: 5,
                max_chars: 3000,
            },
            llm: LlmConfig {
                api_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                timeout_seconds: 60,
            },
            fetch: FetchConfig {
                download_url_template: "https://drive.google.com/uc?export=download&id={id}"
                    .to_string(),
                timeout_seconds: 30,
                max_download_size_mb: 50,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.context_lines, 2);
        assert_eq!(config.context.max_paragraphs, 5);
        assert_eq!(config.context.max_chars, 3000);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut config = Config::default();
        config.fetch.download_url_template = "https://example.com/file".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.context.max_chars, config.context.max_chars);
    }
}
