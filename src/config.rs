//! Service configuration for verse-forge.
//!
//! Configuration is read once at process start into an explicit
//! [`ServiceConfig`] and passed into the orchestrator and server, never
//! held as ambient global state.

use std::path::PathBuf;
use thiserror::Error;

/// Default model identifier: the limerick fine-tune used in production.
const DEFAULT_MODEL: &str = "ft:gpt-4o-mini-2024-07-18:personal:lear-gpt-arch:CNN73o0G";

/// Default OpenAI-compatible API endpoint.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the limerick service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// API key for the model provider.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier used for all generation requests.
    pub model: String,
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Directory served as static assets.
    pub static_dir: PathBuf,
}

impl ServiceConfig {
    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY`: API key for the model provider (required)
    /// - `OPENAI_API_BASE`: API endpoint (default: public OpenAI endpoint)
    /// - `OPENAI_MODEL`: Model identifier (default: the limerick fine-tune)
    /// - `PORT`: HTTP listen port (default: 3000)
    /// - `STATIC_DIR`: Static asset directory (default: ./public)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `OPENAI_API_KEY` is missing or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let port = match std::env::var("PORT") {
            Ok(val) => val.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("{}", e),
            })?,
            Err(_) => 3000,
        };

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let config = Self {
            api_key,
            api_base,
            model,
            port,
            static_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_key cannot be empty".to_string(),
            ));
        }

        if self.api_base.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base cannot be empty".to_string(),
            ));
        }

        if self.model.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            api_key: "sk-test".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: "test-model".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let mut config = test_config();
        config.api_key = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = test_config();
        config.model = String::new();
        assert!(config.validate().is_err());
    }
}
