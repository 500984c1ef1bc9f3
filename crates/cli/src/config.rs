//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ATELIER_DATA_DIR` - Directory for the demo's JSON stores
//!   (default: `.atelier`)
//! - `GENAI_API_KEY` - Generation service API key; without it the
//!   `ask` and `tryon` commands are unavailable
//! - `GENAI_MODEL` - Model name override

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use atelier_sync::ai::AiConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the demo's JSON stores and session file.
    pub data_dir: PathBuf,
    /// Generation service configuration, when a key is present.
    pub ai: Option<AiConfig>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// All variables are optional.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("ATELIER_DATA_DIR", ".atelier"));

        let ai = std::env::var("GENAI_API_KEY").ok().map(|key| {
            let mut config = AiConfig::new(SecretString::from(key));
            if let Ok(model) = std::env::var("GENAI_MODEL") {
                config.model = model;
            }
            config
        });

        Self { data_dir, ai }
    }

    /// The generation config, or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `GENAI_API_KEY` is not
    /// set.
    pub fn require_ai(&self) -> Result<&AiConfig, ConfigError> {
        self.ai
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GENAI_API_KEY".to_owned()))
    }
}

/// Get an environment variable with a default fallback.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
