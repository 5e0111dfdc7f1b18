use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_VOICE_ID: &str = "JBFqnCBsd6RMkjVDRZzb";
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_v3";
pub const DEFAULT_LANGUAGE_CODE: &str = "es";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Configuration for the Gemini API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: String,
    pub base_url: String,
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Configuration for the ElevenLabs text-to-speech API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub language_code: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_SPEECH_MODEL.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection string. The in-memory user store is used when unset.
    pub url: Option<String>,
}

/// Top-level application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub speech: SpeechConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `.env` (if present) and applies the process environment on top of `self`.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside development
        let _ = dotenvy::dotenv();
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Empty values are ignored so that `KEY=` in a `.env` file does not
    /// wipe out a value from the config file.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model_name = model;
        }
        if let Some(key) = get("ELEVEN_API_KEY") {
            self.speech.api_key = Some(key);
        }
        if let Some(voice) = get("ELEVEN_VOICE_ID") {
            self.speech.voice_id = voice;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(addr) = get("SOLAR_HTTP_ADDR") {
            self.server.http_addr = addr.parse().map_err(|e| ConfigError::InvalidValue {
                key: "SOLAR_HTTP_ADDR".to_string(),
                message: format!("{}", e),
            })?;
        }

        Ok(self)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> Result<PathBuf, ConfigError> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gemini.model_name, "gemini-2.5-flash");
        assert_eq!(config.gemini.temperature, 0.3);
        assert_eq!(config.speech.language_code, "es");
        assert_eq!(config.server.http_addr.to_string(), DEFAULT_HTTP_ADDR);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [gemini]
            model_name = "gemini-2.0-flash"

            [server]
            http_addr = "127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.model_name, "gemini-2.0-flash");
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.server.http_addr.port(), 9000);
        assert_eq!(config.speech, SpeechConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = AppConfig::from_toml("[gemini\nmodel_name = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "g-key"),
            ("ELEVEN_API_KEY", "e-key"),
            ("DATABASE_URL", "postgres://localhost/solar"),
            ("SOLAR_HTTP_ADDR", "127.0.0.1:3000"),
            ("GEMINI_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default()
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.gemini.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.speech.api_key.as_deref(), Some("e-key"));
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/solar")
        );
        assert_eq!(config.server.http_addr.port(), 3000);
        // Blank values are ignored
        assert_eq!(config.gemini.model_name, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_env_invalid_addr() {
        let result = AppConfig::default().apply_env(|key| {
            (key == "SOLAR_HTTP_ADDR").then(|| "not-an-address".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_file_returns_default() {
        let config = AppConfig::load_from_file(Path::new("/nonexistent/solar/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
