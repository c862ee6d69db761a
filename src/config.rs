//! Configuration management for SmartScan Server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Default body limit for uploads: 200MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body (the upload limit)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions idle longer than this are evicted
    pub idle_minutes: i64,
    /// Maximum number of live sessions (0 = unlimited)
    pub max_sessions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub provider: AiProvider,
    /// Never defaulted; only read from the environment
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            AiProvider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(ConfigError::Invalid {
                key: "AI_PROVIDER",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        let provider = AiProvider::Gemini;
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            session: SessionConfig {
                idle_minutes: 60,
                max_sessions: 1000,
            },
            ai: AiConfig {
                provider,
                api_key: None,
                model: provider.default_model().to_string(),
                base_url: provider.default_base_url().to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let provider = match env::var("AI_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.ai.provider,
        };

        let api_key = env::var("AI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes)?,
            },
            session: SessionConfig {
                idle_minutes: parse_var("SESSION_IDLE_MINUTES", defaults.session.idle_minutes)?,
                max_sessions: parse_var("MAX_SESSIONS", defaults.session.max_sessions)?,
            },
            ai: AiConfig {
                provider,
                api_key,
                model: env::var("AI_MODEL").unwrap_or_else(|_| provider.default_model().to_string()),
                base_url: env::var("AI_BASE_URL")
                    .unwrap_or_else(|_| provider.default_base_url().to_string()),
            },
        })
    }
}

/// Read and parse an optional environment variable
fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
