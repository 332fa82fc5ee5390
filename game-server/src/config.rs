use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub turn_duration_seconds: u32,
    pub ai_guess_delay: Duration,
    pub ai_provider_timeout: Duration,
    pub max_commit_attempts: u32,
    pub ai_seat_limit: u32,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub words_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("DATABASE_URL") {
            Some(url) if url == "memory" => StorageBackend::Memory,
            Some(url) => StorageBackend::Sqlite(url),
            None => StorageBackend::Sqlite("sqlite://spymaster_arena.db?mode=rwc".to_string()),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            storage,
            turn_duration_seconds: parse_or(&lookup, "TURN_DURATION_SECONDS", 180)?,
            ai_guess_delay: Duration::from_millis(parse_or(&lookup, "AI_GUESS_DELAY_MS", 1000)?),
            ai_provider_timeout: Duration::from_secs(parse_or(
                &lookup,
                "AI_PROVIDER_TIMEOUT_SECONDS",
                30,
            )?),
            max_commit_attempts: parse_or(&lookup, "MAX_COMMIT_ATTEMPTS", 3)?,
            ai_seat_limit: parse_or(&lookup, "AI_SEAT_LIMIT", 8)?,
            openai_api_key: non_empty(lookup("OPENAI_API_KEY")),
            anthropic_api_key: non_empty(lookup("ANTHROPIC_API_KEY")),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            anthropic_base_url: lookup("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            words_file: non_empty(lookup("WORDS_FILE")),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            turn_duration_seconds: 180,
            ai_guess_delay: Duration::from_millis(1000),
            ai_provider_timeout: Duration::from_secs(30),
            max_commit_attempts: 3,
            ai_seat_limit: 8,
            openai_api_key: None,
            anthropic_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            anthropic_base_url: "https://api.anthropic.com".to_string(),
            words_file: None,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
