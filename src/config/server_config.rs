/// Configuration for the server, storage, notifier and rate limiting settings.
use std::{env, str::FromStr};

use strum::{Display, EnumString};

use crate::{
    config::ConfigError,
    models::{AppMode, SecretString},
};

/// Backend holding the transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RepositoryStorageType {
    #[default]
    InMemory,
    Redis,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address the server will bind to.
    pub host: String,
    /// The port number the server will listen on.
    pub port: u16,
    /// Selects which networks are accepted.
    pub app_mode: AppMode,
    /// Bearer token for the client-facing endpoints.
    pub api_key: SecretString,
    /// Key sent with every notifier request.
    pub notifier_api_key: SecretString,
    /// Shared secret the notifier includes in webhook bodies.
    pub webhook_secret: SecretString,
    /// Base URL of the notifier API.
    pub notifier_url: String,
    pub repository_storage_type: RepositoryStorageType,
    /// The URL for the Redis instance.
    pub redis_url: String,
    pub redis_key_prefix: String,
    pub redis_connection_timeout_ms: u64,
    /// The number of requests allowed per second.
    pub rate_limit_requests_per_second: u64,
    /// The maximum burst size for rate limiting.
    pub rate_limit_burst_size: u32,
    pub metrics_enabled: bool,
    /// The port number for exposing metrics.
    pub metrics_port: u16,
    /// Serve the OpenAPI document.
    pub enable_swagger: bool,
    /// Browser origins allowed to call the API with credentials.
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://watchgod.matic.today",
    "http://localhost:3000",
    "http://localhost",
];

fn required_secret(name: &str) -> Result<SecretString, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::new(&value)),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_enum<T: FromStr + Default>(name: &str) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(T::default()),
    }
}

/// Comma-separated list, or `default` when the variable is unset or blank.
fn list_or(name: &str, default: &[&str]) -> Vec<String> {
    let values: Vec<String> = env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        default.iter().map(|v| v.to_string()).collect()
    } else {
        values
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

impl ServerConfig {
    /// Creates a new `ServerConfig` instance from environment variables.
    ///
    /// `AUTHORIZATION_TOKEN` and `NOTIFIER_API_KEY` are required;
    /// `WEBHOOK_SECRET` falls back to the notifier key. Unparseable numbers
    /// fall back to their defaults, unknown `APP_MODE` or
    /// `REPOSITORY_STORAGE_TYPE` values are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let notifier_api_key = required_secret("NOTIFIER_API_KEY")?;
        let webhook_secret =
            required_secret("WEBHOOK_SECRET").unwrap_or_else(|_| notifier_api_key.clone());

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("APP_PORT", 8080),
            app_mode: parse_enum("APP_MODE")?,
            api_key: required_secret("AUTHORIZATION_TOKEN")?,
            notifier_api_key,
            webhook_secret,
            notifier_url: env::var("NOTIFIER_URL")
                .unwrap_or_else(|_| "https://api.blocknative.com".to_string()),
            repository_storage_type: parse_enum("REPOSITORY_STORAGE_TYPE")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "watchgod".to_string()),
            redis_connection_timeout_ms: parse_or("REDIS_CONNECTION_TIMEOUT_MS", 10_000),
            rate_limit_requests_per_second: parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", 100),
            rate_limit_burst_size: parse_or("RATE_LIMIT_BURST_SIZE", 300),
            metrics_enabled: flag("METRICS_ENABLED"),
            metrics_port: parse_or("METRICS_PORT", 8081),
            enable_swagger: flag("ENABLE_SWAGGER"),
            cors_allowed_origins: list_or("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS),
        })
    }
}
