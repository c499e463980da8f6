use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

/// Minimum HS256 signing key length, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Longest accepted access-token lifetime: one day.
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh-token lifetime: one year.
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl DatabaseConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

impl JwtConfig {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_ttl_days)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfirmationConfig {
    /// Public URL of the confirm endpoint; the email is appended as a query.
    pub url_base: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("jwt.secret must be at least 32 bytes, got {0}")]
    SecretTooShort(usize),

    #[error("{0} must be positive")]
    NonPositiveTtl(&'static str),

    #[error("{0} exceeds the maximum of {1}")]
    TtlTooLong(&'static str, i64),
}

fn default_max_connections() -> u32 {
    5
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    50
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret_len = self.jwt.secret.len();
        if secret_len < MIN_JWT_SECRET_BYTES {
            return Err(ConfigValidationError::SecretTooShort(secret_len));
        }
        if self.jwt.access_token_ttl_minutes <= 0 {
            return Err(ConfigValidationError::NonPositiveTtl(
                "jwt.access_token_ttl_minutes",
            ));
        }
        if self.jwt.refresh_token_ttl_days <= 0 {
            return Err(ConfigValidationError::NonPositiveTtl(
                "jwt.refresh_token_ttl_days",
            ));
        }
        if self.jwt.access_token_ttl_minutes > MAX_ACCESS_TOKEN_TTL_MINUTES {
            return Err(ConfigValidationError::TtlTooLong(
                "jwt.access_token_ttl_minutes",
                MAX_ACCESS_TOKEN_TTL_MINUTES,
            ));
        }
        if self.jwt.refresh_token_ttl_days > MAX_REFRESH_TOKEN_TTL_DAYS {
            return Err(ConfigValidationError::TtlTooLong(
                "jwt.refresh_token_ttl_days",
                MAX_REFRESH_TOKEN_TTL_DAYS,
            ));
        }
        Ok(())
    }
}
