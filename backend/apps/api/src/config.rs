//! Process configuration
//!
//! Everything is read from environment variables (after `.env` is loaded).
//! Missing or malformed values stop startup with a [`ConfigError`].

use auth::AuthConfig;
use fleet::StorageConfig;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Ten years
const MAX_JWT_EXPIRE_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    /// `debug` or `release`
    pub mode: String,
    pub port: u16,
    /// Whole-request timeout
    pub read_timeout: Duration,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let server = ServerConfig {
            name: env.or("APP_NAME", "robot-scheduler"),
            version: env.or("APP_VERSION", env!("CARGO_PKG_VERSION")),
            mode: env.or("APP_MODE", "debug"),
            port: env.parse("APP_PORT", 8080)?,
            read_timeout: Duration::from_secs(env.parse("APP_READ_TIMEOUT_SECS", 60)?),
        };

        let database = DatabaseConfig {
            url: env.required("DATABASE_URL")?,
            max_connections: env.parse("DATABASE_MAX_CONNECTIONS", 5)?,
        };

        let cors_origins = env
            .or("FRONTEND_ORIGINS", DEFAULT_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let auth = AuthConfig {
            des_key: env.secret("AUTH_DES_KEY")?,
            jwt_secret: env.secret("AUTH_JWT_SECRET")?,
            jwt_expire_hours: env.parse("AUTH_JWT_EXPIRE_HOURS", 24)?,
        };
        if auth.des_key.len() != 8 {
            return Err(ConfigError::Invalid {
                key: "AUTH_DES_KEY",
                reason: format!("must be exactly 8 bytes, got {}", auth.des_key.len()),
            });
        }
        if !(1..=MAX_JWT_EXPIRE_HOURS).contains(&auth.jwt_expire_hours) {
            return Err(ConfigError::Invalid {
                key: "AUTH_JWT_EXPIRE_HOURS",
                reason: format!("must be between 1 and {MAX_JWT_EXPIRE_HOURS}"),
            });
        }

        let defaults = StorageConfig::default();
        let storage = StorageConfig {
            enabled: env.parse("MINIO_ENABLED", false)?,
            endpoint: env.or("MINIO_ENDPOINT", ""),
            access_key: env.or("MINIO_ACCESS_KEY", ""),
            secret_key: env.or("MINIO_SECRET_KEY", ""),
            use_ssl: env.parse("MINIO_USE_SSL", false)?,
            bucket_name: env.or("MINIO_BUCKET_NAME", ""),
            region: env.or("MINIO_REGION", &defaults.region),
        };

        Ok(Self {
            server,
            database,
            cors_origins,
            auth,
            storage,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    /// Like [`Env::required`] but byte-exact: key material is never trimmed
    fn secret(&self, key: &'static str) -> Result<String, ConfigError> {
        (self.0)(key)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(key))
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: format!("{raw:?}: {e}"),
            }),
        }
    }
}
