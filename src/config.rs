use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use crate::auth::password::PasswordParams;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// `*` means any origin.
    pub cors_allow_origin: String,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            cors_allow_origin: "*".into(),
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordParams,
    pub http: HttpConfig,
}

/// Unset falls back to `default`; set but unparsable is an error.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key}: {e}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60 * 24)?,
        };

        let defaults = PasswordParams::default();
        let password = PasswordParams {
            time_cost: env_or("ARGON2_TIME_COST", defaults.time_cost)?,
            memory_kib: env_or("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism)?,
            output_len: env_or("ARGON2_OUTPUT_LEN", defaults.output_len)?,
        };
        if !(10..=64).contains(&password.output_len) {
            anyhow::bail!("ARGON2_OUTPUT_LEN must be between 10 and 64");
        }

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port: env_or("APP_PORT", defaults.port)?,
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN")
                .unwrap_or(defaults.cors_allow_origin),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes)?,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            jwt,
            password,
            http,
        })
    }
}
