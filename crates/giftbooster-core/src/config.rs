use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("GIFTBOOSTER_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as(
        "GIFTBOOSTER_BIND_ADDR",
        &or_default("GIFTBOOSTER_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("GIFTBOOSTER_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_as(
        "GIFTBOOSTER_DB_MAX_CONNECTIONS",
        &or_default("GIFTBOOSTER_DB_MAX_CONNECTIONS", "5"),
    )?;
    let db_min_connections: u32 = parse_as(
        "GIFTBOOSTER_DB_MIN_CONNECTIONS",
        &or_default("GIFTBOOSTER_DB_MIN_CONNECTIONS", "1"),
    )?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "GIFTBOOSTER_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }
    let db_acquire_timeout_secs: u64 = parse_as(
        "GIFTBOOSTER_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("GIFTBOOSTER_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let rate_limit_max_requests: usize = parse_as(
        "GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS",
        &or_default("GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS", "120"),
    )?;
    let rate_limit_window_secs: u64 = parse_as(
        "GIFTBOOSTER_RATE_LIMIT_WINDOW_SECS",
        &or_default("GIFTBOOSTER_RATE_LIMIT_WINDOW_SECS", "60"),
    )?;

    let analytics_retention_days: u32 = parse_as(
        "GIFTBOOSTER_ANALYTICS_RETENTION_DAYS",
        &or_default("GIFTBOOSTER_ANALYTICS_RETENTION_DAYS", "365"),
    )?;
    if analytics_retention_days == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GIFTBOOSTER_ANALYTICS_RETENTION_DAYS".to_string(),
            reason: "retention must be at least one day".to_string(),
        });
    }
    let analytics_prune_cron = or_default("GIFTBOOSTER_ANALYTICS_PRUNE_CRON", "0 0 3 * * *");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_max_requests,
        rate_limit_window_secs,
        analytics_retention_days,
        analytics_prune_cron,
    })
}

/// Parse a raw env value, reporting failures against the variable name.
fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GIFTBOOSTER_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
