use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("DATABASE_URL", "sqlite://giftbooster-test.db");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GIFTBOOSTER_ENV"));
}

#[test]
fn build_app_config_fails_without_database_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DATABASE_URL"),
        "expected MissingEnvVar(DATABASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIFTBOOSTER_BIND_ADDR"),
        "expected InvalidEnvVar(GIFTBOOSTER_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.database_url, "sqlite://giftbooster-test.db");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.db_min_connections, 1);
    assert_eq!(cfg.db_acquire_timeout_secs, 10);
    assert_eq!(cfg.rate_limit_max_requests, 120);
    assert_eq!(cfg.rate_limit_window_secs, 60);
    assert_eq!(cfg.analytics_retention_days, 365);
    assert_eq!(cfg.analytics_prune_cron, "0 0 3 * * *");
}

#[test]
fn build_app_config_fails_on_invalid_env() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIFTBOOSTER_ENV"),
        "expected InvalidEnvVar(GIFTBOOSTER_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_when_db_min_exceeds_db_max() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_DB_MIN_CONNECTIONS", "6");
    map.insert("GIFTBOOSTER_DB_MAX_CONNECTIONS", "5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIFTBOOSTER_DB_MIN_CONNECTIONS"),
        "expected InvalidEnvVar(GIFTBOOSTER_DB_MIN_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn rate_limit_overrides_apply() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS", "30");
    map.insert("GIFTBOOSTER_RATE_LIMIT_WINDOW_SECS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.rate_limit_max_requests, 30);
    assert_eq!(cfg.rate_limit_window_secs, 10);
}

#[test]
fn rate_limit_max_requests_invalid() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS"),
        "expected InvalidEnvVar(GIFTBOOSTER_RATE_LIMIT_MAX_REQUESTS), got: {result:?}"
    );
}

#[test]
fn analytics_retention_days_override() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_ANALYTICS_RETENTION_DAYS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.analytics_retention_days, 90);
}

#[test]
fn analytics_retention_days_zero_is_rejected() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_ANALYTICS_RETENTION_DAYS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIFTBOOSTER_ANALYTICS_RETENTION_DAYS"),
        "expected InvalidEnvVar(GIFTBOOSTER_ANALYTICS_RETENTION_DAYS), got: {result:?}"
    );
}

#[test]
fn analytics_prune_cron_override() {
    let mut map = full_env();
    map.insert("GIFTBOOSTER_ANALYTICS_PRUNE_CRON", "0 30 4 * * SUN");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.analytics_prune_cron, "0 30 4 * * SUN");
}

#[test]
fn debug_output_redacts_database_url() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("[redacted]"));
    assert!(!rendered.contains("giftbooster-test.db"));
}
