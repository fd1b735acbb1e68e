use crate::app_config::{AppConfig, DEFAULT_SEED_URL};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

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

/// Build application configuration using the provided env-var lookup function,
/// so tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // No fallback: the store credential must be supplied explicitly.
    let database_url = require("DATABASE_URL")?;

    let log_level = or_default("DISASTER_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("DISASTER_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("DISASTER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DISASTER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let seed_url = or_default("DISASTER_SEED_URL", DEFAULT_SEED_URL);
    if !(seed_url.starts_with("http://") || seed_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "DISASTER_SEED_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{seed_url}\""),
        });
    }

    let scraper_request_timeout_secs = parse_u64("DISASTER_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("DISASTER_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_inter_request_delay_ms =
        parse_u64("DISASTER_SCRAPER_INTER_REQUEST_DELAY_MS", "2000")?;
    let scraper_max_retries = parse_u32("DISASTER_SCRAPER_MAX_RETRIES", "5")?;
    let scraper_retry_backoff_base_ms =
        parse_u64("DISASTER_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;

    let audit_dir = PathBuf::from(or_default("DISASTER_AUDIT_DIR", "."));
    let area_filter_path = lookup("DISASTER_AREA_FILTER_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        database_url,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        seed_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
        audit_dir,
        area_filter_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
