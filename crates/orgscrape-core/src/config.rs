use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got \"{raw}\""))),
        }
    };

    let targets_path = PathBuf::from(or_default(
        "ORGSCRAPE_TARGETS_PATH",
        "./config/targets.yaml",
    ));
    let log_level = or_default("ORGSCRAPE_LOG_LEVEL", "info");

    let post_target = parse_usize("ORGSCRAPE_POST_TARGET", "50")?;
    let max_scrolls = parse_u32("ORGSCRAPE_MAX_SCROLLS", "10")?;
    let region_wait_secs = parse_u64("ORGSCRAPE_REGION_WAIT_SECS", "10")?;
    let popup_wait_secs = parse_u64("ORGSCRAPE_POPUP_WAIT_SECS", "5")?;
    let scroll_settle_ms = parse_u64("ORGSCRAPE_SCROLL_SETTLE_MS", "1000")?;
    let expand_settle_ms = parse_u64("ORGSCRAPE_EXPAND_SETTLE_MS", "1000")?;
    let launch_stagger_ms = parse_u64("ORGSCRAPE_LAUNCH_STAGGER_MS", "2000")?;
    let worker_timeout_secs = match parse_u64("ORGSCRAPE_WORKER_TIMEOUT_SECS", "300")? {
        0 => None,
        secs => Some(secs),
    };

    let chrome_path = lookup("ORGSCRAPE_CHROME_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let headless = parse_bool("ORGSCRAPE_HEADLESS", "true")?;

    Ok(AppConfig {
        targets_path,
        log_level,
        post_target,
        max_scrolls,
        region_wait_secs,
        popup_wait_secs,
        scroll_settle_ms,
        expand_settle_ms,
        launch_stagger_ms,
        worker_timeout_secs,
        chrome_path,
        headless,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
