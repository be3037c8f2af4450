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

fn config_with(pairs: &[(&'static str, &'static str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    build_app_config(lookup_from_map(&map))
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let cfg = config_with(&[]).unwrap();
    assert_eq!(cfg.targets_path, PathBuf::from("./config/targets.yaml"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.post_target, 50);
    assert_eq!(cfg.max_scrolls, 10);
    assert_eq!(cfg.region_wait_secs, 10);
    assert_eq!(cfg.popup_wait_secs, 5);
    assert_eq!(cfg.scroll_settle_ms, 1000);
    assert_eq!(cfg.expand_settle_ms, 1000);
    assert_eq!(cfg.launch_stagger_ms, 2000);
    assert_eq!(cfg.worker_timeout_secs, Some(300));
    assert!(cfg.chrome_path.is_none());
    assert!(cfg.headless);
}

#[test]
fn post_target_override() {
    let cfg = config_with(&[("ORGSCRAPE_POST_TARGET", "20")]).unwrap();
    assert_eq!(cfg.post_target, 20);
}

#[test]
fn post_target_invalid() {
    let result = config_with(&[("ORGSCRAPE_POST_TARGET", "lots")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORGSCRAPE_POST_TARGET"),
        "expected InvalidEnvVar(ORGSCRAPE_POST_TARGET), got: {result:?}"
    );
}

#[test]
fn max_scrolls_invalid() {
    let result = config_with(&[("ORGSCRAPE_MAX_SCROLLS", "-1")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORGSCRAPE_MAX_SCROLLS"),
        "expected InvalidEnvVar(ORGSCRAPE_MAX_SCROLLS), got: {result:?}"
    );
}

#[test]
fn launch_stagger_override() {
    let cfg = config_with(&[("ORGSCRAPE_LAUNCH_STAGGER_MS", "0")]).unwrap();
    assert_eq!(cfg.launch_stagger_ms, 0);
}

#[test]
fn worker_timeout_zero_disables_budget() {
    let cfg = config_with(&[("ORGSCRAPE_WORKER_TIMEOUT_SECS", "0")]).unwrap();
    assert!(cfg.worker_timeout_secs.is_none());
}

#[test]
fn worker_timeout_invalid() {
    let result = config_with(&[("ORGSCRAPE_WORKER_TIMEOUT_SECS", "soon")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORGSCRAPE_WORKER_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ORGSCRAPE_WORKER_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn headless_accepts_common_spellings() {
    for (raw, expected) in [("false", false), ("0", false), ("Yes", true), ("on", true)] {
        let map: HashMap<&str, &str> = [("ORGSCRAPE_HEADLESS", raw)].into_iter().collect();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.headless, expected, "raw value {raw:?}");
    }
}

#[test]
fn headless_invalid() {
    let result = config_with(&[("ORGSCRAPE_HEADLESS", "maybe")]);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORGSCRAPE_HEADLESS"),
        "expected InvalidEnvVar(ORGSCRAPE_HEADLESS), got: {result:?}"
    );
}

#[test]
fn chrome_path_blank_is_ignored() {
    let cfg = config_with(&[("ORGSCRAPE_CHROME_PATH", "  ")]).unwrap();
    assert!(cfg.chrome_path.is_none());
}

#[test]
fn chrome_path_override() {
    let cfg = config_with(&[("ORGSCRAPE_CHROME_PATH", "/opt/chrome/chrome")]).unwrap();
    assert_eq!(cfg.chrome_path, Some(PathBuf::from("/opt/chrome/chrome")));
}
