use std::time::Duration;

use orgscrape_core::AppConfig;

/// Scroll attempt ceiling for the feed loader.
pub const MAX_SCROLL_ATTEMPTS: u32 = 10;

/// Posts requested per company when the caller does not say otherwise.
pub const DEFAULT_POST_TARGET: usize = 50;

/// Timing and bound knobs shared by every worker of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Ceiling on scroll-to-bottom attempts while loading a feed.
    pub max_scrolls: u32,
    /// Presence wait for the top-card and core-details regions.
    pub region_wait: Duration,
    /// Presence wait for the sign-in overlay's dismiss button.
    pub popup_wait: Duration,
    /// Pause after each scroll before re-counting feed items.
    pub scroll_settle: Duration,
    /// Pause after clicking a "See more" expander.
    pub expand_settle: Duration,
    /// Delay between consecutive worker launches.
    pub launch_stagger: Duration,
    /// Budget for one worker's page work; `None` means unbounded.
    pub worker_timeout: Option<Duration>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_scrolls: MAX_SCROLL_ATTEMPTS,
            region_wait: Duration::from_secs(10),
            popup_wait: Duration::from_secs(5),
            scroll_settle: Duration::from_secs(1),
            expand_settle: Duration::from_secs(1),
            launch_stagger: Duration::from_secs(2),
            worker_timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_scrolls: config.max_scrolls,
            region_wait: Duration::from_secs(config.region_wait_secs),
            popup_wait: Duration::from_secs(config.popup_wait_secs),
            scroll_settle: Duration::from_millis(config.scroll_settle_ms),
            expand_settle: Duration::from_millis(config.expand_settle_ms),
            launch_stagger: Duration::from_millis(config.launch_stagger_ms),
            worker_timeout: config.worker_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Same bounds with every wait and delay set to zero.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            region_wait: Duration::ZERO,
            popup_wait: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            expand_settle: Duration::ZERO,
            launch_stagger: Duration::ZERO,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn default_matches_page_timings() {
        let settings = ScrapeSettings::default();
        assert_eq!(settings.max_scrolls, 10);
        assert_eq!(settings.region_wait, Duration::from_secs(10));
        assert_eq!(settings.scroll_settle, Duration::from_secs(1));
        assert_eq!(settings.launch_stagger, Duration::from_secs(2));
    }

    #[test]
    fn from_app_config_converts_units() {
        let config = AppConfig {
            targets_path: PathBuf::from("targets.yaml"),
            log_level: "info".to_string(),
            post_target: 20,
            max_scrolls: 4,
            region_wait_secs: 3,
            popup_wait_secs: 1,
            scroll_settle_ms: 250,
            expand_settle_ms: 100,
            launch_stagger_ms: 500,
            worker_timeout_secs: None,
            chrome_path: None,
            headless: true,
        };
        let settings = ScrapeSettings::from_app_config(&config);
        assert_eq!(settings.max_scrolls, 4);
        assert_eq!(settings.region_wait, Duration::from_secs(3));
        assert_eq!(settings.scroll_settle, Duration::from_millis(250));
        assert_eq!(settings.expand_settle, Duration::from_millis(100));
        assert_eq!(settings.launch_stagger, Duration::from_millis(500));
        assert!(settings.worker_timeout.is_none());
    }

    #[test]
    fn without_delays_keeps_bounds() {
        let settings = ScrapeSettings::default().without_delays();
        assert_eq!(settings.max_scrolls, MAX_SCROLL_ATTEMPTS);
        assert_eq!(settings.worker_timeout, Some(Duration::from_secs(300)));
        assert!(settings.scroll_settle.is_zero());
        assert!(settings.launch_stagger.is_zero());
    }
}
