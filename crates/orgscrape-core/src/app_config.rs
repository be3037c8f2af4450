use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub targets_path: PathBuf,
    pub log_level: String,
    /// Posts to aim for per company feed.
    pub post_target: usize,
    /// Ceiling on scroll-to-bottom attempts while loading a feed.
    pub max_scrolls: u32,
    pub region_wait_secs: u64,
    pub popup_wait_secs: u64,
    pub scroll_settle_ms: u64,
    pub expand_settle_ms: u64,
    pub launch_stagger_ms: u64,
    /// Per-worker budget; `None` when disabled with `0`.
    pub worker_timeout_secs: Option<u64>,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
}
