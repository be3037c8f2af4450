pub mod app_config;
pub mod config;
pub mod export;
pub mod outcome;
pub mod profile;
pub mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use export::{flatten_profiles, ProfileRow};
pub use outcome::{FailedTarget, RunSummary, ScrapeOutcome, ScrapeResultSet};
pub use profile::{CompanyProfile, Post};
pub use targets::{load_targets, validate_targets, TargetConfig, TargetsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[from] serde_yaml::Error),

    #[error("invalid targets configuration: {0}")]
    Validation(String),
}
