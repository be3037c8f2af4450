//! Per-target outcomes and the aggregate result of a scrape run.

use serde::{Deserialize, Serialize};

use crate::profile::CompanyProfile;

/// Terminal result of one session worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Completed(CompanyProfile),
    Failed { target: String, reason: String },
}

impl ScrapeOutcome {
    #[must_use]
    pub fn failed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            target: target.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// A target whose worker ended with a failure marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTarget {
    pub target: String,
    pub reason: String,
}

/// Aggregate counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of targets a worker was launched for.
    pub attempted: usize,
    /// Number of completed profiles.
    pub collected: usize,
    /// Targets that produced a failure marker, in launch order.
    pub failed: Vec<FailedTarget>,
}

/// Completed profiles of a run with failure markers filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResultSet {
    /// Profiles in target launch order.
    pub profiles: Vec<CompanyProfile>,
    pub summary: RunSummary,
}

impl ScrapeResultSet {
    /// Builds the result set from `(launch_index, outcome)` pairs received in
    /// any order.
    #[must_use]
    pub fn from_outcomes(mut outcomes: Vec<(usize, ScrapeOutcome)>, attempted: usize) -> Self {
        outcomes.sort_by_key(|(index, _)| *index);

        let mut profiles = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                ScrapeOutcome::Completed(profile) => profiles.push(profile),
                ScrapeOutcome::Failed { target, reason } => {
                    failed.push(FailedTarget { target, reason });
                }
            }
        }

        let collected = profiles.len();
        Self {
            profiles,
            summary: RunSummary {
                attempted,
                collected,
                failed,
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Total posts across all profiles.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.profiles.iter().map(|p| p.posts.len()).sum()
    }
}
