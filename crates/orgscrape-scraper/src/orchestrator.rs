//! Fan-out of session workers over a list of targets.
//!
//! Each target gets its own tokio task. Launches are staggered, outcomes flow
//! back over an mpsc channel tagged with their launch index, and the channel
//! is only drained once every task has been joined. A task that dies without
//! reporting (panic outside the worker's own guard, runtime shutdown) is
//! recorded as a failure for its target so every target is accounted for.

use std::collections::HashSet;
use std::sync::Arc;

use orgscrape_core::{ScrapeOutcome, ScrapeResultSet};
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::session::SessionProvider;
use crate::settings::ScrapeSettings;
use crate::worker::{panic_message, run_worker};

/// Runs one session worker per target and aggregates their outcomes.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn SessionProvider>,
    settings: ScrapeSettings,
}

impl Orchestrator {
    #[must_use]
    pub fn new(provider: Arc<dyn SessionProvider>, settings: ScrapeSettings) -> Self {
        Self { provider, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    /// Scrapes every target concurrently and returns the completed profiles in
    /// target order, with failures listed in the run summary.
    ///
    /// Never fails as a whole: a target that cannot be scraped becomes a
    /// failure entry. No target is retried.
    pub async fn run(&self, targets: &[String], post_target: usize) -> ScrapeResultSet {
        let run_id = Uuid::new_v4();
        let attempted = targets.len();
        tracing::info!(%run_id, targets = attempted, post_target, "starting scrape run");

        let (tx, mut rx) = mpsc::channel::<(usize, ScrapeOutcome)>(attempted.max(1));
        let mut handles = Vec::with_capacity(attempted);

        for (index, target) in targets.iter().enumerate() {
            if index > 0 && !self.settings.launch_stagger.is_zero() {
                tokio::time::sleep(self.settings.launch_stagger).await;
            }

            let provider = Arc::clone(&self.provider);
            let settings = self.settings.clone();
            let tx = tx.clone();
            let worker_target = target.clone();
            let span = tracing::info_span!(
                "session_worker",
                %run_id,
                target = %target,
                index
            );

            tracing::debug!(%run_id, target = %target, index, "launching worker");
            let handle = tokio::spawn(
                async move {
                    let outcome =
                        run_worker(provider.as_ref(), &worker_target, post_target, &settings).await;
                    if tx.send((index, outcome)).await.is_err() {
                        tracing::warn!("outcome channel closed before the result was sent");
                    }
                }
                .instrument(span),
            );
            handles.push((index, target.clone(), handle));
        }
        drop(tx);

        let mut lost = Vec::new();
        for (index, target, handle) in handles {
            if let Err(e) = handle.await {
                let reason = if e.is_panic() {
                    format!("worker task panicked: {}", panic_message(e.into_panic().as_ref()))
                } else {
                    format!("worker task did not finish: {e}")
                };
                tracing::error!(%run_id, target = %target, error = %reason, "worker task failed");
                lost.push((index, ScrapeOutcome::failed(target, reason)));
            }
        }

        let mut outcomes = Vec::with_capacity(attempted);
        while let Some(received) = rx.recv().await {
            outcomes.push(received);
        }
        let reported: HashSet<usize> = outcomes.iter().map(|(index, _)| *index).collect();
        outcomes.extend(lost.into_iter().filter(|(index, _)| !reported.contains(index)));

        let results = ScrapeResultSet::from_outcomes(outcomes, attempted);
        tracing::info!(
            %run_id,
            attempted = results.summary.attempted,
            collected = results.summary.collected,
            failed = results.summary.failed.len(),
            posts = results.post_count(),
            "scrape run finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{company_page, FakeProvider};

    fn targets(n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| format!("https://www.linkedin.com/company/c{i}"))
            .collect()
    }

    fn orchestrator(provider: &FakeProvider) -> Orchestrator {
        Orchestrator::new(
            Arc::new(provider.clone()),
            ScrapeSettings::default().without_delays(),
        )
    }

    #[tokio::test]
    async fn empty_target_list_yields_empty_result() {
        let provider = FakeProvider::new();
        let results = orchestrator(&provider).run(&[], 50).await;
        assert!(results.is_empty());
        assert_eq!(results.summary.attempted, 0);
        assert_eq!(results.summary.collected, 0);
    }

    #[tokio::test]
    async fn profiles_follow_target_order() {
        let targets = targets(4);
        let mut provider = FakeProvider::new();
        for (i, target) in targets.iter().enumerate() {
            provider = provider.page(target, company_page(&format!("Company {i}"), 2));
        }
        let results = orchestrator(&provider).run(&targets, 2).await;

        let names: Vec<&str> = results.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Company 0", "Company 1", "Company 2", "Company 3"]);
        assert_eq!(results.post_count(), 8);
    }

    #[tokio::test]
    async fn open_failure_is_counted_not_fatal() {
        let targets = targets(2);
        let provider = FakeProvider::new()
            .page(&targets[0], company_page("Ok", 1))
            .failing_open(&targets[1]);
        let results = orchestrator(&provider).run(&targets, 1).await;

        assert_eq!(results.summary.attempted, 2);
        assert_eq!(results.summary.collected, 1);
        assert_eq!(results.summary.failed.len(), 1);
        assert_eq!(results.summary.failed[0].target, targets[1]);
    }

    #[tokio::test]
    async fn every_session_is_released() {
        let targets = targets(3);
        let provider = FakeProvider::new()
            .page(&targets[0], company_page("A", 1))
            .page(&targets[1], company_page("B", 1).panicking_scroll())
            .page(&targets[2], company_page("C", 1).failing_navigation());
        orchestrator(&provider).run(&targets, 3).await;

        let sessions = provider.sessions();
        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|(_, state)| state.is_closed()));
    }
}
