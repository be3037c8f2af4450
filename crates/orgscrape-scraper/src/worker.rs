//! One target, one page session, one outcome.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use orgscrape_core::{CompanyProfile, ScrapeOutcome};

use crate::error::ScraperError;
use crate::feed::{load_posts, FeedRequest};
use crate::popup::dismiss_overlay;
use crate::profile::extract_profile;
use crate::session::{PageSession, SessionProvider};
use crate::settings::ScrapeSettings;

/// Scrapes `target` in a session of its own and reports exactly one outcome.
///
/// The session is closed whether the page work completes, returns an error,
/// panics, or runs past `settings.worker_timeout`. Every failure is logged
/// with the target and turned into [`ScrapeOutcome::Failed`].
pub async fn run_worker(
    provider: &dyn SessionProvider,
    target: &str,
    post_target: usize,
    settings: &ScrapeSettings,
) -> ScrapeOutcome {
    match scrape_target(provider, target, post_target, settings).await {
        Ok(profile) => {
            if profile.is_blank() {
                tracing::warn!(target, "profile has no company fields; page layout may have changed");
            }
            tracing::info!(target, posts = profile.posts.len(), "scrape completed");
            ScrapeOutcome::Completed(profile)
        }
        Err(e) => {
            tracing::error!(target, error = %e, "scrape failed");
            ScrapeOutcome::failed(target, e.to_string())
        }
    }
}

async fn scrape_target(
    provider: &dyn SessionProvider,
    target: &str,
    post_target: usize,
    settings: &ScrapeSettings,
) -> Result<CompanyProfile, ScraperError> {
    let mut page = provider
        .open(target)
        .await
        .map_err(|source| ScraperError::SessionOpen {
            target: target.to_string(),
            source,
        })?;

    let result = guarded(
        scrape_page(page.as_mut(), target, post_target, settings),
        target,
        settings.worker_timeout,
    )
    .await;

    if let Err(e) = page.close().await {
        tracing::warn!(target, error = %e, "failed to close page session");
    }

    result
}

async fn scrape_page(
    page: &mut dyn PageSession,
    target: &str,
    post_target: usize,
    settings: &ScrapeSettings,
) -> Result<CompanyProfile, ScraperError> {
    page.navigate(target)
        .await
        .map_err(|source| ScraperError::Session {
            target: target.to_string(),
            stage: "navigation",
            source,
        })?;
    let page: &dyn PageSession = page;

    dismiss_overlay(page, target, settings.popup_wait).await;

    let profile =
        extract_profile(page, CompanyProfile::new(target), target, settings.region_wait).await?;
    let posts = load_posts(page, target, FeedRequest::new(post_target, settings)).await?;

    Ok(profile.with_posts(posts))
}

/// Runs `work` to completion, converting a panic or an exhausted `budget`
/// into a [`ScraperError`].
async fn guarded<F>(
    work: F,
    target: &str,
    budget: Option<Duration>,
) -> Result<CompanyProfile, ScraperError>
where
    F: Future<Output = Result<CompanyProfile, ScraperError>>,
{
    let work = AssertUnwindSafe(work).catch_unwind();
    let caught = match budget {
        Some(budget) => tokio::time::timeout(budget, work)
            .await
            .map_err(|_| ScraperError::WorkerTimeout {
                target: target.to_string(),
                budget,
            })?,
        None => work.await,
    };

    caught.unwrap_or_else(|payload| {
        Err(ScraperError::Panicked {
            target: target.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;
