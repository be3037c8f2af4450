//! Infinite-scroll feed loading and per-item post extraction.
//!
//! Loading is a bounded polling loop: scroll, settle, re-count, until the
//! feed holds `target` items or `max_scrolls` attempts were made. Reaching
//! fewer items than requested is a normal result. Extraction then reads every
//! loaded item; an item missing one of its required fields is dropped
//! (logged), while likes and comments fall back to placeholder text.

use std::time::Duration;

use orgscrape_core::Post;

use crate::error::{ScraperError, SessionError};
use crate::field::{read_field, FieldMiss};
use crate::selectors::feed;
use crate::session::{Element, PageSession};
use crate::settings::ScrapeSettings;

/// Bounds for one feed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    /// Number of feed items to aim for.
    pub target: usize,
    pub max_scrolls: u32,
    pub scroll_settle: Duration,
    pub expand_settle: Duration,
}

impl FeedRequest {
    #[must_use]
    pub fn new(target: usize, settings: &ScrapeSettings) -> Self {
        Self {
            target,
            max_scrolls: settings.max_scrolls,
            scroll_settle: settings.scroll_settle,
            expand_settle: settings.expand_settle,
        }
    }
}

/// Items present after the loading phase.
pub struct LoadedFeed {
    pub items: Vec<Box<dyn Element>>,
    pub scroll_attempts: u32,
}

/// Loads the feed and extracts its posts in DOM order.
///
/// # Errors
///
/// Returns [`ScraperError::Session`] if counting items or scrolling fails;
/// both mean the page itself is no longer usable. Per-item failures never
/// surface here.
pub async fn load_posts(
    page: &dyn PageSession,
    target: &str,
    request: FeedRequest,
) -> Result<Vec<Post>, ScraperError> {
    let loaded = load_feed(page, request)
        .await
        .map_err(|source| ScraperError::Session {
            target: target.to_string(),
            stage: "feed loading",
            source,
        })?;

    tracing::info!(
        target,
        loaded = loaded.items.len(),
        requested = request.target,
        scroll_attempts = loaded.scroll_attempts,
        "feed loaded"
    );

    let mut posts = Vec::with_capacity(loaded.items.len());
    for (index, item) in loaded.items.iter().enumerate() {
        match extract_post(item.as_ref(), request.expand_settle).await {
            Ok(post) => posts.push(post),
            Err(miss) => {
                tracing::warn!(target, index, error = %miss, "skipping feed item");
            }
        }
    }

    tracing::debug!(target, extracted = posts.len(), "feed extracted");
    Ok(posts)
}

/// Scrolls until the feed holds `request.target` items or the attempt
/// ceiling is reached.
///
/// # Errors
///
/// Propagates the session error from counting or scrolling.
pub async fn load_feed(
    page: &dyn PageSession,
    request: FeedRequest,
) -> Result<LoadedFeed, SessionError> {
    let mut items = page.find_all(feed::ITEMS).await?;
    let mut scroll_attempts = 0u32;

    while items.len() < request.target && scroll_attempts < request.max_scrolls {
        page.scroll_to_bottom().await?;
        tokio::time::sleep(request.scroll_settle).await;
        items = page.find_all(feed::ITEMS).await?;
        scroll_attempts += 1;
        tracing::trace!(scroll_attempts, count = items.len(), "scrolled feed");
    }

    Ok(LoadedFeed {
        items,
        scroll_attempts,
    })
}

/// Reads one feed item.
///
/// # Errors
///
/// Returns the first [`FieldMiss`] among the link, organization, followers,
/// time, and body fields.
pub async fn extract_post(item: &dyn Element, expand_settle: Duration) -> Result<Post, FieldMiss> {
    let link = read_field(item, feed::LINK).await.required()?;
    let organization = read_field(item, feed::ORGANIZATION).await.required()?;
    let followers = read_field(item, feed::FOLLOWERS).await.required()?;
    let date = read_field(item, feed::TIME).await.required()?;

    if expand_body(item).await {
        tokio::time::sleep(expand_settle).await;
    }

    let text = read_field(item, feed::BODY).await.required()?;
    let likes = read_field(item, feed::LIKES).await.or(feed::NO_LIKES);
    let comments_count = read_field(item, feed::COMMENTS).await.or(feed::NO_COMMENTS);

    Ok(Post {
        organization,
        followers,
        date,
        text,
        likes,
        comments_count,
        link,
    })
}

/// Clicks the item's "See more" button when it has one. Returns whether a
/// click happened.
async fn expand_body(item: &dyn Element) -> bool {
    let Ok(buttons) = item.find_all(feed::EXPANDER_BUTTON).await else {
        return false;
    };
    for button in buttons {
        let Ok(label) = button.text().await else {
            continue;
        };
        if !label.contains(feed::EXPANDER_LABEL) {
            continue;
        }
        return match button.click().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "could not expand post body");
                false
            }
        };
    }
    false
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
