//! Page-session capability consumed by the extractors.
//!
//! The extractors never talk to a browser directly. They see a page as a
//! [`PageSession`] that can wait for and look up elements by CSS selector,
//! scroll, and close; and each element as an [`Element`] exposing text,
//! attributes, click, and scoped lookups. [`crate::chromium`] provides the
//! Chromium-backed implementation; tests use the scripted pages in
//! `crate::testing`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;

/// A handle to one element in the loaded document.
#[async_trait]
pub trait Element: Send + Sync {
    /// First descendant matching `selector`.
    async fn find(&self, selector: &str) -> Result<Box<dyn Element>, SessionError>;

    /// All descendants matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError>;

    /// Rendered text content.
    async fn text(&self) -> Result<String, SessionError>;

    /// Value of the named attribute, `None` when the element lacks it.
    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError>;

    async fn click(&self) -> Result<(), SessionError>;
}

/// An active, loaded page owned by exactly one session worker.
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Waits up to `timeout` for an element matching `selector` to be present.
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Element>, SessionError>;

    /// All elements matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError>;

    /// Scrolls the window to the bottom of the document, triggering lazy loads.
    async fn scroll_to_bottom(&self) -> Result<(), SessionError>;

    /// Releases the session and every resource it holds.
    async fn close(self: Box<Self>) -> Result<(), SessionError>;
}

/// Hands out fresh page sessions, one per worker.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquires a new session for `target`. The session is not yet navigated.
    async fn open(&self, target: &str) -> Result<Box<dyn PageSession>, SessionError>;
}
