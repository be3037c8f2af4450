//! Chromium-backed page sessions via chromiumoxide.
//!
//! Every session launches its own browser process with a throwaway profile
//! directory, so concurrent workers share no cookies, storage, or tabs.
//! Closing the session shuts the browser down and removes the directory.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use orgscrape_core::AppConfig;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::{Element, PageSession, SessionProvider};

/// Interval between presence checks while waiting for a selector.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Browser launch options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumConfig {
    /// Explicit browser binary; chromiumoxide's own lookup is used when `None`.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
        }
    }
}

impl ChromiumConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            headless: config.headless,
        }
    }

    fn browser_config(&self, user_data_dir: &std::path::Path) -> Result<BrowserConfig, SessionError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(user_data_dir)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--window-size=1280,2000");
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !self.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(SessionError::Browser)
    }
}

/// Launches one browser per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumProvider {
    config: ChromiumConfig,
}

impl ChromiumProvider {
    #[must_use]
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for ChromiumProvider {
    async fn open(&self, target: &str) -> Result<Box<dyn PageSession>, SessionError> {
        let user_data_dir =
            std::env::temp_dir().join(format!("orgscrape-{}", Uuid::new_v4().simple()));
        let config = self.config.browser_config(&user_data_dir)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Browser(format!("failed to launch browser: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "browser handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let session = ChromiumSession {
                    page: None,
                    browser,
                    handler,
                    user_data_dir,
                };
                let error = SessionError::Browser(format!("failed to open tab: {e}"));
                if let Err(close_error) = Box::new(session).close().await {
                    tracing::warn!(target, error = %close_error, "failed to clean up browser");
                }
                return Err(error);
            }
        };

        tracing::debug!(target, dir = %user_data_dir.display(), "browser session opened");
        Ok(Box::new(ChromiumSession {
            page: Some(page),
            browser,
            handler,
            user_data_dir,
        }))
    }
}

/// One tab in a dedicated browser process.
pub struct ChromiumSession {
    page: Option<Page>,
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: PathBuf,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, SessionError> {
        self.page
            .as_ref()
            .ok_or_else(|| SessionError::Disconnected("page already closed".to_string()))
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        page.goto(url)
            .await
            .map_err(|e| match session_error(e, url) {
                fatal @ SessionError::Disconnected(_) => fatal,
                other => SessionError::Navigation {
                    url: url.to_string(),
                    reason: other.to_string(),
                },
            })?;
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Box<dyn Element>, SessionError> {
        let page = self.page()?;
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match page.find_elements(selector).await {
                Ok(elements) => {
                    if let Some(element) = elements.into_iter().next() {
                        return Ok(Box::new(ChromiumElement(element)));
                    }
                }
                Err(e) => match lookup_error(e, selector) {
                    SessionError::NotFound { .. } => {}
                    other => return Err(other),
                },
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(SessionError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError> {
        let elements = self
            .page()?
            .find_elements(selector)
            .await
            .or_else(|e| match lookup_error(e, selector) {
                SessionError::NotFound { .. } => Ok(Vec::new()),
                other => Err(other),
            })?;
        Ok(boxed(elements))
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        self.page()?
            .evaluate(SCROLL_TO_BOTTOM)
            .await
            .map_err(|e| session_error(e, SCROLL_TO_BOTTOM))?;
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> Result<(), SessionError> {
        let mut first_error = None;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                first_error.get_or_insert(SessionError::Browser(format!("failed to close tab: {e}")));
            }
        }
        if let Err(e) = self.browser.close().await {
            first_error.get_or_insert(SessionError::Browser(format!("failed to close browser: {e}")));
        }
        if let Err(e) = self.browser.wait().await {
            first_error.get_or_insert(SessionError::Browser(format!("browser did not exit: {e}")));
        }
        self.handler.abort();

        if let Err(e) = tokio::fs::remove_dir_all(&self.user_data_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(
                    dir = %self.user_data_dir.display(),
                    error = %e,
                    "failed to remove browser profile directory"
                );
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// A DOM node in a [`ChromiumSession`].
pub struct ChromiumElement(CdpElement);

#[async_trait]
impl Element for ChromiumElement {
    async fn find(&self, selector: &str) -> Result<Box<dyn Element>, SessionError> {
        // `find_element` describes node id 0 on a miss, which Chrome reports
        // as an unknown node; querying all matches keeps a miss distinguishable.
        let element = self
            .0
            .find_elements(selector)
            .await
            .map_err(|e| lookup_error(e, selector))?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NotFound {
                selector: selector.to_string(),
            })?;
        Ok(Box::new(ChromiumElement(element)))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn Element>>, SessionError> {
        let elements = self
            .0
            .find_elements(selector)
            .await
            .or_else(|e| match lookup_error(e, selector) {
                SessionError::NotFound { .. } => Ok(Vec::new()),
                other => Err(other),
            })?;
        Ok(boxed(elements))
    }

    async fn text(&self) -> Result<String, SessionError> {
        let text = self
            .0
            .inner_text()
            .await
            .map_err(|e| session_error(e, "innerText"))?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| session_error(e, name))
    }

    async fn click(&self) -> Result<(), SessionError> {
        self.0
            .click()
            .await
            .map_err(|e| session_error(e, "click"))?;
        Ok(())
    }
}

fn boxed(elements: Vec<CdpElement>) -> Vec<Box<dyn Element>> {
    elements
        .into_iter()
        .map(|element| Box::new(ChromiumElement(element)) as Box<dyn Element>)
        .collect()
}

/// Maps an error from a selector query. An unknown node id there means the
/// query matched nothing (or the scope was re-rendered), not a stale handle.
fn lookup_error(error: CdpError, selector: &str) -> SessionError {
    match session_error(error, selector) {
        SessionError::Stale => SessionError::NotFound {
            selector: selector.to_string(),
        },
        other => other,
    }
}

/// Maps a protocol error to a [`SessionError`]. `context` is the selector or
/// script the failing call was given.
fn session_error(error: CdpError, context: &str) -> SessionError {
    match error {
        CdpError::NotFound => SessionError::NotFound {
            selector: context.to_string(),
        },
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => {
            SessionError::Disconnected(error.to_string())
        }
        CdpError::JavascriptException(_) | CdpError::ScrollingFailed(_) => {
            SessionError::Script(error.to_string())
        }
        CdpError::Chrome(ref e) if is_stale_node(&e.message) => SessionError::Stale,
        CdpError::Chrome(ref e) if is_not_found(&e.message) => SessionError::NotFound {
            selector: context.to_string(),
        },
        CdpError::Chrome(ref e) if is_bad_selector(&e.message) => SessionError::InvalidSelector {
            selector: context.to_string(),
            reason: e.message.clone(),
        },
        other => SessionError::Browser(other.to_string()),
    }
}

fn is_stale_node(message: &str) -> bool {
    message.contains("No node with given id") || message.contains("Could not find node")
}

fn is_not_found(message: &str) -> bool {
    message.contains("Could not compute box model") || message.contains("Node is not found")
}

fn is_bad_selector(message: &str) -> bool {
    message.contains("DOM Error while querying")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_selector() {
        let err = session_error(CdpError::NotFound, "time");
        assert_eq!(
            err,
            SessionError::NotFound {
                selector: "time".to_string()
            }
        );
    }

    fn chrome_error(message: &str) -> CdpError {
        CdpError::Chrome(chromiumoxide::types::Error {
            code: -32000,
            message: message.to_string(),
        })
    }

    #[test]
    fn unknown_node_after_a_query_is_not_found() {
        let err = lookup_error(
            chrome_error("Could not find node with given id"),
            ".top-card-layout__card",
        );
        assert_eq!(
            err,
            SessionError::NotFound {
                selector: ".top-card-layout__card".to_string()
            }
        );
    }

    #[test]
    fn unknown_node_on_a_held_handle_is_stale() {
        let err = session_error(chrome_error("Could not find node with given id"), "innerText");
        assert_eq!(err, SessionError::Stale);
    }

    #[test]
    fn lookup_keeps_fatal_and_selector_errors() {
        assert!(lookup_error(CdpError::NoResponse, "h1").is_fatal());
        assert!(matches!(
            lookup_error(chrome_error("DOM Error while querying"), "div["),
            SessionError::InvalidSelector { .. }
        ));
    }

    #[test]
    fn missing_response_is_fatal() {
        let err = session_error(CdpError::NoResponse, "h1");
        assert!(err.is_fatal());
    }

    #[test]
    fn scrolling_failure_is_a_script_error() {
        let err = session_error(CdpError::ScrollingFailed("no viewport".to_string()), "x");
        assert!(matches!(err, SessionError::Script(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn protocol_messages_are_classified() {
        assert!(is_stale_node("No node with given id found"));
        assert!(is_bad_selector("DOM Error while querying"));
        assert!(!is_not_found("Something else"));
    }

    #[test]
    fn default_config_is_headless_without_explicit_binary() {
        let config = ChromiumConfig::default();
        assert!(config.headless);
        assert!(config.chrome_path.is_none());
    }
}
