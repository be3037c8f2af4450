use std::time::Duration;

use thiserror::Error;

/// Failures reported by a page session or one of its element handles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no element matches `{selector}`")]
    NotFound { selector: String },

    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("element is no longer attached to the document")]
    Stale,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("browser connection lost: {0}")]
    Disconnected(String),

    #[error("browser error: {0}")]
    Browser(String),
}

impl SessionError {
    /// `true` when the session itself is unusable and no further reads on it
    /// can succeed. Lookup misses and wait timeouts are not fatal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

/// Worker-level failures. Each one ends the worker with a failure outcome.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("could not open a page session for {target}: {source}")]
    SessionOpen {
        target: String,
        #[source]
        source: SessionError,
    },

    #[error("page session for {target} failed during {stage}: {source}")]
    Session {
        target: String,
        stage: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("worker for {target} exceeded its {budget:?} budget")]
    WorkerTimeout { target: String, budget: Duration },

    #[error("worker for {target} panicked: {message}")]
    Panicked { target: String, message: String },
}
