//! Best-effort single-field reads.
//!
//! [`read_field`] never fails: every lookup problem (no matching element,
//! missing attribute, stale handle, bad selector) comes back as
//! [`Field::Absent`] carrying the reason. Callers decide whether a miss means
//! "use a default" ([`Field::or_empty`], [`Field::or`]) or "this record is
//! unusable" ([`Field::required`]).

use thiserror::Error;

use crate::error::SessionError;
use crate::session::Element;

/// Where a field lives inside a region: a selector plus, optionally, the
/// attribute to read instead of the element's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocator {
    pub selector: &'static str,
    pub attribute: Option<&'static str>,
}

impl FieldLocator {
    #[must_use]
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            attribute: None,
        }
    }

    #[must_use]
    pub const fn attribute(selector: &'static str, attribute: &'static str) -> Self {
        Self {
            selector,
            attribute: Some(attribute),
        }
    }
}

/// Why a field read came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldMiss {
    #[error("no element matches `{selector}`")]
    NoElement { selector: &'static str },

    #[error("`{selector}` has no `{attribute}` attribute")]
    NoAttribute {
        selector: &'static str,
        attribute: &'static str,
    },

    #[error("`{selector}` could not be read: {source}")]
    Unreadable {
        selector: &'static str,
        #[source]
        source: SessionError,
    },
}

/// Result of a single field read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Present(String),
    Absent(FieldMiss),
}

impl Field {
    /// The value, or the empty string when absent.
    #[must_use]
    pub fn or_empty(self) -> String {
        self.or("")
    }

    /// The value, or `default` when absent.
    #[must_use]
    pub fn or(self, default: &str) -> String {
        match self {
            Self::Present(value) => value,
            Self::Absent(_) => default.to_string(),
        }
    }

    /// The value, or the miss as an error for records that cannot do without it.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldMiss`] when the field is absent.
    pub fn required(self) -> Result<String, FieldMiss> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent(miss) => Err(miss),
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Reads one field from `scope`.
pub async fn read_field(scope: &dyn Element, locator: FieldLocator) -> Field {
    let selector = locator.selector;

    let element = match scope.find(selector).await {
        Ok(element) => element,
        Err(SessionError::NotFound { .. }) => {
            return Field::Absent(FieldMiss::NoElement { selector });
        }
        Err(source) => return Field::Absent(FieldMiss::Unreadable { selector, source }),
    };

    let value = match locator.attribute {
        None => element.text().await.map(Some),
        Some(attribute) => element.attribute(attribute).await,
    };

    match value {
        Ok(Some(value)) => Field::Present(value),
        Ok(None) => Field::Absent(FieldMiss::NoAttribute {
            selector,
            attribute: locator.attribute.unwrap_or_default(),
        }),
        Err(source) => Field::Absent(FieldMiss::Unreadable { selector, source }),
    }
}
