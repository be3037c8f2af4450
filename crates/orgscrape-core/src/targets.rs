use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One company page to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Optional human label used in logs; defaults to the URL path.
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

impl TargetConfig {
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
        }
    }

    /// Label for logs: the configured name, else the last path segment of the URL.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_owned))
            })
            .unwrap_or_else(|| self.url.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetsFile {
    pub targets: Vec<TargetConfig>,
}

impl TargetsFile {
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.url.clone()).collect()
    }
}

/// Load and validate the target list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let targets_file: TargetsFile = serde_yaml::from_str(&content)?;
    validate_targets(&targets_file.targets)?;

    Ok(targets_file)
}

/// Checks that every target is an `http(s)` URL and that no page is listed twice.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] describing the first offending target.
pub fn validate_targets(targets: &[TargetConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for target in targets {
        let raw = target.url.trim();
        if raw.is_empty() {
            return Err(ConfigError::Validation(
                "target url must be non-empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(raw).map_err(|e| {
            ConfigError::Validation(format!("target '{raw}' is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "target '{raw}' must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let key = parsed.as_str().trim_end_matches('/').to_lowercase();
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate target: '{raw}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_name() {
        let target = TargetConfig {
            name: Some("Acme Corp".to_string()),
            url: "https://www.linkedin.com/company/acme".to_string(),
        };
        assert_eq!(target.label(), "Acme Corp");
    }

    #[test]
    fn label_falls_back_to_last_path_segment() {
        let target = TargetConfig::from_url("https://www.linkedin.com/company/acme/");
        assert_eq!(target.label(), "acme");
    }

    #[test]
    fn label_of_unparseable_url_is_the_url() {
        let target = TargetConfig::from_url("not a url");
        assert_eq!(target.label(), "not a url");
    }

    #[test]
    fn validate_accepts_distinct_https_targets() {
        let targets = vec![
            TargetConfig::from_url("https://www.linkedin.com/company/acme"),
            TargetConfig::from_url("https://www.linkedin.com/company/globex"),
        ];
        assert!(validate_targets(&targets).is_ok());
    }

    #[test]
    fn validate_rejects_empty_url() {
        let err = validate_targets(&[TargetConfig::from_url("  ")]).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let err =
            validate_targets(&[TargetConfig::from_url("ftp://example.com/company/acme")])
                .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn validate_rejects_duplicates_ignoring_trailing_slash_and_case() {
        let targets = vec![
            TargetConfig::from_url("https://www.linkedin.com/company/acme"),
            TargetConfig::from_url("https://www.linkedin.com/company/ACME/"),
        ];
        let err = validate_targets(&targets).unwrap_err();
        assert!(err.to_string().contains("duplicate target"));
    }

    #[test]
    fn parses_yaml_with_optional_names() {
        let yaml = r"
targets:
  - name: Acme
    url: https://www.linkedin.com/company/acme
  - url: https://www.linkedin.com/company/globex
";
        let file: TargetsFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.targets.len(), 2);
        assert_eq!(file.targets[0].name.as_deref(), Some("Acme"));
        assert!(file.targets[1].name.is_none());
        assert_eq!(
            file.urls(),
            [
                "https://www.linkedin.com/company/acme",
                "https://www.linkedin.com/company/globex"
            ]
        );
    }

    #[test]
    fn load_targets_reports_missing_file() {
        let err = load_targets(Path::new("/nonexistent/targets.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TargetsFileIo { .. }));
    }
}
