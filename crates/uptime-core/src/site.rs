use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::probe::ProbeError;

/// A site descriptor as it appears in the config file.
///
/// Deserializing never fails: a missing field or a malformed entry is kept
/// and reported when the site is checked, so one bad entry cannot stop the
/// other sites from running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct Site {
    pub name: String,
    pub url: Option<String>,
    pub expected_status: Option<Vec<u16>>,
    /// Why the raw entry could not be read, if it could not.
    pub invalid: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expected_status: Option<Vec<u16>>,
}

impl From<Value> for Site {
    fn from(value: Value) -> Self {
        match SiteEntry::deserialize(&value) {
            Ok(entry) => Self {
                name: entry.name.unwrap_or_default(),
                url: entry.url,
                expected_status: entry.expected_status,
                invalid: None,
            },
            Err(e) => Self {
                name: value
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                url: value.get("url").and_then(Value::as_str).map(str::to_string),
                expected_status: None,
                invalid: Some(e.to_string()),
            },
        }
    }
}

impl Site {
    pub fn new(name: impl Into<String>, url: impl Into<String>, expected: &[u16]) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            expected_status: Some(expected.to_vec()),
            invalid: None,
        }
    }

    /// The URL to report in logs and payloads, empty when missing.
    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Returns the URL to probe and the healthy codes, or why the entry is unusable.
    pub fn target(&self) -> Result<(&str, &[u16]), SiteError> {
        if let Some(reason) = &self.invalid {
            return Err(SiteError::Invalid {
                name: self.name.clone(),
                reason: reason.clone(),
            });
        }
        let url = self.url.as_deref().ok_or_else(|| SiteError::MissingUrl {
            name: self.name.clone(),
        })?;
        let expected = self
            .expected_status
            .as_deref()
            .ok_or_else(|| SiteError::MissingExpectedStatus {
                name: self.name.clone(),
            })?;
        Ok((url, expected))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("site '{name}' has no url")]
    MissingUrl { name: String },
    #[error("site '{name}' has no expectedStatus")]
    MissingExpectedStatus { name: String },
    #[error("site '{name}' is malformed: {reason}")]
    Invalid { name: String, reason: String },
}

/// What a single check concluded.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    Healthy { status: u16 },
    UnexpectedStatus { status: u16 },
    Unreachable { error: ProbeError },
    Misconfigured { error: SiteError },
}

impl CheckOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    /// The observed HTTP code. `None` exactly when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Healthy { status } | Self::UnexpectedStatus { status } => Some(*status),
            Self::Unreachable { .. } | Self::Misconfigured { .. } => None,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy { status } => write!(f, "UP ({status})"),
            Self::UnexpectedStatus { status } => write!(f, "DOWN ({status})"),
            Self::Unreachable { error } => write!(f, "DOWN ({error})"),
            Self::Misconfigured { error } => write!(f, "DOWN ({error})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub site: Site,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn is_up(&self) -> bool {
        self.outcome.is_up()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.outcome.status_code()
    }
}
