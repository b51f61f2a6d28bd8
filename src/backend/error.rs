//! Error type for the automation service boundary.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the automation service.
///
/// Transport covers connect errors and the client-side timeout; Status is a
/// non-success HTTP response with the backend's `detail` payload when one
/// was present; Decode is a well-formed response the console could not parse.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned {status} for {url}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        url: String,
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BackendError {
    /// Server-supplied detail message, when the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the failure was the client-side timeout expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Transport { source, .. } if source.is_timeout())
    }
}

/// Extract the `detail` field from a backend error body.
///
/// The backend reports failures as `{"detail": ...}` where detail is usually
/// a string but can be a structured validation payload.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
