use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Deserialize;

/// Returned for 401 responses. The retry layer treats it as permanent.
#[derive(Debug, thiserror::Error)]
#[error("unauthorized: {message}")]
pub struct UnauthorizedError {
    pub message: String,
}

/// Returned when the standard rate limit counter is exhausted.
#[derive(Debug, thiserror::Error)]
#[error("API rate limit exceeded; retry after {retry_after}")]
pub struct RateLimitError {
    pub retry_after: DateTime<Utc>,
}

/// Returned when a request triggers GitHub's abuse detection mechanism.
#[derive(Debug, thiserror::Error)]
#[error("abuse detection mechanism triggered; retry after {retry_after}")]
pub struct AbuseRateLimitError {
    pub retry_after: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected status {status}: {body}")]
pub struct HttpStatusError {
    pub status: StatusCode,
    pub body: String,
}

impl HttpStatusError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn with_body(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Error body shape used by the GitHub API for client errors.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorResponse {
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub fn is_abuse_rate_limit(&self) -> bool {
        self.documentation_url.contains("abuse") || self.message.contains("abuse detection")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abuse_detected_from_message() {
        let resp = ApiErrorResponse::parse(
            br#"{"message": "You have triggered an abuse detection mechanism."}"#,
        )
        .unwrap();
        assert!(resp.is_abuse_rate_limit());
    }

    #[test]
    fn abuse_detected_from_documentation_url() {
        let resp = ApiErrorResponse::parse(
            br#"{"message": "Forbidden", "documentation_url": "https://docs.github.com/abuse-rate-limits"}"#,
        )
        .unwrap();
        assert!(resp.is_abuse_rate_limit());
    }

    #[test]
    fn plain_forbidden_is_not_abuse() {
        let resp =
            ApiErrorResponse::parse(br#"{"message": "Resource not accessible"}"#).unwrap();
        assert!(!resp.is_abuse_rate_limit());
    }
}
