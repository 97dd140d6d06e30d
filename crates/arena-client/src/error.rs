//! Request errors.
//!
//! Every remote failure collapses into a single [`RequestError`] whose
//! display string is the message shown to the user. The
//! [`RequestErrorKind`] keeps enough structure for logging and codes.

use arena_types::ErrorCode;
use serde::Deserialize;
use thiserror::Error;

/// Maximum length of a raw body echoed into logs.
const MAX_LOGGED_BODY: usize = 200;

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The service answered with a non-2xx status.
    Status(u16),
    /// The request timed out in the transport.
    Timeout,
    /// Could not connect (refused, DNS, TLS handshake).
    Connect,
    /// The body could not be decoded into the expected shape.
    Decode,
    /// The configured base URL is unusable.
    InvalidUrl,
    /// Any other transport failure.
    Network,
}

/// Uniform failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    kind: RequestErrorKind,
    message: String,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an error from a non-success response.
    ///
    /// Uses the `detail` field of a JSON error body when present:
    /// either a string, or a list whose first element's `msg` is taken.
    /// Falls back to `Request failed with <status>`.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message =
            detail_message(body).unwrap_or_else(|| format!("Request failed with {status}"));
        Self::new(RequestErrorKind::Status(status), message)
    }

    /// Classifies a reqwest error.
    #[must_use]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            RequestErrorKind::Timeout
        } else if error.is_connect() {
            RequestErrorKind::Connect
        } else if error.is_decode() {
            RequestErrorKind::Decode
        } else if error.is_builder() {
            RequestErrorKind::InvalidUrl
        } else {
            RequestErrorKind::Network
        };
        Self::new(kind, error.to_string())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Decode, message)
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::InvalidUrl, message)
    }

    #[must_use]
    pub fn kind(&self) -> RequestErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status when the service answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            RequestErrorKind::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl ErrorCode for RequestError {
    fn code(&self) -> &'static str {
        match self.kind {
            RequestErrorKind::Status(400 | 422) => "REQUEST_INVALID",
            RequestErrorKind::Status(404) => "REQUEST_NOT_FOUND",
            RequestErrorKind::Status(429) => "REQUEST_RATE_LIMITED",
            RequestErrorKind::Status(500..=599) => "REQUEST_SERVER_ERROR",
            RequestErrorKind::Status(_) => "REQUEST_HTTP_ERROR",
            RequestErrorKind::Timeout => "REQUEST_TIMEOUT",
            RequestErrorKind::Connect => "REQUEST_CONNECT_FAILED",
            RequestErrorKind::Decode => "REQUEST_DECODE_FAILED",
            RequestErrorKind::InvalidUrl => "REQUEST_INVALID_URL",
            RequestErrorKind::Network => "REQUEST_NETWORK",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self.kind {
            RequestErrorKind::Status(status) => status == 429 || status >= 500,
            RequestErrorKind::Timeout | RequestErrorKind::Connect | RequestErrorKind::Network => {
                true
            }
            RequestErrorKind::Decode | RequestErrorKind::InvalidUrl => false,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
}

#[derive(Deserialize)]
struct DetailItem {
    msg: String,
}

fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Detail::Message(message) if !message.is_empty() => Some(message),
        Detail::Message(_) => None,
        Detail::Items(items) => items.into_iter().next().map(|item| item.msg),
    }
}

/// Truncates a body for safe inclusion in log lines.
pub(crate) fn truncate_for_log(s: &str) -> &str {
    if s.len() <= MAX_LOGGED_BODY {
        return s;
    }
    let mut end = MAX_LOGGED_BODY;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used() {
        let err = RequestError::from_status(404, r#"{"detail":"Battle not found"}"#);
        assert_eq!(err.to_string(), "Battle not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), "REQUEST_NOT_FOUND");
    }

    #[test]
    fn list_detail_uses_first_msg() {
        let body = r#"{"detail":[{"loc":["body","topic"],"msg":"String should have at least 3 characters"},{"msg":"second"}]}"#;
        let err = RequestError::from_status(422, body);
        assert_eq!(err.message(), "String should have at least 3 characters");
        assert_eq!(err.code(), "REQUEST_INVALID");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn unparseable_body_gets_generic_message() {
        let err = RequestError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with 502");
        assert!(err.is_recoverable());

        let empty_list = RequestError::from_status(500, r#"{"detail":[]}"#);
        assert_eq!(empty_list.to_string(), "Request failed with 500");

        let no_detail = RequestError::from_status(400, r#"{"error":"nope"}"#);
        assert_eq!(no_detail.to_string(), "Request failed with 400");
    }

    #[test]
    fn non_status_errors_have_no_status() {
        let err = RequestError::decode("bad json");
        assert_eq!(err.status(), None);
        assert_eq!(err.kind(), RequestErrorKind::Decode);
        assert_eq!(err.code(), "REQUEST_DECODE_FAILED");
    }

    #[test]
    fn truncate_respects_char_boundary() {
        let long = "あ".repeat(100);
        let cut = truncate_for_log(&long);
        assert!(cut.len() <= MAX_LOGGED_BODY);
        assert!(long.starts_with(cut));
        assert_eq!(truncate_for_log("short"), "short");
    }
}
