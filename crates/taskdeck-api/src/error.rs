//! API error surface.

use std::fmt;

/// Fallback shown when the backend supplies no message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced a response (DNS, connect, timeout).
    Transport,
    /// Non-2xx HTTP status.
    Status(u16),
    /// 2xx response with `success: false`.
    Backend,
    /// Response body did not match the expected shape.
    Decode,
}

/// A failed backend interaction. Carries the user-facing message: the
/// server-provided one where available, otherwise a generic default.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    pub fn status(code: u16, message: Option<String>) -> Self {
        Self::new(
            ApiErrorKind::Status(code),
            message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        )
    }

    pub fn backend(message: Option<String>) -> Self {
        Self::new(
            ApiErrorKind::Backend,
            message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Transport => write!(f, "request failed: {}", self.message),
            ApiErrorKind::Status(code) => write!(f, "backend returned {}: {}", code, self.message),
            ApiErrorKind::Backend => write!(f, "{}", self.message),
            ApiErrorKind::Decode => write!(f, "unexpected response shape: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
