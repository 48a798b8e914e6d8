//! Centralized error handling for the dashboard sync engine
//!
//! Every failure of a REST call, a decode step or an invalid operation is
//! expressed as a [`SyncError`]. Components catch these at the operation
//! boundary and turn them into local state (error banners, toasts), so they
//! never escape to the caller as panics.

use reqwest::StatusCode;
use thiserror::Error;

/// Error type shared by the list, filter and KYC components
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Endpoint returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SyncError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Network(_) => "NETWORK_ERROR",
            SyncError::Timeout(_) => "TIMEOUT",
            SyncError::Http { .. } => "HTTP_ERROR",
            SyncError::Decode(_) => "DECODE_ERROR",
            SyncError::InvalidState(_) => "INVALID_STATE",
            SyncError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether a later retry of the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Network(_) | SyncError::Timeout(_) => true,
            SyncError::Http { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }

    /// Build an HTTP error from a status code and a response body.
    ///
    /// Uses the JSON `message` field when the body has one.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string()
            });

        SyncError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout(err.to_string())
        } else if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SyncError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            SyncError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(format!("Invalid JSON: {}", err))
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

/// Result type alias using SyncError
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SyncError::Network("down".to_string()).error_code(),
            "NETWORK_ERROR"
        );
        assert_eq!(
            SyncError::Http {
                status: 404,
                message: "missing".to_string()
            }
            .error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(
            SyncError::InvalidState("x".to_string()).error_code(),
            "INVALID_STATE"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(SyncError::Network("reset".to_string()).is_transient());
        assert!(SyncError::Timeout("30s".to_string()).is_transient());
        assert!(SyncError::Http {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(SyncError::Http {
            status: 429,
            message: String::new()
        }
        .is_transient());
        assert!(!SyncError::Http {
            status: 422,
            message: String::new()
        }
        .is_transient());
        assert!(!SyncError::Decode("bad".to_string()).is_transient());
    }

    #[test]
    fn test_from_response_prefers_json_message() {
        let err = SyncError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"The email field is required."}"#,
        );
        assert_eq!(
            err,
            SyncError::Http {
                status: 422,
                message: "The email field is required.".to_string()
            }
        );

        let err = SyncError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(
            err,
            SyncError::Http {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }
}
