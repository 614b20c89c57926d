//! Client error types

use http::StatusCode;
use shared::error::{ErrorCategory, NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE};
use thiserror::Error;

/// Message shown when a call is made before a school context exists
pub const MISSING_TENANT_MESSAGE: &str = "School context not set. Please login again.";

/// Client error type
///
/// `Display` is the human-readable line a page shows to the user.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No tenant context for a school-scoped call
    #[error("School context not set. Please login again.")]
    MissingTenantContext,

    /// 401 from the backend, the session has been cleared
    #[error("{0}")]
    Unauthorized(String),

    /// Non-2xx response from the backend
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Server unreachable
    #[error("Unable to connect to the server. Please check your internet connection.")]
    Network(String),

    /// Request timed out
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),

    /// Invalid response format
    #[error("{0}")]
    InvalidResponse(String),

    /// Malformed access token
    #[error("{0}")]
    Token(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local file error
    #[error("I/O error: {0}")]
    Io(String),
}

impl ClientError {
    /// HTTP status of a failed call, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    /// Category of a server-side failure
    pub fn category(&self) -> Option<ErrorCategory> {
        self.status().map(ErrorCategory::from_status)
    }

    /// 401: the session is gone
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// 403
    pub fn is_permission_error(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// 400/422 from the server or a local validation failure
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
            || self.category() == Some(ErrorCategory::Validation)
    }

    /// Connectivity or timeout
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Whether an idempotent read may be retried
    pub fn is_retryable(&self) -> bool {
        self.is_network_error() || self.category().is_some_and(|c| c.is_transient())
    }

    /// Detailed form for logs (the `Display` form is user copy)
    pub fn log_detail(&self) -> String {
        match self {
            Self::Network(detail) => format!("{NETWORK_ERROR_MESSAGE} ({detail})"),
            Self::Timeout => TIMEOUT_MESSAGE.to_string(),
            Self::Api { status, message } => format!("{status}: {message}"),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter()
                    .map(|e| {
                        let msg = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string());
                        if field == "__all__" {
                            msg
                        } else {
                            format!("{field}: {msg}")
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        parts.sort();
        Self::Validation(parts.join(", "))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
