//! Error category classification

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error category derived from the HTTP status of a failed call
///
/// - 400, 422: validation
/// - 401: auth (fatal to the session)
/// - 403: permission
/// - 404: not found
/// - 409: conflict
/// - 429: rate limited
/// - 5xx: server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Auth,
    Permission,
    NotFound,
    Conflict,
    RateLimited,
    Server,
    Other,
}

impl ErrorCategory {
    /// Classify a status code
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => Self::Validation,
            401 => Self::Auth,
            403 => Self::Permission,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate_limited",
            Self::Server => "server",
            Self::Other => "other",
        }
    }

    /// Whether retrying the same request can succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server)
    }
}
