//! Backend error envelope and user-facing error copy
//!
//! The backend reports failures as
//!
//! ```json
//! { "message": "..." | ["...", "..."], "error": "Bad Request", "statusCode": 400, "details": { "field": "msg" } }
//! ```
//!
//! [`BackendError::user_message`] reduces that envelope to one
//! human-readable line, falling back to status-specific copy from
//! [`status_message`] when the body carries nothing usable.
//!
//! # Example
//!
//! ```
//! use shared::error::BackendError;
//! use shared::http::StatusCode;
//!
//! let body = br#"{"message":["name should not be empty","date must be a valid ISO 8601 date string"]}"#;
//! let msg = BackendError::message_from_body(StatusCode::BAD_REQUEST, body);
//! assert_eq!(msg, "name should not be empty, date must be a valid ISO 8601 date string");
//! ```

mod category;
mod http;

pub use category::ErrorCategory;
pub use self::http::{NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE, status_message};

use ::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendError {
    /// A string or a list of validation messages; other shapes are skipped
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl BackendError {
    /// Message carried by the envelope itself, if any
    ///
    /// Order: message list, message string, `error`, then `details`
    /// rendered as `field: message`.
    pub fn extract(&self) -> Option<String> {
        match &self.message {
            Some(Value::Array(list)) => {
                let joined = list
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            Some(Value::String(msg)) if !msg.is_empty() => return Some(msg.clone()),
            _ => {}
        }

        if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
            return Some(error.to_string());
        }

        if let Some(Value::Object(details)) = &self.details {
            let joined = details
                .iter()
                .map(|(field, msg)| match msg {
                    Value::String(s) => format!("{field}: {s}"),
                    other => format!("{field}: {other}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }

        None
    }

    /// Envelope message, or the status copy when the envelope is empty
    pub fn user_message(&self, status: StatusCode) -> String {
        self.extract()
            .unwrap_or_else(|| status_message(status).into_owned())
    }

    /// Reduce a raw error body to a user-facing message
    ///
    /// Bodies that are not a JSON envelope fall back to the status copy.
    pub fn message_from_body(status: StatusCode, body: &[u8]) -> String {
        match serde_json::from_slice::<BackendError>(body) {
            Ok(envelope) => envelope.user_message(status),
            Err(_) => status_message(status).into_owned(),
        }
    }
}
