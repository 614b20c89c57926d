//! Status-specific copy for failed requests

use http::StatusCode;
use std::borrow::Cow;

/// Shown when the server could not be reached at all
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection.";

/// Shown when the request timed out
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";

/// Human-readable copy for an HTTP status
pub fn status_message(status: StatusCode) -> Cow<'static, str> {
    let msg = match status.as_u16() {
        400 => "Invalid request. Please check your input and try again.",
        401 => "Your session has expired. Please login again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This operation conflicts with existing data.",
        422 => "The data provided is invalid. Please check and try again.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "An internal server error occurred. Please try again later.",
        502 => "Bad gateway. The server is temporarily unavailable.",
        503 => "Service unavailable. Please try again later.",
        code if code >= 500 => "A server error occurred. Please try again later.",
        code => {
            return Cow::Owned(format!(
                "Request failed with status {code}. Please try again."
            ));
        }
    };
    Cow::Borrowed(msg)
}
