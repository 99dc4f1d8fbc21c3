//! Error type for the capsule backend client
//!
//! Every failure, whether the request never reached the server or the server
//! answered with a non-2xx status, is normalized into `{ message, status }`.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when neither the transport nor the body says anything useful
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred with the backend service";

/// Status reported for failures that never produced an HTTP response
pub const TRANSPORT_STATUS: u16 = 0;

/// Normalized backend error
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// Human-readable message, shown to the user
    pub message: String,
    /// HTTP status, or 0 when the request failed before a response
    pub status: u16,
}

impl ApiError {
    /// Create an error with an explicit message and status
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Error for a request that failed before any response arrived
    pub fn transport(error: &reqwest::Error) -> Self {
        let message = error.to_string();
        if message.is_empty() {
            Self::new(DEFAULT_ERROR_MESSAGE, TRANSPORT_STATUS)
        } else {
            Self::new(message, TRANSPORT_STATUS)
        }
    }

    /// Error for a non-2xx response, pulling the message out of the body
    ///
    /// The body may be a JSON string, a JSON object with `message` or
    /// `error`, or plain text.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::new(extract_message(body), status)
    }

    /// Whether the request never reached the server
    pub fn is_transport(&self) -> bool {
        self.status == TRANSPORT_STATUS
    }

    /// Whether the backend rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return DEFAULT_ERROR_MESSAGE.to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) if !message.is_empty() => message,
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|field| match map.get(*field) {
                Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        Ok(_) => DEFAULT_ERROR_MESSAGE.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
