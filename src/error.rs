// src/error.rs
use serde_json::Value;
use thiserror::Error;

/// Every failure a remote call can end in, already reduced to one message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// No usable token in the session.
    #[error("Please login again")]
    AuthMissing,

    /// Transport failure: connection refused, DNS, TLS, reset.
    #[error("Network error. Please check your connection. ({0})")]
    Network(String),

    /// Non-success response; `message` is what the user sees.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Success response with a body we could not decode.
    #[error("Unexpected response from analysis service: {0}")]
    Decode(String),

    /// Rejected locally before any request was made.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Session storage error: {0}")]
    Session(String),
}

impl ClientError {
    /// Normalize an error body into a `Remote` error.
    ///
    /// `detail` may be a string or a list of validation objects; `message` is
    /// the fallback field; `fallback` is used when neither is present or the
    /// body is not JSON at all.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| extract_error_message(&value))
            .unwrap_or_else(|| fallback.to_string());

        ClientError::Remote { status, message }
    }

    /// Retry makes sense: transport failures and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The user has to authenticate again before anything else will work.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::AuthMissing | ClientError::Remote { status: 401, .. }
        )
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

fn extract_error_message(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items.iter().map(detail_item_text).collect();
            return Some(parts.join(", "));
        }
        _ => {}
    }

    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn detail_item_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => match other.get("msg") {
            Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
            _ => other.to_string(),
        },
    }
}

/// A command-line key that names no known filter category or sort order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownKeyError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}
