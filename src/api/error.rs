use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by the service itself (HTTP status >= 400).
///
/// Keep the correlation id when escalating a failed request to the vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: u16,
    pub description: String,
    pub correlation_id: String,
}

impl ApiError {
    pub fn new(code: u16, description: String, correlation_id: String) -> Self {
        ApiError {
            code,
            description,
            correlation_id,
        }
    }

    /// Builds the error from a failed response. Each field is read on its own,
    /// so a missing, null or mistyped field never costs the others. The HTTP
    /// status stands in for an unusable code.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Value = serde_json::from_str(body).unwrap_or_default();
        let text = |key: &str| {
            parsed
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let code = parsed
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(status.as_u16());

        ApiError {
            code,
            description: text("description"),
            correlation_id: text("correlationId"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.description)
    }
}

impl std::error::Error for ApiError {}

/// Why a login attempt did not yield a token.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("login rejected with status {0}")]
    Status(StatusCode),

    #[error("malformed login response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("login response status is {0:?}, expected \"ok\"")]
    Rejected(String),

    #[error("login response carries no token")]
    EmptyToken,

    #[error("no token, authenticate first")]
    MissingToken,
}
