//! Errors returned by [`JiraClient`](super::JiraClient).

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result alias for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure talking to the Jira server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("http {status}: {message}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// First error message Jira reported, or the raw body.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Credentials were rejected (401/403).
    #[error("authentication failed ({status}): {message}")]
    Authentication {
        /// Response status.
        status: StatusCode,
        /// Server message, if any.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Could not connect to the server.
    #[error("network error: {0}")]
    Network(String),

    /// Client construction or any other transport failure.
    #[error("unexpected error: {0}")]
    Other(String),
}

impl ApiError {
    /// Classify a non-success response.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        let message = extract_message(&body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            } else {
                body.clone()
            }
        });

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Authentication { status, message }
        } else {
            Self::Http {
                status,
                message,
                body,
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Pull the first human-readable message out of a Jira error body.
///
/// Jira answers with `{"errorMessages": [...], "errors": {"field": "..."}}`.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let from_list = value
        .get("errorMessages")
        .and_then(Value::as_array)
        .and_then(|msgs| msgs.iter().find_map(Value::as_str))
        .map(str::to_string);

    from_list.or_else(|| {
        value
            .get("errors")
            .and_then(Value::as_object)
            .and_then(|errors| {
                errors
                    .iter()
                    .find_map(|(field, msg)| msg.as_str().map(|m| format!("{field}: {m}")))
            })
    })
}
