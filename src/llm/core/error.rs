//! Error types for the adapter layer

use std::time::Duration;
use thiserror::Error;

use crate::llm::http::RawResponse;

/// HTTP statuses that are never worth retrying: the request itself is wrong.
const STATUS_NO_RETRY: [u16; 9] = [400, 401, 402, 403, 404, 405, 406, 407, 409];

/// Errors that can occur when using provider adapters
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A required credential was neither passed explicitly nor found by the resolver
    #[error("Missing credential `{field}`: pass it explicitly or set the {env_var} environment variable")]
    MissingCredential { field: String, env_var: String },

    /// The same parameter was supplied in two places that cannot both be honored
    #[error("Conflicting parameter `{name}`: {reason}")]
    ConflictingParameter { name: String, reason: String },

    /// The provider answered with a non-success status
    #[error("{provider} call to {url} failed with status code {status}")]
    HttpStatus {
        provider: String,
        status: u16,
        url: String,
        response: RawResponse,
    },

    /// No response was received at all
    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// The response envelope lacked a field the adapter treats as mandatory
    #[error("Empty result from {provider}: no `{field}` found in response")]
    EmptyResult { provider: String, field: String },

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// The per-call timeout elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Moderation flagged the input and the chain is configured to fail
    #[error("Content policy violation: {0}")]
    ContentPolicy(String),
}

impl AdapterError {
    /// Whether the shared caller may retry after this error
    pub fn is_retryable(&self) -> bool {
        match self {
            AdapterError::HttpStatus { status, .. } => !STATUS_NO_RETRY.contains(status),
            AdapterError::Transport { .. } => true,
            _ => false,
        }
    }

    /// The raw provider response, if this error carries one
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            AdapterError::HttpStatus { response, .. } => Some(response),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_status(status: u16) -> AdapterError {
        AdapterError::HttpStatus {
            provider: "AI21".to_string(),
            status,
            url: "https://api.ai21.com/studio/v1/j2-ultra/complete".to_string(),
            response: RawResponse::new(status, "https://api.ai21.com/studio/v1/j2-ultra/complete", "oops"),
        }
    }

    #[test]
    fn test_missing_credential_names_field_and_variable() {
        let err = AdapterError::MissingCredential {
            field: "api_key".to_string(),
            env_var: "AI21_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("api_key"));
        assert!(err.to_string().contains("AI21_API_KEY"));
    }

    #[test]
    fn test_http_status_message() {
        let err = http_status(500);
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("AI21"));
        assert!(msg.contains("j2-ultra/complete"));
        assert_eq!(err.response().unwrap().text(), "oops");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(http_status(500).is_retryable());
        assert!(http_status(429).is_retryable());
        assert!(http_status(408).is_retryable());
        assert!(!http_status(400).is_retryable());
        assert!(!http_status(401).is_retryable());
        assert!(!http_status(409).is_retryable());
    }

    #[test]
    fn test_terminal_errors_not_retryable() {
        assert!(AdapterError::Transport {
            url: "http://localhost".to_string(),
            message: "connection refused".to_string(),
        }
        .is_retryable());
        assert!(!AdapterError::Cancelled.is_retryable());
        assert!(!AdapterError::EmptyResult {
            provider: "AI21".to_string(),
            field: "completions".to_string(),
        }
        .is_retryable());
        assert!(!AdapterError::ConflictingParameter {
            name: "stop".to_string(),
            reason: "set twice".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AdapterError = json_err.into();
        assert!(matches!(err, AdapterError::Serialization(_)));
    }
}
