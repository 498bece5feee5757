//! Client error types

use crate::session::SessionError;
use serde_json::Value;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built
    #[error("Failed to build request: {0}")]
    Build(#[source] reqwest::Error),

    /// The token store or another session collaborator failed
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    /// The stored token cannot be sent as a header value
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Network or transport error, no response was received
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Authentication failed (401)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String, body: Option<Value> },

    /// Resource not found
    #[error("Resource not found: {message}")]
    NotFound { message: String, body: Option<Value> },

    /// Bad request
    #[error("Bad request: {message}")]
    BadRequest { message: String, body: Option<Value> },

    /// Forbidden
    #[error("Forbidden: {message}")]
    Forbidden { message: String, body: Option<Value> },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        let body = serde_json::from_str::<Value>(&message).ok();
        match status.as_u16() {
            400 => Self::BadRequest { message, body },
            401 => Self::AuthenticationFailed { message, body },
            403 => Self::Forbidden { message, body },
            404 => Self::NotFound { message, body },
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
                body,
            },
        }
    }

    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::AuthenticationFailed { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the credential as invalid
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Structured body the server sent with the failure, if it was JSON
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::BadRequest { body, .. }
            | Self::AuthenticationFailed { body, .. }
            | Self::Forbidden { body, .. }
            | Self::NotFound { body, .. }
            | Self::ServerError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Best-effort payload for logging: the server body when present,
    /// otherwise the error message itself.
    pub fn payload(&self) -> String {
        if let Some(body) = self.body() {
            return body.to_string();
        }
        match self {
            Self::BadRequest { message, .. }
            | Self::AuthenticationFailed { message, .. }
            | Self::Forbidden { message, .. }
            | Self::NotFound { message, .. }
            | Self::ServerError { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn maps_status_codes() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, "nope".into());
        assert!(matches!(err, ClientError::AuthenticationFailed { .. }));
        assert!(err.is_unauthorized());

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn payload_prefers_json_body() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid email"}"#.into(),
        );
        assert_eq!(err.body().map(|b| b["error"].clone()), Some("invalid email".into()));
        assert_eq!(err.payload(), r#"{"error":"invalid email"}"#);
    }

    #[test]
    fn payload_falls_back_to_text_then_message() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, "missing".into());
        assert!(err.body().is_none());
        assert_eq!(err.payload(), "missing");

        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new());
        assert_eq!(err.payload(), "Server error 500: ");

        let err = ClientError::Configuration("base_url is required".into());
        assert_eq!(err.payload(), "Invalid configuration: base_url is required");
    }
}
