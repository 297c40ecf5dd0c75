//! Error types for translation service calls

use thiserror::Error;

/// Longest body excerpt shown when an HTTP error is displayed
const BODY_SNIPPET_CHARS: usize = 200;

/// Failures surfaced by [`TranslationClient`](crate::core::client::TranslationClient)
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server did not answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The transport could not reach the server or lost the connection
    #[error("Connection failure: {message}")]
    ConnectionFailure {
        /// Transport diagnostic
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP error: {status} - {}", snippet(.body))]
    HttpError {
        /// Response status code
        status: u16,
        /// Full response body, as text
        body: String,
    },

    /// The response body was not a JSON object
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Parser diagnostic
        message: String,
    },

    /// Local write of a downloaded artifact failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The request was rejected before anything was sent
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request
        message: String,
    },

    /// The client configuration is unusable
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What was wrong with the configuration
        message: String,
    },
}

/// Fieldless tag for matching on a [`ClientError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ClientError::Timeout`]
    Timeout,
    /// See [`ClientError::ConnectionFailure`]
    ConnectionFailure,
    /// See [`ClientError::HttpError`]
    HttpError,
    /// See [`ClientError::MalformedResponse`]
    MalformedResponse,
    /// See [`ClientError::IoError`]
    IoError,
    /// See [`ClientError::InvalidRequest`]
    InvalidRequest,
    /// See [`ClientError::ConfigError`]
    ConfigError,
}

impl ClientError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            ClientError::HttpError { .. } => ErrorKind::HttpError,
            ClientError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            ClientError::IoError(_) => ErrorKind::IoError,
            ClientError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ClientError::ConfigError { .. } => ErrorKind::ConfigError,
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        ClientError::InvalidRequest {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ClientError::ConfigError {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::ConnectionFailure {
                message: err.to_string(),
            }
        }
    }
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_truncates_body() {
        let err = ClientError::HttpError {
            status: 500,
            body: "x".repeat(1000),
        };
        let shown = err.to_string();
        assert!(shown.starts_with("HTTP error: 500 - "));
        assert!(shown.ends_with("..."));
        assert!(shown.len() < 300);
    }

    #[test]
    fn test_http_error_keeps_full_body() {
        let body = "é".repeat(300);
        let err = ClientError::HttpError {
            status: 502,
            body: body.clone(),
        };
        match err {
            ClientError::HttpError { body: kept, .. } => assert_eq!(kept, body),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ClientError::Timeout.kind(), ErrorKind::Timeout);
        assert_eq!(
            ClientError::invalid_request("empty").kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(ClientError::config("bad").kind(), ErrorKind::ConfigError);
        let io = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists");
        assert_eq!(ClientError::from(io).kind(), ErrorKind::IoError);
    }
}
