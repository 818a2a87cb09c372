//! Error types for the API clients.

/// Errors that can occur when building or executing API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller-supplied input was malformed. No request was sent.
    #[error("Invalid argument: {0}")]
    Validation(String),
    /// The service requires an API key and none was configured.
    #[error("{service} API key is required but was not provided")]
    MissingApiKey { service: &'static str },
    /// The client configuration is unusable (empty base URL, zero timeout, ...).
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
    /// A connection failure, timeout, or retryable status persisted through
    /// every allowed attempt.
    #[error("Request failed after {attempts} attempt(s): {message}")]
    Network { attempts: u32, message: String },
    /// The API returned a non-retryable, non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API answered with a success status but reported an error in the body.
    #[error("{service} API error: {message}")]
    Service {
        service: &'static str,
        message: String,
    },
    /// A success body could not be parsed into the expected shape.
    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),
    /// The client was closed before the request was issued.
    #[error("{service} client is closed")]
    Closed { service: &'static str },
}

impl Error {
    /// True for failures that happened before anything was sent over the wire.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::MissingApiKey { .. } | Error::InvalidConfig(_)
        )
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn validation(msg: impl Into<String>) -> Error {
    Error::Validation(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = Error::Network {
            attempts: 4,
            message: "HTTP 503".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed after 4 attempt(s): HTTP 503");

        let err = Error::MissingApiKey { service: "FRED" };
        assert!(err.to_string().contains("FRED API key"));

        let err = Error::HttpStatus {
            status: 404,
            body: "nope".to_string(),
        };
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn validation_class() {
        assert!(validation("bad year").is_validation());
        assert!(Error::MissingApiKey { service: "BEA" }.is_validation());
        assert!(!Error::ResponseFormat("x".into()).is_validation());
    }
}
