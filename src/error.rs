use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Maximum retries exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: Box<Error> },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Timeouts, connection and send failures, 429 and 5xx are worth another
    /// attempt. Request-builder errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => {
                !e.is_builder() && (e.is_timeout() || e.is_connect() || e.is_request() || e.is_body())
            }
            Error::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }

    /// The failure that ended the call, looking through retry exhaustion.
    pub fn root(&self) -> &Error {
        match self {
            Error::MaxRetriesExceeded { last, .. } => last.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> Error {
        Error::Status {
            status: StatusCode::from_u16(code).unwrap(),
            url: "https://api-web.nhle.com/v1/score/now".to_string(),
        }
    }

    #[test]
    fn retryable_statuses() {
        assert!(status(429).is_retryable());
        assert!(status(503).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!status(400).is_retryable());
    }

    #[test]
    fn validation_and_decode_errors_are_final() {
        assert!(!Error::validation("bad sort").is_retryable());
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!Error::from(decode).is_retryable());
    }

    #[tokio::test]
    async fn builder_errors_are_final() {
        let err = rquest::Client::new().get("not a url").build().unwrap_err();
        assert!(err.is_builder());
        assert!(!Error::from(err).is_retryable());
    }

    #[test]
    fn root_unwraps_exhaustion() {
        let err = Error::MaxRetriesExceeded {
            attempts: 4,
            last: Box::new(Error::Timeout {
                url: "u".into(),
                timeout: Duration::from_secs(10),
            }),
        };
        assert!(matches!(err.root(), Error::Timeout { .. }));
    }
}
