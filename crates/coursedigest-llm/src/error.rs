use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// HTTP 429 from the provider
    #[error("Rate limited by provider: {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    /// Request never produced an HTTP response (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LlmError {
    /// Rate limiting and transport failures are worth another attempt;
    /// everything else fails the call immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. } | LlmError::Transport(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LlmError::RateLimited { retry_after: None, message: String::new() }.is_retryable());
        assert!(LlmError::Transport("reset".into()).is_retryable());
        assert!(!LlmError::Api { status: 500, message: "boom".into() }.is_retryable());
        assert!(!LlmError::MalformedResponse("no choices".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = LlmError::Api { status: 401, message: "bad key".into() };
        assert_eq!(err.to_string(), "API error (401): bad key");
    }
}
