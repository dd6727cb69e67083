//! Generative service error types.

use thiserror::Error;

/// Result type for generative service calls.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Errors that can occur while talking to the generative service.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No image in response")]
    NoImage,

    #[error("Service answered with text instead of an image: {0}")]
    TextInsteadOfImage(String),
}

impl GenAiError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// The service's own explanation, when it answered with text only.
    pub fn text_response(&self) -> Option<&str> {
        match self {
            GenAiError::TextInsteadOfImage(text) => Some(text),
            _ => None,
        }
    }

    /// HTTP status returned by the service, if the call got that far.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GenAiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
