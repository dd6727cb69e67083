//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tryon_workflow::WorkflowError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Workflow(e) => match e {
                WorkflowError::MissingInput(_)
                | WorkflowError::UnsupportedImage(_)
                | WorkflowError::UnknownItem(_) => StatusCode::BAD_REQUEST,
                WorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
                WorkflowError::CameraUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                WorkflowError::AnalysisFailure(_)
                | WorkflowError::SynthesisFailure(_)
                | WorkflowError::SynthesisTextResponse(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Workflow(e) => Some(match e {
                WorkflowError::MissingInput(_) => "missing_input",
                WorkflowError::UnsupportedImage(_) => "unsupported_image",
                WorkflowError::UnknownItem(_) => "unknown_item",
                WorkflowError::InvalidTransition { .. } => "invalid_transition",
                WorkflowError::CameraUnavailable(_) => "camera_unavailable",
                WorkflowError::AnalysisFailure(_) => "analysis_failure",
                WorkflowError::SynthesisFailure(_) => "synthesis_failure",
                WorkflowError::SynthesisTextResponse(_) => "synthesis_text_response",
            }),
            _ => None,
        }
    }
}

fn is_production() -> bool {
    std::env::var("ENVIRONMENT").is_ok_and(|v| v.eq_ignore_ascii_case("production"))
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Workflow errors carry their own localized message
        let detail = match &self {
            ApiError::Workflow(e) => e.user_message(),
            // Don't expose internal error details in production
            ApiError::Internal(_) if is_production() => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}
