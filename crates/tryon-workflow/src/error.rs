//! Workflow error types.

use thiserror::Error;
use tryon_genai::GenAiError;
use tryon_models::WorkflowStep;

use crate::camera::CameraError;
use crate::messages;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Input that must be present before a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// No clothing image to analyze
    ClothingImage,
    /// Person or clothing image gone before synthesis
    SourceImages,
    /// No item selected
    Selection,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MissingInput::ClothingImage => "clothing image",
            MissingInput::SourceImages => "source images",
            MissingInput::Selection => "item selection",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Missing input: {0}")]
    MissingInput(MissingInput),

    #[error("Item analysis failed: {0}")]
    AnalysisFailure(#[source] GenAiError),

    #[error("Image synthesis failed: {0}")]
    SynthesisFailure(#[source] GenAiError),

    #[error("Service answered with text instead of an image: {0}")]
    SynthesisTextResponse(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(#[from] CameraError),

    #[error("Cannot {action} while {step}")]
    InvalidTransition { step: WorkflowStep, action: &'static str },

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),
}

impl WorkflowError {
    pub fn invalid_transition(step: WorkflowStep, action: &'static str) -> Self {
        Self::InvalidTransition { step, action }
    }

    /// Map a synthesis failure, keeping text-only replies distinct.
    pub fn from_synthesis(err: GenAiError) -> Self {
        match err {
            GenAiError::TextInsteadOfImage(text) => Self::SynthesisTextResponse(text),
            other => Self::SynthesisFailure(other),
        }
    }

    /// Short localized message shown to the user.
    ///
    /// Technical details stay in the logs; only text-only synthesis replies
    /// are surfaced verbatim.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::MissingInput(MissingInput::ClothingImage) => messages::MISSING_CLOTHING_IMAGE.to_string(),
            WorkflowError::MissingInput(MissingInput::SourceImages) => messages::MISSING_SOURCE_IMAGES.to_string(),
            WorkflowError::MissingInput(MissingInput::Selection) => messages::EMPTY_SELECTION.to_string(),
            WorkflowError::AnalysisFailure(_) => messages::ANALYSIS_FAILED.to_string(),
            WorkflowError::SynthesisFailure(GenAiError::NoImage) => messages::NO_IMAGE_RETURNED.to_string(),
            WorkflowError::SynthesisFailure(_) => messages::SYNTHESIS_FAILED.to_string(),
            WorkflowError::SynthesisTextResponse(text) => messages::text_instead_of_image(text),
            WorkflowError::CameraUnavailable(_) => messages::CAMERA_UNAVAILABLE.to_string(),
            WorkflowError::InvalidTransition { .. } => messages::ACTION_UNAVAILABLE.to_string(),
            WorkflowError::UnknownItem(label) => messages::unknown_item(label),
            WorkflowError::UnsupportedImage(_) => messages::NOT_AN_IMAGE.to_string(),
        }
    }

    /// Check if the error was raised by validation before any request.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, WorkflowError::MissingInput(_))
    }

    /// Check if the error came from the generative service.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            WorkflowError::AnalysisFailure(_)
                | WorkflowError::SynthesisFailure(_)
                | WorkflowError::SynthesisTextResponse(_)
        )
    }
}
