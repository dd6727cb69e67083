//! Workflow step model.

use serde::{Deserialize, Serialize};

/// The single active stage of the try-on pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    /// Waiting for images and the analyze trigger
    #[default]
    Idle,
    /// Clothing image is being analyzed
    Analyzing,
    /// User is choosing which detected items to apply
    Selecting,
    /// Try-on image is being synthesized
    Generating,
    /// A generated image is available
    Finished,
    /// The last request failed
    Error,
}

impl WorkflowStep {
    /// Get string representation of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Idle => "idle",
            WorkflowStep::Analyzing => "analyzing",
            WorkflowStep::Selecting => "selecting",
            WorkflowStep::Generating => "generating",
            WorkflowStep::Finished => "finished",
            WorkflowStep::Error => "error",
        }
    }

    /// Check if a request to the generative service is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowStep::Analyzing | WorkflowStep::Generating)
    }

    /// Check if the regenerate trigger is available from this step.
    pub fn can_regenerate(&self) -> bool {
        matches!(self, WorkflowStep::Finished | WorkflowStep::Error)
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
