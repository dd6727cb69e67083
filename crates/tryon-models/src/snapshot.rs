//! Read-only view of the workflow state.

use serde::{Deserialize, Serialize};

use crate::step::WorkflowStep;

/// Summary of an occupied image slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub name: String,
    pub media_type: String,
    pub size_bytes: usize,
    /// Preview handle URL, valid until the slot changes
    pub preview_url: String,
}

/// Summary of the generated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub media_type: String,
    pub download_filename: String,
}

/// Snapshot of everything a front end needs to render the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowSnapshot {
    pub step: WorkflowStep,
    pub person: Option<ImageSummary>,
    pub clothing: Option<ImageSummary>,
    pub detected_items: Vec<String>,
    pub selected_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Rotating status text, present while generating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSummary>,
}

impl WorkflowSnapshot {
    /// Check the analyze trigger would be accepted.
    pub fn can_analyze(&self) -> bool {
        self.step == WorkflowStep::Idle && self.clothing.is_some()
    }

    /// Check the confirm trigger would be accepted.
    pub fn can_confirm(&self) -> bool {
        self.step == WorkflowStep::Selecting && !self.selected_items.is_empty()
    }
}
