//! Structured workflow logging utilities.
//!
//! Provides consistent, structured logging for workflow operations with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};

/// Workflow logger for structured logging with consistent formatting.
///
/// Every event carries the session ID and the operation being run
/// (e.g. "analysis", "synthesis", "acquisition").
#[derive(Debug, Clone)]
pub struct WorkflowLogger {
    session_id: String,
    operation: String,
}

impl WorkflowLogger {
    pub fn new(session_id: &str, operation: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of an operation.
    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Workflow started: {}", message
        );
    }

    /// Log a progress update.
    pub fn log_progress(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Workflow progress: {}", message
        );
    }

    /// Log a warning.
    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Workflow warning: {}", message
        );
    }

    /// Log an error with its full technical detail.
    pub fn log_error(&self, message: &str) {
        error!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Workflow error: {}", message
        );
    }

    /// Log the completion of an operation.
    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            operation = %self.operation,
            "Workflow completed: {}", message
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Create a tracing span for this operation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "workflow",
            session_id = %self.session_id,
            operation = %self.operation
        )
    }
}
