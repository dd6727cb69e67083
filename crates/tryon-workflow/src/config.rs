//! Workflow configuration.

use std::time::Duration;

use crate::messages::GENERATING_STATUS;
use crate::status::MIN_STATUS_INTERVAL;

/// Workflow configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// How long each status line is shown while generating
    pub status_interval: Duration,
    /// Status lines cycled while generating
    pub status_messages: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_millis(2500),
            status_messages: GENERATING_STATUS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkflowConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var("TRYON_STATUS_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            Some(ms) => config.with_status_interval(Duration::from_millis(ms)),
            None => config,
        }
    }

    /// Set the status rotation interval, floored at `MIN_STATUS_INTERVAL`.
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval.max(MIN_STATUS_INTERVAL);
        self
    }
}
