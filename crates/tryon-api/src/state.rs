//! Application state.

use std::sync::Arc;

use tryon_genai::{GeminiClient, GenerativeService};
use tryon_workflow::{InMemoryPreviewRegistry, PreviewRegistry, TryOnSession, WorkflowConfig};

use crate::config::ApiConfig;

/// Route prefix under which previews are served.
pub const PREVIEW_ROUTE_PREFIX: &str = "/api/previews/";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub session: Arc<TryOnSession>,
    pub previews: Arc<InMemoryPreviewRegistry>,
}

impl AppState {
    /// Create new application state backed by Gemini.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = GeminiClient::from_env()?;
        tracing::info!(
            analysis_model = %client.config().analysis_model,
            synthesis_model = %client.config().synthesis_model,
            "Gemini client configured"
        );
        Ok(Self::with_service(config, WorkflowConfig::from_env(), Arc::new(client)))
    }

    /// Create application state over any generative service.
    pub fn with_service(
        config: ApiConfig,
        workflow: WorkflowConfig,
        service: Arc<dyn GenerativeService>,
    ) -> Self {
        let previews = Arc::new(InMemoryPreviewRegistry::new(PREVIEW_ROUTE_PREFIX));
        let registry: Arc<dyn PreviewRegistry> = previews.clone();
        let session = Arc::new(TryOnSession::new(service, registry, workflow));

        Self {
            config,
            session,
            previews,
        }
    }
}
