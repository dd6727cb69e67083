//! Generative service configuration.

use crate::error::{GenAiError, GenAiResult};

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for clothing item analysis.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Model used for try-on image synthesis.
pub const DEFAULT_SYNTHESIS_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Generative service configuration.
#[derive(Clone)]
pub struct GenAiConfig {
    /// API key for the generative service
    pub api_key: String,
    /// Base URL of the REST API (no trailing path)
    pub base_url: String,
    /// Model for item analysis
    pub analysis_model: String,
    /// Model for image synthesis
    pub synthesis_model: String,
}

impl GenAiConfig {
    /// Create config with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            synthesis_model: DEFAULT_SYNTHESIS_MODEL.to_string(),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is read first, `API_KEY` as a fallback.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| GenAiError::config_error("GEMINI_API_KEY not set"))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            analysis_model: std::env::var("GEMINI_ANALYSIS_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANALYSIS_MODEL.to_string()),
            synthesis_model: std::env::var("GEMINI_SYNTHESIS_MODEL")
                .unwrap_or_else(|_| DEFAULT_SYNTHESIS_MODEL.to_string()),
        })
    }

    /// Check the config is usable.
    pub fn validate(&self) -> GenAiResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(GenAiError::config_error("API key is empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(GenAiError::config_error("base URL is empty"));
        }
        Ok(())
    }

    /// `generateContent` endpoint for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("analysis_model", &self.analysis_model)
            .field("synthesis_model", &self.synthesis_model)
            .finish()
    }
}
