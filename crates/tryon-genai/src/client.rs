//! Gemini client for item analysis and try-on synthesis.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};
use tryon_models::{GeneratedImage, ImageFile, ItemSelection};

use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};
use crate::prompts::{analysis_response_schema, build_synthesis_prompt, ANALYSIS_INSTRUCTION};
use crate::service::GenerativeService;
use crate::wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GenAiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .build()
            .map_err(|e| GenAiError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        Self::new(GenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    /// Detect the garments and accessories in a clothing photo.
    ///
    /// The reply must be a JSON array of strings; anything else is a
    /// `MalformedResponse`.
    pub async fn analyze_items(&self, image: &ImageFile) -> GenAiResult<Vec<String>> {
        info!(
            model = %self.config.analysis_model,
            media_type = %image.media_type(),
            bytes = image.len(),
            "Analyzing clothing items"
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline(image.media_type(), image.to_base64()),
                    Part::text(ANALYSIS_INSTRUCTION),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(analysis_response_schema()),
                response_modalities: None,
            }),
        };

        let response = self.generate_content(&self.config.analysis_model, &request).await?;
        let labels = parse_item_labels(&response.text())?;

        info!(count = labels.len(), "Clothing analysis returned items");
        Ok(labels)
    }

    /// Composite the selected items of the clothing photo onto the person.
    pub async fn generate_outfit(
        &self,
        person: &ImageFile,
        clothing: &ImageFile,
        selection: &ItemSelection,
    ) -> GenAiResult<GeneratedImage> {
        if selection.is_empty() {
            return Err(GenAiError::invalid_input("no item selected"));
        }

        info!(
            model = %self.config.synthesis_model,
            items = selection.len(),
            entire_item = selection.is_entire_item(),
            "Generating try-on image"
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline(person.media_type(), person.to_base64()),
                    Part::inline(clothing.media_type(), clothing.to_base64()),
                    Part::text(build_synthesis_prompt(selection)),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
            }),
        };

        let response = self.generate_content(&self.config.synthesis_model, &request).await?;
        extract_generated_image(&response)
    }

    /// Call the `generateContent` endpoint.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenAiResult<GenerateContentResponse> {
        let url = self.config.endpoint(model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| GenAiError::request_failed(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(model = %model, status = %status, "Gemini API returned an error status");
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::malformed(format!("Failed to parse Gemini response: {}", e)))?;

        debug!(
            model = %model,
            candidates = parsed.candidates.len(),
            finish_reason = ?parsed.finish_reason(),
            "Gemini response received"
        );

        Ok(parsed)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn analyze_items(&self, clothing: &ImageFile) -> GenAiResult<Vec<String>> {
        GeminiClient::analyze_items(self, clothing).await
    }

    async fn synthesize(
        &self,
        person: &ImageFile,
        clothing: &ImageFile,
        selection: &ItemSelection,
    ) -> GenAiResult<GeneratedImage> {
        self.generate_outfit(person, clothing, selection).await
    }
}

/// Strip a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Validate an analysis reply as a homogeneous array of strings.
fn parse_item_labels(text: &str) -> GenAiResult<Vec<String>> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(GenAiError::malformed("empty analysis response"));
    }

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| GenAiError::malformed(format!("analysis response is not JSON: {}", e)))?;

    let array = value
        .as_array()
        .ok_or_else(|| GenAiError::malformed("analysis response is not a JSON array"))?;

    array
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| GenAiError::malformed(format!("analysis item {} is not a string", i)))
        })
        .collect()
}

/// Pull the generated image out of a synthesis reply.
fn extract_generated_image(response: &GenerateContentResponse) -> GenAiResult<GeneratedImage> {
    if let Some(inline) = response.inline_data() {
        let image = GeneratedImage::from_base64(&inline.mime_type, &inline.data).map_err(|e| {
            error!(media_type = %inline.mime_type, error = %e, "Gemini returned an undecodable image");
            GenAiError::malformed(format!("generated image payload: {}", e))
        })?;
        info!(media_type = %image.media_type, "Try-on image generated");
        return Ok(image);
    }

    let text = response.text();
    if !text.is_empty() {
        error!(text = %text, "Gemini answered with text instead of an image");
        return Err(GenAiError::TextInsteadOfImage(text));
    }

    error!(
        candidates = response.candidates.len(),
        finish_reason = ?response.finish_reason(),
        "Gemini returned neither image nor text"
    );
    Err(GenAiError::NoImage)
}
