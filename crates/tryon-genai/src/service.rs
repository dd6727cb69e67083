//! Generative service abstraction used by the workflow.

use async_trait::async_trait;
use tryon_models::{GeneratedImage, ImageFile, ItemSelection};

use crate::error::GenAiResult;

/// The two calls the try-on workflow makes to the outside world.
///
/// Both are opaque: the workflow only sequences them and maps their
/// failures onto user-facing messages.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Detect distinguishable garments and accessories in a clothing photo.
    async fn analyze_items(&self, clothing: &ImageFile) -> GenAiResult<Vec<String>>;

    /// Composite the selected items onto the person.
    async fn synthesize(
        &self,
        person: &ImageFile,
        clothing: &ImageFile,
        selection: &ItemSelection,
    ) -> GenAiResult<GeneratedImage>;
}
