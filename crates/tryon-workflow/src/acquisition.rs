//! Image slots for the person and clothing inputs.

use std::sync::Arc;

use tryon_models::{ImageFile, ImageSummary};

use crate::preview::{PreviewHandle, PreviewRegistry};

/// One workflow input: the image file and its preview, kept in lockstep.
#[derive(Debug, Default)]
pub struct ImageSlot {
    file: Option<ImageFile>,
    preview: Option<PreviewHandle>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot content, or clear it with `None`.
    ///
    /// The previous preview is revoked before a new one is issued.
    pub fn replace(&mut self, file: Option<ImageFile>, previews: &Arc<dyn PreviewRegistry>) {
        self.clear();

        if let Some(file) = file {
            self.preview = Some(PreviewHandle::create(previews, &file));
            self.file = Some(file);
        }
    }

    /// Release the file and revoke its preview.
    pub fn clear(&mut self) {
        self.preview = None;
        self.file = None;
    }

    pub fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.url())
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none()
    }

    pub fn summary(&self) -> Option<ImageSummary> {
        let file = self.file.as_ref()?;
        let preview = self.preview.as_ref()?;
        Some(ImageSummary {
            name: file.name().to_string(),
            media_type: file.media_type().to_string(),
            size_bytes: file.len(),
            preview_url: preview.url().to_string(),
        })
    }
}
