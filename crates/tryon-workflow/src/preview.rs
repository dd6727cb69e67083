//! Revocable preview handles for acquired images.
//!
//! A preview URL is a resource owned by whoever displays the image. The
//! registry issues URLs and forgets them on revoke; `PreviewHandle` ties the
//! revoke to `Drop`, so a slot can never leak its previous preview.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};
use tryon_models::ImageFile;
use uuid::Uuid;

/// Issues and revokes preview URLs.
pub trait PreviewRegistry: Send + Sync {
    /// Register an image and return its preview URL.
    fn create(&self, image: &ImageFile) -> String;

    /// Release a preview URL. Later lookups of the URL fail.
    fn revoke(&self, url: &str);
}

/// Owned preview URL, revoked exactly once when dropped.
pub struct PreviewHandle {
    url: String,
    registry: Arc<dyn PreviewRegistry>,
}

impl PreviewHandle {
    pub fn create(registry: &Arc<dyn PreviewRegistry>, image: &ImageFile) -> Self {
        let url = registry.create(image);
        Self {
            url,
            registry: Arc::clone(registry),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// Preview registry that keeps images in memory and serves them back by URL.
pub struct InMemoryPreviewRegistry {
    prefix: String,
    entries: Mutex<HashMap<String, ImageFile>>,
    created: AtomicU64,
    revoked: AtomicU64,
}

impl InMemoryPreviewRegistry {
    /// Create a registry issuing URLs of the form `<prefix><uuid>`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Mutex::new(HashMap::new()),
            created: AtomicU64::new(0),
            revoked: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up a live preview by full URL.
    pub fn get(&self, url: &str) -> Option<ImageFile> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Look up a live preview by the ID part of its URL.
    pub fn get_by_id(&self, id: &str) -> Option<ImageFile> {
        self.get(&format!("{}{}", self.prefix, id))
    }

    /// Number of previews issued and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn revoked_count(&self) -> u64 {
        self.revoked.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryPreviewRegistry {
    fn default() -> Self {
        Self::new("blob:tryon/")
    }
}

impl PreviewRegistry for InMemoryPreviewRegistry {
    fn create(&self, image: &ImageFile) -> String {
        let url = format!("{}{}", self.prefix, Uuid::new_v4());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone(), image.clone());
        self.created.fetch_add(1, Ordering::Relaxed);
        debug!(url = %url, name = %image.name(), "Preview created");
        url
    }

    fn revoke(&self, url: &str) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);

        if removed.is_some() {
            self.revoked.fetch_add(1, Ordering::Relaxed);
            debug!(url = %url, "Preview revoked");
        } else {
            warn!(url = %url, "Revoke of unknown preview");
        }
    }
}
