//! Source image models.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Which of the two workflow inputs an image fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    /// Photo of the person wearing the result
    Person,
    /// Photo of the garment or accessory
    Clothing,
}

impl ImageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::Person => "person",
            ImageRole::Clothing => "clothing",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "person" => Ok(ImageRole::Person),
            "clothing" => Ok(ImageRole::Clothing),
            other => Err(format!("unknown image role: {}", other)),
        }
    }
}

/// How an image was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// File picker
    #[default]
    File,
    /// Drag and drop
    Drop,
    /// Live camera capture
    Camera,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::File => "file",
            ImageSource::Drop => "drop",
            ImageSource::Camera => "camera",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in-memory image file handle.
///
/// Cloning is cheap: the bytes are shared, so a request in flight keeps its
/// own reference even if the slot it came from is replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check the declared media type is an `image/*` type.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }

    /// Standard base64 encoding of the bytes, as sent inline to the service.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Check whether a media type names an image (`image/<subtype>`).
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .and_then(|essence| essence.trim().split_once('/'))
        .map(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
        .unwrap_or(false)
}

/// File extension for a media type: its subtype, or `png` when there is none.
pub fn extension_for_media_type(media_type: &str) -> String {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((_, subtype)) if !subtype.is_empty() => subtype.to_lowercase(),
        _ => "png".to_string(),
    }
}
