//! Generated try-on image.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::extension_for_media_type;

/// File name stem of the downloadable result.
pub const DOWNLOAD_FILE_PREFIX: &str = "mon-style-virtuel";

/// Errors raised while decoding a generated image.
#[derive(Debug, Error)]
pub enum GeneratedImageError {
    #[error("Not a base64 data URI")]
    NotDataUri,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Image returned by the synthesis service.
///
/// Held as base64 so it can be handed to a front end as a data URI without
/// re-encoding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    /// Standard base64 payload
    pub data: String,
}

impl GeneratedImage {
    pub fn new(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Build from raw bytes.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(media_type, STANDARD.encode(bytes))
    }

    /// Build from a base64 payload, rejecting one that does not decode.
    pub fn from_base64(
        media_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, GeneratedImageError> {
        let data = data.into();
        STANDARD.decode(&data)?;
        Ok(Self::new(media_type, data))
    }

    /// Parse a `data:<media type>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, GeneratedImageError> {
        let rest = uri.strip_prefix("data:").ok_or(GeneratedImageError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(GeneratedImageError::NotDataUri)?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or(GeneratedImageError::NotDataUri)?;

        Self::from_base64(media_type, payload)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Decoded image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, GeneratedImageError> {
        Ok(STANDARD.decode(&self.data)?)
    }

    /// File extension derived from the media type.
    pub fn extension(&self) -> String {
        extension_for_media_type(&self.media_type)
    }

    /// Name offered when the user downloads the result.
    pub fn download_filename(&self) -> String {
        format!("{}.{}", DOWNLOAD_FILE_PREFIX, self.extension())
    }
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("media_type", &self.media_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_filename_uses_subtype() {
        let png = GeneratedImage::from_bytes("image/png", &[1, 2, 3]);
        assert_eq!(png.download_filename(), "mon-style-virtuel.png");

        let jpeg = GeneratedImage::from_bytes("image/jpeg", &[1, 2, 3]);
        assert_eq!(jpeg.download_filename(), "mon-style-virtuel.jpeg");

        let unknown = GeneratedImage::from_bytes("", &[1]);
        assert_eq!(unknown.download_filename(), "mon-style-virtuel.png");
    }

    #[test]
    fn test_data_uri_round_trip() {
        let image = GeneratedImage::from_bytes("image/png", b"png-bytes");
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed = GeneratedImage::from_data_uri(&uri).unwrap();
        assert_eq!(parsed, image);
        assert_eq!(parsed.bytes().unwrap(), b"png-bytes");
    }

    #[test]
    fn test_from_base64_validates_payload() {
        let image = GeneratedImage::from_base64("image/png", "cG5n").unwrap();
        assert_eq!(image.bytes().unwrap(), b"png");

        assert!(matches!(
            GeneratedImage::from_base64("image/png", "@@not base64@@"),
            Err(GeneratedImageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_from_data_uri_rejects_garbage() {
        assert!(matches!(
            GeneratedImage::from_data_uri("https://example.com/a.png"),
            Err(GeneratedImageError::NotDataUri)
        ));
        assert!(matches!(
            GeneratedImage::from_data_uri("data:image/png,plain"),
            Err(GeneratedImageError::NotDataUri)
        ));
        assert!(matches!(
            GeneratedImage::from_data_uri("data:image/png;base64,@@@"),
            Err(GeneratedImageError::InvalidBase64(_))
        ));
    }
}
