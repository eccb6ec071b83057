//! Generated image references.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A reference to a generated illustration.
///
/// Hosted image generation returns raw bytes; they are carried as a
/// self-contained `data:` URL so a record can be displayed without a
/// separate blob store.
///
/// # Examples
///
/// ```
/// use edugenie_core::ImageReference;
///
/// let image = ImageReference::from_bytes("image/png", &[1, 2, 3]);
/// assert_eq!(image.as_str(), "data:image/png;base64,AQID");
/// assert_eq!(image.mime_type(), Some("image/png"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// Wraps an existing URL or data URL.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Encodes raw image bytes as a `data:` URL.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// The reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type of a `data:` URL reference.
    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
    }
}
