//! Capabilities and the backends that can serve them.

use serde::{Deserialize, Serialize};

/// A study operation the coordinator can route to a backend.
///
/// # Examples
///
/// ```
/// use edugenie_core::Capability;
/// use std::str::FromStr;
///
/// assert_eq!(Capability::SummarizeImage.to_string(), "summarize-image");
/// assert_eq!(Capability::from_str("quiz").unwrap(), Capability::Quiz);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Capability {
    /// Conversational explanation
    Explain,
    /// Bullet-point note summary
    Summarize,
    /// Summary of a photographed page of notes
    SummarizeImage,
    /// Flashcard generation
    Flashcards,
    /// Quiz generation
    Quiz,
    /// Illustration generation
    Image,
    /// Model warm-up
    Preload,
}

impl Capability {
    /// The backend serving this capability when nothing else is configured.
    pub fn default_backend(self) -> BackendKind {
        match self {
            Capability::Image => BackendKind::Hosted,
            _ => BackendKind::Local,
        }
    }
}

/// The two backend families.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    /// Self-hosted model server on the local network
    Local,
    /// Third-party hosted inference service
    Hosted,
}

/// How lecture content reaches the summarizer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LectureMode {
    /// Transcript text
    #[default]
    Text,
    /// Recorded audio or video
    Media,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn only_image_defaults_to_hosted() {
        for capability in Capability::iter() {
            let expected = if capability == Capability::Image {
                BackendKind::Hosted
            } else {
                BackendKind::Local
            };
            assert_eq!(capability.default_backend(), expected, "{capability}");
        }
    }

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("HOSTED".parse::<BackendKind>().unwrap(), BackendKind::Hosted);
        assert_eq!("local".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert!("remote".parse::<BackendKind>().is_err());
    }
}
