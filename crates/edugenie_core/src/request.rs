//! Backend-neutral generation requests.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How the model is asked to shape its output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Free text.
    #[default]
    Text,
    /// A JSON array whose items match the given JSON schema.
    JsonArray(serde_json::Value),
}

/// Sampling parameters; unset values defer to the backend default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct SamplingOptions {
    /// Sampling temperature
    temperature: Option<f32>,
    /// Nucleus sampling threshold
    top_p: Option<f32>,
    /// Top-k sampling cutoff
    top_k: Option<u32>,
}

impl SamplingOptions {
    /// Options with only a temperature set.
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }

    /// Creates a builder for `SamplingOptions`.
    pub fn builder() -> SamplingOptionsBuilder {
        SamplingOptionsBuilder::default()
    }
}

/// A single call to a generation backend.
///
/// Constructed fresh per call and never persisted.
///
/// # Examples
///
/// ```
/// use edugenie_core::{GenerationRequest, OutputFormat, SamplingOptions};
///
/// let request = GenerationRequest::builder()
///     .model("llama3.2")
///     .prompt("Explain osmosis")
///     .system(Some("You are a tutor.".to_string()))
///     .sampling(SamplingOptions::with_temperature(0.8))
///     .build()
///     .expect("valid request");
///
/// assert_eq!(request.model(), "llama3.2");
/// assert_eq!(*request.format(), OutputFormat::Text);
/// assert!(request.images().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Model identifier
    model: String,
    /// Prompt text
    prompt: String,
    /// Optional system instruction
    #[builder(default)]
    system: Option<String>,
    /// Output-format constraint
    #[builder(default)]
    format: OutputFormat,
    /// Sampling parameters
    #[builder(default)]
    sampling: SamplingOptions,
    /// Inline base64 image payloads (no data-URL prefix)
    #[builder(default)]
    images: Vec<String>,
    /// Whether the response should be streamed
    #[builder(default)]
    stream: bool,
}

impl GenerationRequest {
    /// Creates a builder for `GenerationRequest`.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Returns the same request with the streaming flag replaced.
    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}
