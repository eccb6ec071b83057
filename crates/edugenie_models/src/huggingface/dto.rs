//! HuggingFace Inference API data transfer objects.

use crate::TextEnvelope;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Body of a text or image inference request.
#[derive(Debug, Clone, Serialize, Getters, Builder)]
#[builder(setter(into))]
pub struct HuggingFaceRequest {
    /// Input text
    inputs: String,
    /// Optional parameters
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<HuggingFaceParameters>,
}

impl HuggingFaceRequest {
    /// Creates a new builder for `HuggingFaceRequest`.
    pub fn builder() -> HuggingFaceRequestBuilder {
        HuggingFaceRequestBuilder::default()
    }
}

/// HuggingFace generation parameters.
#[derive(Debug, Clone, Getters, Builder, Serialize)]
#[builder(setter(into))]
pub struct HuggingFaceParameters {
    /// Maximum new tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    /// Temperature for sampling
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

impl HuggingFaceParameters {
    /// Creates a new builder for `HuggingFaceParameters`.
    pub fn builder() -> HuggingFaceParametersBuilder {
        HuggingFaceParametersBuilder::default()
    }
}

/// One text generation result.
#[derive(Debug, Clone, Default, Getters, Deserialize)]
pub struct HuggingFaceResponse {
    /// Generated text, including the echoed prompt for instruct models
    #[serde(default)]
    generated_text: Option<String>,
}

/// Text generation body: models answer with either a list or a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum HuggingFaceEnvelope {
    Many(Vec<HuggingFaceResponse>),
    One(HuggingFaceResponse),
}

impl TextEnvelope for HuggingFaceEnvelope {
    fn text(&self) -> Option<&str> {
        match self {
            HuggingFaceEnvelope::Many(responses) => responses
                .first()
                .and_then(|r| r.generated_text.as_deref()),
            HuggingFaceEnvelope::One(response) => response.generated_text.as_deref(),
        }
    }
}
