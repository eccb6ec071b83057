//! Ollama generate endpoint data transfer objects.

use crate::TextEnvelope;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Getters, Builder)]
#[builder(setter(into))]
pub struct OllamaGenerateRequest {
    /// Model identifier
    model: String,
    /// Prompt text
    prompt: String,
    /// Stream newline-delimited fragments instead of one object
    #[builder(default)]
    stream: bool,
    /// JSON schema the output must match
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    /// Sampling options
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    /// System instruction
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Base64 images for vision models
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

impl OllamaGenerateRequest {
    /// Creates a new builder for `OllamaGenerateRequest`.
    pub fn builder() -> OllamaGenerateRequestBuilder {
        OllamaGenerateRequestBuilder::default()
    }
}

/// Sampling options accepted by the generate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Getters)]
pub struct OllamaOptions {
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Top-k sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

impl OllamaOptions {
    /// Creates options from individual sampling values.
    pub fn new(temperature: Option<f32>, top_p: Option<f32>, top_k: Option<u32>) -> Self {
        Self {
            temperature,
            top_p,
            top_k,
        }
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.top_k.is_none()
    }
}

/// One generate response object, or one line of a streamed response.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct OllamaGenerateResponse {
    /// Model that produced the text
    #[serde(default)]
    model: Option<String>,
    /// Generated text or fragment
    #[serde(default)]
    response: Option<String>,
    /// Set on the final object
    #[serde(default)]
    done: bool,
    /// In-band failure, e.g. a crashed model runner
    #[serde(default)]
    error: Option<String>,
}

impl TextEnvelope for OllamaGenerateResponse {
    fn text(&self) -> Option<&str> {
        self.response.as_deref()
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
