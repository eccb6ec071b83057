//! Inference backend adapters for EduGenie.
//!
//! - [`GenerateTransport`] issues generation requests and decodes complete or
//!   streamed (newline-delimited JSON) responses.
//! - [`OllamaClient`] speaks the local server's `/api/generate` protocol.
//! - [`HuggingFaceClient`] speaks the hosted inference API for text and images.
//! - [`repair`] turns model output that should contain a JSON array into
//!   typed study records.

mod huggingface;
mod ollama;
mod prompts;
pub mod repair;
mod transport;

pub use huggingface::{
    HuggingFaceClient, HuggingFaceParameters, HuggingFaceParametersBuilder, HuggingFaceRequest,
    HuggingFaceRequestBuilder, HuggingFaceResponse, HuggingFaceSettings,
    HuggingFaceSettingsBuilder, image_prompt, strip_instruction, wrap_instruction,
};
pub use ollama::{
    IMAGE_FALLBACK, OllamaClient, OllamaGenerateRequest, OllamaGenerateRequestBuilder,
    OllamaGenerateResponse, OllamaOptions, OllamaSettings, OllamaSettingsBuilder,
};
pub use transport::{Endpoint, GenerateTransport, NdjsonDecoder, RetryPolicy, TextEnvelope};
