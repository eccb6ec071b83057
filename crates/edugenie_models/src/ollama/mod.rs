//! Local inference server integration (Ollama `/api/generate` protocol).

mod client;
mod conversions;
mod dto;

pub use client::{IMAGE_FALLBACK, OllamaClient, OllamaSettings, OllamaSettingsBuilder};
pub use dto::{
    OllamaGenerateRequest, OllamaGenerateRequestBuilder, OllamaGenerateResponse, OllamaOptions,
};
