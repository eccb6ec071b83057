//! HuggingFace Inference API integration.

mod client;
mod dto;
mod template;

pub use client::{HuggingFaceClient, HuggingFaceSettings, HuggingFaceSettingsBuilder};
pub use dto::{
    HuggingFaceParameters, HuggingFaceParametersBuilder, HuggingFaceRequest,
    HuggingFaceRequestBuilder, HuggingFaceResponse,
};
pub use template::{image_prompt, strip_instruction, wrap_instruction};
