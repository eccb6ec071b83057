//! Conversions from backend-neutral requests to the Ollama wire format.

use crate::ollama::{OllamaGenerateRequest, OllamaOptions};
use edugenie_core::{GenerationRequest, OutputFormat};
use edugenie_error::{BackendError, BackendErrorKind, BackendResult};

/// Converts a [`GenerationRequest`] into a generate endpoint body.
pub fn to_generate_request(req: &GenerationRequest) -> BackendResult<OllamaGenerateRequest> {
    let mut builder = OllamaGenerateRequest::builder();
    builder
        .model(req.model().clone())
        .prompt(req.prompt().clone())
        .stream(*req.stream())
        .system(req.system().clone())
        .images(req.images().clone());

    if let OutputFormat::JsonArray(schema) = req.format() {
        builder.format(Some(schema.clone()));
    }

    let sampling = req.sampling();
    let options = OllamaOptions::new(*sampling.temperature(), *sampling.top_p(), *sampling.top_k());
    if !options.is_empty() {
        builder.options(Some(options));
    }

    builder.build().map_err(|e| {
        BackendError::new(BackendErrorKind::Request(format!(
            "Failed to build request: {}",
            e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edugenie_core::SamplingOptions;
    use serde_json::json;

    #[test]
    fn plain_request_omits_optional_fields() {
        let req = GenerationRequest::builder()
            .model("llama3.2")
            .prompt("")
            .build()
            .unwrap();
        let body = serde_json::to_value(to_generate_request(&req).unwrap()).unwrap();
        assert_eq!(body, json!({"model": "llama3.2", "prompt": "", "stream": false}));
    }

    #[test]
    fn schema_sampling_and_images_are_forwarded() {
        let schema = json!({"type": "array"});
        let req = GenerationRequest::builder()
            .model("llava")
            .prompt("read this")
            .system(Some("sys".to_string()))
            .format(OutputFormat::JsonArray(schema.clone()))
            .sampling(SamplingOptions::with_temperature(0.3))
            .images(vec!["AAAA".to_string()])
            .stream(true)
            .build()
            .unwrap();
        let body = serde_json::to_value(to_generate_request(&req).unwrap()).unwrap();
        assert_eq!(body["format"], schema);
        let options = body["options"].as_object().unwrap();
        assert_eq!(options.len(), 1);
        assert!((options["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(body["images"], json!(["AAAA"]));
        assert_eq!(body["system"], "sys");
        assert_eq!(body["stream"], true);
    }
}
