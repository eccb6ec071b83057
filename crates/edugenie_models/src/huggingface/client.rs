//! HuggingFace Inference API client.

use crate::huggingface::dto::HuggingFaceEnvelope;
use crate::huggingface::{
    HuggingFaceParameters, HuggingFaceRequest, image_prompt, strip_instruction, wrap_instruction,
};
use crate::prompts;
use crate::repair::{parse_flashcards, parse_quiz};
use crate::{Endpoint, GenerateTransport};
use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use edugenie_core::{
    ChatMessage, Flashcard, GenerationRequest, ImageReference, QuizQuestion, StreamHandler,
};
use edugenie_error::{BackendError, BackendErrorKind, BackendResult, EduGenieResult, truncate_excerpt};
use edugenie_interface::{ImageBackend, StudyBackend};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, instrument, warn};

const MAX_NEW_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

/// Connection settings for the hosted inference API.
#[derive(Clone, PartialEq, Eq, Getters, Builder)]
#[builder(setter(into))]
pub struct HuggingFaceSettings {
    /// API base URL
    #[builder(default = "String::from(\"https://api-inference.huggingface.co\")")]
    base_url: String,
    /// API key; text and image calls need one
    #[builder(default)]
    api_key: Option<String>,
    /// Instruct model used for text capabilities
    #[builder(default = "String::from(\"mistralai/Mistral-7B-Instruct-v0.2\")")]
    text_model: String,
    /// Image generation model
    #[builder(default = "String::from(\"stabilityai/stable-diffusion-xl-base-1.0\")")]
    image_model: String,
}

impl HuggingFaceSettings {
    /// Creates a new builder for `HuggingFaceSettings`.
    pub fn builder() -> HuggingFaceSettingsBuilder {
        HuggingFaceSettingsBuilder::default()
    }
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            api_key: None,
            text_model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            image_model: "stabilityai/stable-diffusion-xl-base-1.0".to_string(),
        }
    }
}

impl std::fmt::Debug for HuggingFaceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// Client for the hosted inference API.
///
/// The API has no system-instruction field and no schema-constrained output,
/// so prompts are wrapped in instruct delimiters and structured results are
/// recovered with the [`repair`](crate::repair) parser. Image generation is
/// best-effort and reports every failure as `None`.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    transport: GenerateTransport,
    settings: HuggingFaceSettings,
}

impl HuggingFaceClient {
    /// Creates a client over an existing transport.
    #[instrument(skip_all, fields(url = %settings.base_url(), text_model = %settings.text_model()))]
    pub fn new(settings: HuggingFaceSettings, transport: GenerateTransport) -> Self {
        if settings.api_key.is_none() {
            warn!("HuggingFace API key not configured; hosted calls will be skipped");
        }
        Self {
            transport,
            settings,
        }
    }

    /// The settings this client was created with.
    pub fn settings(&self) -> &HuggingFaceSettings {
        &self.settings
    }

    fn endpoint(&self, model: &str) -> Option<Endpoint> {
        let key = self.settings.api_key.as_deref()?;
        let url = format!(
            "{}/models/{}",
            self.settings.base_url.trim_end_matches('/'),
            model
        );
        Some(Endpoint::new(url).with_bearer(key))
    }

    /// Generates text for a request's system instruction and prompt.
    ///
    /// Sampling is fixed for the hosted model; the request's own sampling
    /// options and output format are not forwarded.
    ///
    /// # Errors
    ///
    /// [`BackendErrorKind::MissingApiKey`] without a key,
    /// [`BackendErrorKind::EmptyResponse`] when nothing remains after the
    /// echoed prompt is stripped, and any transport error.
    #[instrument(skip(self, request), fields(model = %self.settings.text_model))]
    pub async fn generate_text(&self, request: &GenerationRequest) -> BackendResult<String> {
        let endpoint = self
            .endpoint(&self.settings.text_model)
            .ok_or_else(|| BackendError::new(BackendErrorKind::MissingApiKey))?;

        let parameters = HuggingFaceParameters::builder()
            .max_new_tokens(Some(MAX_NEW_TOKENS))
            .temperature(Some(TEMPERATURE))
            .build()
            .map_err(|e| BackendError::new(BackendErrorKind::Request(e.to_string())))?;
        let body = HuggingFaceRequest::builder()
            .inputs(wrap_instruction(request.system().as_deref(), request.prompt()))
            .parameters(Some(parameters))
            .build()
            .map_err(|e| BackendError::new(BackendErrorKind::Request(e.to_string())))?;

        let raw = self
            .transport
            .call::<_, HuggingFaceEnvelope>(&endpoint, &body)
            .await?;

        let text = strip_instruction(&raw);
        if text.is_empty() {
            warn!("Hosted response was only the echoed prompt");
            return Err(BackendError::new(BackendErrorKind::EmptyResponse));
        }
        debug!(length = text.len(), "Received hosted text");
        Ok(text.to_string())
    }

    /// Generates text and hands it to the stream handler as one fragment.
    async fn respond(
        &self,
        request: &GenerationRequest,
        stream: Option<StreamHandler<'_>>,
    ) -> BackendResult<String> {
        let text = self.generate_text(request).await?;
        if let Some(mut handler) = stream {
            if handler.is_cancelled() {
                return Err(BackendError::new(BackendErrorKind::Cancelled));
            }
            handler.emit(&text);
        }
        Ok(text)
    }

    async fn fetch_image(&self, endpoint: &Endpoint, prompt: &str) -> BackendResult<Option<ImageReference>> {
        let body = HuggingFaceRequest::builder()
            .inputs(image_prompt(prompt))
            .build()
            .map_err(|e| BackendError::new(BackendErrorKind::Request(e.to_string())))?;

        let response = self.transport.send(endpoint, &body).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.starts_with("image/") {
            let body = response.text().await.unwrap_or_default();
            warn!(
                content_type = %content_type,
                body = %truncate_excerpt(&body),
                "Image generation returned non-image response"
            );
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|e| {
            BackendError::new(BackendErrorKind::Request(format!(
                "Failed to read image body: {}",
                e
            )))
        })?;
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        debug!(mime, bytes = bytes.len(), "Received image");
        Ok(Some(ImageReference::from_bytes(mime, &bytes)))
    }
}

#[async_trait]
impl ImageBackend for HuggingFaceClient {
    #[instrument(skip(self), fields(model = %self.settings.image_model))]
    async fn generate_image(&self, prompt: &str) -> Option<ImageReference> {
        let Some(endpoint) = self.endpoint(&self.settings.image_model) else {
            warn!("HuggingFace API key not found; images will not be generated");
            return None;
        };

        match self.fetch_image(&endpoint, prompt).await {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Image generation failed");
                None
            }
        }
    }

    #[instrument(skip(self, prompts), fields(count = prompts.len()))]
    async fn batch_generate_images(&self, prompts: &[String]) -> Vec<Option<ImageReference>> {
        let images =
            futures::future::join_all(prompts.iter().map(|p| self.generate_image(p))).await;
        info!(
            requested = prompts.len(),
            generated = images.iter().filter(|i| i.is_some()).count(),
            "Batch image generation complete"
        );
        images
    }
}

#[async_trait]
impl StudyBackend for HuggingFaceClient {
    fn name(&self) -> &str {
        "huggingface"
    }

    #[instrument(skip(self, history, stream), fields(turns = history.len()))]
    async fn explain(
        &self,
        topic: &str,
        history: &[ChatMessage],
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        let request = prompts::explain(&self.settings.text_model, topic, history)?;
        Ok(self.respond(&request, stream).await?)
    }

    #[instrument(skip(self, notes, stream), fields(length = notes.len()))]
    async fn summarize_notes(
        &self,
        notes: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        let request = prompts::summarize(&self.settings.text_model, notes)?;
        Ok(self.respond(&request, stream).await?)
    }

    #[instrument(skip(self, _image, _stream))]
    async fn summarize_image(
        &self,
        _image: &str,
        mime_type: &str,
        _stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        error!("Hosted backend cannot read images");
        Err(BackendError::new(BackendErrorKind::Unsupported(
            "image summarization".to_string(),
        ))
        .into())
    }

    #[instrument(skip(self, content))]
    async fn generate_flashcards(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<Flashcard>> {
        let request = prompts::hosted_flashcards(&self.settings.text_model, topic, content, count)?;
        let raw = self.generate_text(&request).await?;
        let cards = parse_flashcards(&raw)?;
        info!(requested = count, received = cards.len(), "Generated flashcards");

        if !include_images {
            return Ok(cards);
        }
        let subjects: Vec<String> = cards.iter().map(|c| c.front().clone()).collect();
        let images = self.batch_generate_images(&subjects).await;
        Ok(cards
            .into_iter()
            .zip(images)
            .map(|(card, image)| card.with_image(image))
            .collect())
    }

    #[instrument(skip(self, content))]
    async fn generate_quiz(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<QuizQuestion>> {
        let request = prompts::hosted_quiz(&self.settings.text_model, topic, content, count)?;
        let raw = self.generate_text(&request).await?;
        let questions = parse_quiz(&raw)?;
        info!(requested = count, received = questions.len(), "Generated quiz");

        if !include_images {
            return Ok(questions);
        }
        let subjects: Vec<String> = questions.iter().map(|q| q.question().clone()).collect();
        let images = self.batch_generate_images(&subjects).await;
        Ok(questions
            .into_iter()
            .zip(images)
            .map(|(question, image)| question.with_image(image))
            .collect())
    }

    async fn preload(&self) {
        debug!("Hosted backend has no model to preload");
    }
}
