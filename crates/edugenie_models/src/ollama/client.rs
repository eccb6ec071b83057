//! Ollama backend client.

use crate::ollama::{OllamaGenerateResponse, conversions};
use crate::prompts;
use crate::repair::{parse_flashcards, parse_quiz};
use crate::{Endpoint, GenerateTransport};
use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use edugenie_core::{ChatMessage, Flashcard, GenerationRequest, QuizQuestion, StreamHandler};
use edugenie_error::{BackendError, BackendErrorKind, BackendResult, EduGenieResult};
use edugenie_interface::StudyBackend;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

/// Returned by image summarization when the vision model call fails.
pub const IMAGE_FALLBACK: &str =
    "Failed to process the image. Make sure you have a vision model like 'llava' installed in Ollama.";

static DATA_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/[a-z]+;base64,").expect("data url prefix regex is valid")
});

/// Connection settings for a local inference server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Builder)]
#[builder(setter(into))]
pub struct OllamaSettings {
    /// Server base URL
    #[builder(default = "String::from(\"http://localhost:11434\")")]
    base_url: String,
    /// Text model identifier
    #[builder(default = "String::from(\"llama3.2\")")]
    model: String,
    /// Vision model identifier
    #[builder(default = "String::from(\"llava\")")]
    vision_model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            vision_model: "llava".to_string(),
        }
    }
}

impl OllamaSettings {
    /// Creates a new builder for `OllamaSettings`.
    pub fn builder() -> OllamaSettingsBuilder {
        OllamaSettingsBuilder::default()
    }
}

/// Client for a local server speaking the Ollama generate protocol.
///
/// Text capabilities run on the configured model, image summaries on the
/// separate vision model. Structured output is requested with a JSON schema
/// and recovered with the [`repair`](crate::repair) parser.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    transport: GenerateTransport,
    settings: OllamaSettings,
}

impl OllamaClient {
    /// Creates a client over an existing transport.
    #[instrument(skip(transport), fields(url = %settings.base_url(), model = %settings.model()))]
    pub fn new(settings: OllamaSettings, transport: GenerateTransport) -> Self {
        debug!("Created Ollama client");
        Self {
            transport,
            settings,
        }
    }

    /// The settings this client was created with.
    pub fn settings(&self) -> &OllamaSettings {
        &self.settings
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(format!(
            "{}/api/generate",
            self.settings.base_url.trim_end_matches('/')
        ))
    }

    /// Runs one generation request, streaming when a handler is supplied.
    ///
    /// # Errors
    ///
    /// Transport errors, with a 404 reported as
    /// [`BackendErrorKind::ModelNotFound`].
    #[instrument(skip(self, request, stream), fields(model = %request.model(), streaming = stream.is_some()))]
    pub async fn generate(
        &self,
        request: GenerationRequest,
        stream: Option<StreamHandler<'_>>,
    ) -> BackendResult<String> {
        let model = request.model().clone();
        let endpoint = self.endpoint();

        let result = match stream {
            Some(handler) => {
                let body = conversions::to_generate_request(&request.streaming(true))?;
                self.transport
                    .stream::<_, OllamaGenerateResponse>(&endpoint, &body, handler)
                    .await
            }
            None => {
                let body = conversions::to_generate_request(&request.streaming(false))?;
                self.transport
                    .call::<_, OllamaGenerateResponse>(&endpoint, &body)
                    .await
            }
        };

        result.map_err(|e| match e.status() {
            Some(404) => {
                warn!(model = %model, "Model not installed");
                BackendError::new(BackendErrorKind::ModelNotFound {
                    hint: format!("Please install it with: ollama pull {}", model),
                    model,
                })
            }
            _ => e,
        })
    }

    async fn read_image(&self, image: &str, stream: Option<StreamHandler<'_>>) -> BackendResult<String> {
        let payload = DATA_URL_PREFIX.replace(image, "");
        let request = prompts::summarize_image(&self.settings.vision_model, &payload)?;
        self.generate(request, stream).await
    }

    async fn warm_up(&self) -> BackendResult<()> {
        let request = prompts::preload(&self.settings.model)?;
        let body = conversions::to_generate_request(&request)?;
        self.transport.send(&self.endpoint(), &body).await?;
        Ok(())
    }
}

#[async_trait]
impl StudyBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, history, stream), fields(turns = history.len()))]
    async fn explain(
        &self,
        topic: &str,
        history: &[ChatMessage],
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        let request = prompts::explain(&self.settings.model, topic, history)?;
        Ok(self.generate(request, stream).await?)
    }

    #[instrument(skip(self, notes, stream), fields(length = notes.len()))]
    async fn summarize_notes(
        &self,
        notes: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        let request = prompts::summarize(&self.settings.model, notes)?;
        Ok(self.generate(request, stream).await?)
    }

    #[instrument(skip(self, image, mime_type, stream), fields(vision_model = %self.settings.vision_model))]
    async fn summarize_image(
        &self,
        image: &str,
        mime_type: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        debug!(mime_type, bytes = image.len(), "Summarizing image");
        match self.read_image(image, stream).await {
            Ok(text) => Ok(text),
            Err(e) if matches!(e.kind, BackendErrorKind::Cancelled) => Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Image summary failed, returning fallback");
                Ok(IMAGE_FALLBACK.to_string())
            }
        }
    }

    #[instrument(skip(self, content))]
    async fn generate_flashcards(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<Flashcard>> {
        if include_images {
            debug!("Local backend has no image generation; images are attached by the coordinator");
        }
        let request = prompts::flashcards(&self.settings.model, topic, content, count)?;
        let raw = self.generate(request, None).await?;
        let cards = parse_flashcards(&raw)?;
        info!(requested = count, received = cards.len(), "Generated flashcards");
        Ok(cards)
    }

    #[instrument(skip(self, content))]
    async fn generate_quiz(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<QuizQuestion>> {
        if include_images {
            debug!("Local backend has no image generation; images are attached by the coordinator");
        }
        let request = prompts::quiz(&self.settings.model, topic, content, count)?;
        let raw = self.generate(request, None).await?;
        let questions = parse_quiz(&raw)?;
        info!(requested = count, received = questions.len(), "Generated quiz");
        Ok(questions)
    }

    #[instrument(skip(self), fields(model = %self.settings.model))]
    async fn preload(&self) {
        match self.warm_up().await {
            Ok(()) => info!("Model preloaded"),
            Err(e) => warn!(error = %e, "Failed to preload model (ignorable)"),
        }
    }
}
