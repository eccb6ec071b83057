//! Capability routing façade.

use crate::{CapabilityBindings, EduGenieConfig};
use edugenie_core::{
    BackendKind, Capability, ChatMessage, Flashcard, ImageReference, LectureMode, QuizQuestion,
    StreamHandler,
};
use edugenie_error::{
    BackendError, BackendErrorKind, ConfigError, ConfigErrorKind, ConfigResult, EduGenieResult,
};
use edugenie_interface::{ImageBackend, StudyBackend};
use edugenie_models::{GenerateTransport, HuggingFaceClient, OllamaClient};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Returned by [`Coordinator::summarize_lecture`] for recorded media.
pub const MEDIA_LECTURE_GUIDANCE: &str = "Media summarization isn't available with the current \
     backends. Please paste the transcript text instead to summarize it with the local or hosted \
     model.";

/// Single entry point for the study tools.
///
/// Each capability is resolved to a backend once, at construction, from the
/// [`CapabilityBindings`]. Text results never depend on image generation:
/// illustrations are attached afterwards and a failed illustration leaves
/// the record without one.
pub struct Coordinator {
    bindings: CapabilityBindings,
    explain: Arc<dyn StudyBackend>,
    summarize: Arc<dyn StudyBackend>,
    summarize_image: Arc<dyn StudyBackend>,
    flashcards: Arc<dyn StudyBackend>,
    quiz: Arc<dyn StudyBackend>,
    preload: Arc<dyn StudyBackend>,
    image: Arc<dyn ImageBackend>,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Resolves every binding against the supplied backends.
    ///
    /// # Errors
    ///
    /// [`ConfigErrorKind::InvalidValue`] when a capability is bound to a
    /// backend kind missing from `backends` (or from `images` for
    /// [`Capability::Image`]).
    pub fn new(
        bindings: CapabilityBindings,
        backends: HashMap<BackendKind, Arc<dyn StudyBackend>>,
        images: HashMap<BackendKind, Arc<dyn ImageBackend>>,
    ) -> ConfigResult<Self> {
        let text = |capability| resolve(&backends, &bindings, capability);

        let coordinator = Self {
            explain: text(Capability::Explain)?,
            summarize: text(Capability::Summarize)?,
            summarize_image: text(Capability::SummarizeImage)?,
            flashcards: text(Capability::Flashcards)?,
            quiz: text(Capability::Quiz)?,
            preload: text(Capability::Preload)?,
            image: resolve(&images, &bindings, Capability::Image)?,
            bindings,
        };

        for (capability, backend) in coordinator.bindings.iter() {
            debug!(%capability, %backend, "Capability bound");
        }
        Ok(coordinator)
    }

    /// Builds both adapters over one shared HTTP client.
    ///
    /// The local adapter serves `local` bindings; the hosted adapter serves
    /// `hosted` bindings and image generation.
    #[instrument(skip_all)]
    pub fn from_config(config: &EduGenieConfig) -> EduGenieResult<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            BackendError::new(BackendErrorKind::Request(format!(
                "Failed to create HTTP client: {}",
                e
            )))
        })?;
        let transport = GenerateTransport::new(client, *config.retry());

        let local = Arc::new(OllamaClient::new(config.ollama().clone(), transport.clone()));
        let hosted = Arc::new(HuggingFaceClient::new(
            config.huggingface().clone(),
            transport,
        ));

        let backends: HashMap<BackendKind, Arc<dyn StudyBackend>> = HashMap::from([
            (BackendKind::Local, local as Arc<dyn StudyBackend>),
            (BackendKind::Hosted, hosted.clone() as Arc<dyn StudyBackend>),
        ]);
        let images: HashMap<BackendKind, Arc<dyn ImageBackend>> =
            HashMap::from([(BackendKind::Hosted, hosted as Arc<dyn ImageBackend>)]);

        Ok(Self::new(config.bindings().clone(), backends, images)?)
    }

    /// The routing table this coordinator was built with.
    pub fn bindings(&self) -> &CapabilityBindings {
        &self.bindings
    }

    /// Explains `topic` as the next turn of a tutoring conversation.
    #[instrument(skip(self, history, stream), fields(backend = self.explain.name()))]
    pub async fn explain_concept(
        &self,
        topic: &str,
        history: &[ChatMessage],
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        self.explain.explain(topic, history, stream).await
    }

    /// Summarizes study notes into bullet points.
    #[instrument(skip(self, notes, stream), fields(backend = self.summarize.name()))]
    pub async fn summarize_notes(
        &self,
        notes: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        self.summarize.summarize_notes(notes, stream).await
    }

    /// Summarizes a photographed page of notes.
    #[instrument(skip(self, image, stream), fields(backend = self.summarize_image.name()))]
    pub async fn summarize_image(
        &self,
        image: &str,
        mime_type: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        self.summarize_image
            .summarize_image(image, mime_type, stream)
            .await
    }

    /// Warms up the backend bound to [`Capability::Preload`].
    #[instrument(skip(self), fields(backend = self.preload.name()))]
    pub async fn preload_model(&self) {
        self.preload.preload().await;
    }

    /// Generates flashcards, optionally illustrated by their front text.
    #[instrument(skip(self, content), fields(backend = self.flashcards.name()))]
    pub async fn generate_flashcards(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<Flashcard>> {
        let cards = self
            .flashcards
            .generate_flashcards(topic, content, count, false)
            .await?;
        if !include_images {
            return Ok(cards);
        }

        let prompts: Vec<String> = cards.iter().map(|c| c.front().clone()).collect();
        match self.illustrate(&prompts).await {
            Some(images) => Ok(cards
                .into_iter()
                .zip(images)
                .map(|(card, image)| card.with_image(image))
                .collect()),
            None => Ok(cards),
        }
    }

    /// Generates a quiz, optionally illustrated by each question's text.
    #[instrument(skip(self, content), fields(backend = self.quiz.name()))]
    pub async fn generate_quiz(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<QuizQuestion>> {
        let questions = self
            .quiz
            .generate_quiz(topic, content, count, false)
            .await?;
        if !include_images {
            return Ok(questions);
        }

        let prompts: Vec<String> = questions.iter().map(|q| q.question().clone()).collect();
        match self.illustrate(&prompts).await {
            Some(images) => Ok(questions
                .into_iter()
                .zip(images)
                .map(|(question, image)| question.with_image(image))
                .collect()),
            None => Ok(questions),
        }
    }

    /// Attaches an illustration to one card. A failed generation keeps the
    /// card as it was.
    #[instrument(skip_all, fields(id = %card.id()))]
    pub async fn enhance_flashcard_with_image(&self, card: Flashcard) -> Flashcard {
        match self.image.generate_image(card.front()).await {
            Some(image) => card.with_image(Some(image)),
            None => card,
        }
    }

    /// Attaches an illustration to one question. A failed generation keeps
    /// the question as it was.
    #[instrument(skip_all, fields(id = %question.id()))]
    pub async fn enhance_quiz_with_image(&self, question: QuizQuestion) -> QuizQuestion {
        match self.image.generate_image(question.question()).await {
            Some(image) => question.with_image(Some(image)),
            None => question,
        }
    }

    /// Summarizes lecture content.
    ///
    /// Recorded media is not supported by the available backends; it yields
    /// [`MEDIA_LECTURE_GUIDANCE`] without calling any backend.
    #[instrument(skip(self, content, stream))]
    pub async fn summarize_lecture(
        &self,
        content: &str,
        mode: LectureMode,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String> {
        match mode {
            LectureMode::Text => self.summarize.summarize_notes(content, stream).await,
            LectureMode::Media => {
                info!("Media lecture summary requested; returning guidance");
                Ok(MEDIA_LECTURE_GUIDANCE.to_string())
            }
        }
    }

    /// Generates a standalone illustration.
    pub async fn generate_image(&self, prompt: &str) -> Option<ImageReference> {
        self.image.generate_image(prompt).await
    }

    /// One illustration per prompt, or `None` when the batch cannot be
    /// merged positionally.
    async fn illustrate(&self, prompts: &[String]) -> Option<Vec<Option<ImageReference>>> {
        if prompts.is_empty() {
            return Some(Vec::new());
        }
        let images = self.image.batch_generate_images(prompts).await;
        if images.len() != prompts.len() {
            warn!(
                expected = prompts.len(),
                received = images.len(),
                "Image batch size mismatch; returning records without images"
            );
            return None;
        }
        let attached = images.iter().filter(|i| i.is_some()).count();
        debug!(attached, requested = prompts.len(), "Image batch complete");
        Some(images)
    }
}

fn resolve<T: ?Sized>(
    available: &HashMap<BackendKind, Arc<T>>,
    bindings: &CapabilityBindings,
    capability: Capability,
) -> ConfigResult<Arc<T>> {
    let kind = bindings.backend_for(capability);
    available.get(&kind).cloned().ok_or_else(|| {
        ConfigError::new(ConfigErrorKind::InvalidValue {
            key: format!("bindings.{}", capability.to_string().replace('-', "_")),
            message: format!(
                "{} is bound to the {} backend, which is not available",
                capability, kind
            ),
        })
    })
}
