//! Backend capability traits.

use async_trait::async_trait;
use edugenie_core::{ChatMessage, Flashcard, ImageReference, QuizQuestion, StreamHandler};
use edugenie_error::EduGenieResult;

/// Text capabilities served by a generation backend.
///
/// Every text operation accepts an optional [`StreamHandler`]; when one is
/// supplied, fragments are delivered as they are generated and the returned
/// string is their concatenation.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Answers `topic` as the next turn of a tutoring conversation.
    async fn explain(
        &self,
        topic: &str,
        history: &[ChatMessage],
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String>;

    /// Summarizes study notes into bullet points.
    async fn summarize_notes(
        &self,
        notes: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String>;

    /// Summarizes a photographed page of notes.
    ///
    /// `image` may carry a `data:` URL prefix; adapters strip it before sending.
    async fn summarize_image(
        &self,
        image: &str,
        mime_type: &str,
        stream: Option<StreamHandler<'_>>,
    ) -> EduGenieResult<String>;

    /// Generates `count` flashcards about `topic`, grounded in `content`.
    ///
    /// `include_images` is accepted for symmetry; illustrations are attached
    /// by an [`ImageBackend`], not here.
    async fn generate_flashcards(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<Flashcard>>;

    /// Generates `count` multiple choice questions about `topic`.
    async fn generate_quiz(
        &self,
        topic: &str,
        content: &str,
        count: usize,
        include_images: bool,
    ) -> EduGenieResult<Vec<QuizQuestion>>;

    /// Warms the backend up. Never fails; problems are logged.
    async fn preload(&self);
}

/// Best-effort illustration generation.
///
/// Failures are reported as `None`, never as errors.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generates one illustration for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Option<ImageReference>;

    /// Generates one illustration per prompt concurrently.
    ///
    /// The result has one entry per prompt, in input order; a failed prompt
    /// yields `None` without affecting the others.
    async fn batch_generate_images(&self, prompts: &[String]) -> Vec<Option<ImageReference>>;
}
