//! Study records produced by the generation pipeline.

use crate::ImageReference;
use serde::{Deserialize, Serialize};

/// A two-sided flashcard.
///
/// Created in batches by the generation pipeline; the only mutation after
/// creation is attaching an illustration.
///
/// # Examples
///
/// ```
/// use edugenie_core::{Flashcard, ImageReference};
///
/// let card = Flashcard::new("card-1", "What is ATP?", "The cell's energy currency");
/// assert!(card.image().is_none());
///
/// let card = card.with_image(Some(ImageReference::new("data:image/png;base64,AA==")));
/// assert!(card.image().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    /// Unique id minted at creation
    id: String,
    /// Prompt side
    front: String,
    /// Answer side
    back: String,
    /// Optional illustration
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    image: Option<ImageReference>,
}

impl Flashcard {
    /// Creates a flashcard without an illustration.
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            image: None,
        }
    }

    /// Returns the card with its illustration replaced.
    pub fn with_image(mut self, image: Option<ImageReference>) -> Self {
        self.image = image;
        self
    }
}

/// A four-option multiple choice question.
///
/// # Examples
///
/// ```
/// use edugenie_core::QuizQuestion;
///
/// let question = QuizQuestion::new(
///     "quiz-1",
///     "Which organelle hosts photosynthesis?",
///     vec!["Nucleus".into(), "Chloroplast".into(), "Ribosome".into(), "Vacuole".into()],
///     "Chloroplast",
///     "Chloroplasts contain chlorophyll.",
/// );
/// assert!(question.answer_is_listed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Unique id minted at creation
    id: String,
    /// Question text
    question: String,
    /// Answer options in display order
    options: Vec<String>,
    /// Must equal one of `options` verbatim
    correct_answer: String,
    /// Why the answer is correct
    explanation: String,
    /// Optional illustration
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    image: Option<ImageReference>,
}

impl QuizQuestion {
    /// Number of options every question is expected to carry.
    pub const OPTION_COUNT: usize = 4;

    /// Creates a question without an illustration.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            image: None,
        }
    }

    /// Returns the question with its illustration replaced.
    pub fn with_image(mut self, image: Option<ImageReference>) -> Self {
        self.image = image;
        self
    }

    /// True when the correct answer appears verbatim among the options.
    pub fn answer_is_listed(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}
