//! EduGenie provider coordination.
//!
//! [`Coordinator`] is the single entry point for the study tools. It routes
//! every capability to the backend named in its [`CapabilityBindings`],
//! attaches illustrations on a best-effort basis and never lets an image
//! failure affect a text result.
//!
//! ```no_run
//! use edugenie::{Coordinator, EduGenieConfig};
//!
//! # async fn run() -> edugenie::EduGenieResult<()> {
//! let config = EduGenieConfig::load(None)?;
//! let coordinator = Coordinator::from_config(&config)?;
//! let cards = coordinator.generate_flashcards("Photosynthesis", "", 5, true).await?;
//! println!("{}", cards.len());
//! # Ok(())
//! # }
//! ```

mod bindings;
mod config;
mod coordinator;
mod document_store;
mod file_processor;

pub use bindings::CapabilityBindings;
pub use config::{CONFIG_FILE_NAME, EduGenieConfig, EduGenieConfigBuilder};
pub use coordinator::{Coordinator, MEDIA_LECTURE_GUIDANCE};
pub use document_store::InMemoryDocumentStore;
pub use file_processor::PlainTextFileProcessor;

pub use edugenie_core::{
    BackendKind, Capability, ChatMessage, Flashcard, ImageReference, LectureMode, QuizQuestion,
    Role, StreamHandler, init_tracing,
};
pub use edugenie_error::{EduGenieError, EduGenieErrorKind, EduGenieResult};
pub use edugenie_interface::{
    Document, DocumentStore, FileProcessor, ImageBackend, ProcessedFile, ScoredDocument,
    StudyBackend,
};
