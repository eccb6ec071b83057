//! Core data types for the EduGenie study tools.
//!
//! This crate provides the foundation data types shared by the backend
//! adapters, the response parser and the coordinator.

mod capability;
mod ids;
mod image;
mod message;
mod observability;
mod request;
mod role;
mod stream;
mod study;

pub use capability::{BackendKind, Capability, LectureMode};
pub use ids::IdMinter;
pub use image::ImageReference;
pub use message::{ChatMessage, render_transcript};
pub use observability::init_tracing;
pub use request::{GenerationRequest, GenerationRequestBuilder, OutputFormat, SamplingOptions};
pub use role::Role;
pub use stream::StreamHandler;
pub use study::{Flashcard, QuizQuestion};
