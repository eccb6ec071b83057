//! Trait definitions for the EduGenie study backends.
//!
//! The coordinator only talks to backends through these traits, so a
//! capability can be served by any adapter that implements them.

mod backend;
mod collaborators;

pub use backend::{ImageBackend, StudyBackend};
pub use collaborators::{
    Document, DocumentBuilder, DocumentStore, FileProcessor, ProcessedFile, ScoredDocument,
};
