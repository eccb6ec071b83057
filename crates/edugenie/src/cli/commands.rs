//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Study helpers backed by local and hosted language models.
#[derive(Parser, Debug)]
#[command(name = "edugenie")]
#[command(about = "EduGenie - explanations, summaries, flashcards and quizzes")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explain a concept
    Explain {
        /// Concept or question to explain
        topic: String,

        /// Print the answer as it is generated
        #[arg(long)]
        stream: bool,
    },

    /// Summarize a notes file into bullet points
    Summarize {
        /// Notes file, or `-` for standard input
        file: PathBuf,

        /// Print the summary as it is generated
        #[arg(long)]
        stream: bool,
    },

    /// Summarize a photographed page of notes
    SummarizeImage {
        /// PNG, JPEG, GIF or WebP image
        path: PathBuf,
    },

    /// Generate flashcards as JSON
    Flashcards(StudySetArgs),

    /// Generate a multiple choice quiz as JSON
    Quiz(StudySetArgs),

    /// Summarize a lecture transcript
    Lecture {
        /// Transcript file, or `-` for standard input
        file: PathBuf,

        /// The file is an audio or video recording
        #[arg(long)]
        media: bool,
    },

    /// Generate an illustration
    Image {
        /// What to draw
        prompt: String,

        /// Write the image to this file instead of printing a data URL
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Warm up the local model
    Preload,
}

/// Options shared by the flashcard and quiz commands.
#[derive(Args, Debug)]
pub struct StudySetArgs {
    /// Subject of the study set
    pub topic: String,

    /// Source material to ground the study set in
    #[arg(long)]
    pub content: Option<String>,

    /// Notes file searched for passages relevant to the topic
    #[arg(long)]
    pub notes: Option<PathBuf>,

    /// Number of items to generate
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,

    /// Illustrate each item
    #[arg(long)]
    pub images: bool,
}
