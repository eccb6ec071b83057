//! Subcommand handlers.

use super::input::{gather_content, read_image, read_study_file};
use super::{Commands, StudySetArgs};
use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use edugenie::{
    Coordinator, EduGenieConfig, ImageReference, LectureMode, StreamHandler,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Runs one subcommand against a coordinator built from `config`.
#[instrument(skip_all)]
pub async fn run(command: Commands, config: &EduGenieConfig) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    debug!(?command, "Dispatching command");

    match command {
        Commands::Explain { topic, stream } => {
            let text = with_stream(stream, |handler| {
                coordinator.explain_concept(&topic, &[], handler)
            })
            .await?;
            finish_text(stream, &text);
        }
        Commands::Summarize { file, stream } => {
            let notes = read_study_file(&file).await?;
            let text = with_stream(stream, |handler| {
                coordinator.summarize_notes(notes.content(), handler)
            })
            .await?;
            finish_text(stream, &text);
        }
        Commands::SummarizeImage { path } => {
            let (bytes, mime) = read_image(&path).await?;
            let image = ImageReference::from_bytes(mime, &bytes);
            let text = coordinator
                .summarize_image(image.as_str(), mime, None)
                .await?;
            println!("{}", text);
        }
        Commands::Flashcards(args) => {
            let content = study_content(&args).await?;
            let cards = coordinator
                .generate_flashcards(&args.topic, &content, args.count, args.images)
                .await?;
            print_json(&cards)?;
        }
        Commands::Quiz(args) => {
            let content = study_content(&args).await?;
            let questions = coordinator
                .generate_quiz(&args.topic, &content, args.count, args.images)
                .await?;
            print_json(&questions)?;
        }
        Commands::Lecture { file, media } => {
            let text = if media {
                coordinator
                    .summarize_lecture("", LectureMode::Media, None)
                    .await?
            } else {
                let transcript = read_study_file(&file).await?;
                coordinator
                    .summarize_lecture(transcript.content(), LectureMode::Text, None)
                    .await?
            };
            println!("{}", text);
        }
        Commands::Image { prompt, out } => {
            let image = coordinator
                .generate_image(&prompt)
                .await
                .context("Image generation failed; check the hosted API key and model")?;
            match out {
                Some(path) => write_image(&image, &path).await?,
                None => println!("{}", image),
            }
        }
        Commands::Preload => {
            coordinator.preload_model().await;
            println!("Preload requested");
        }
    }
    Ok(())
}

/// Runs `call` with a stdout-printing stream handler when `stream` is set.
///
/// Ctrl-C cancels an in-flight stream.
async fn with_stream<'a, F, Fut>(stream: bool, call: F) -> edugenie::EduGenieResult<String>
where
    F: FnOnce(Option<StreamHandler<'a>>) -> Fut,
    Fut: std::future::Future<Output = edugenie::EduGenieResult<String>>,
{
    if !stream {
        return call(None).await;
    }

    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let handler = StreamHandler::new(|fragment| {
        let mut stdout = std::io::stdout().lock();
        // Broken pipes end the output, not the request
        let _ = stdout.write_all(fragment.as_bytes());
        let _ = stdout.flush();
    })
    .with_cancellation(token);

    let result = call(Some(handler)).await;
    watcher.abort();
    result
}

fn finish_text(streamed: bool, text: &str) {
    if streamed {
        println!();
    } else {
        println!("{}", text);
    }
}

async fn study_content(args: &StudySetArgs) -> edugenie::EduGenieResult<String> {
    gather_content(&args.topic, args.content.as_deref(), args.notes.as_deref()).await
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

async fn write_image(image: &ImageReference, path: &Path) -> anyhow::Result<()> {
    let (_, payload) = image
        .as_str()
        .split_once(";base64,")
        .context("Generated image is not an inline data URL")?;
    let bytes = STANDARD
        .decode(payload)
        .context("Generated image is not valid base64")?;
    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
