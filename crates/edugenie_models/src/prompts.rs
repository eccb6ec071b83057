//! Prompts and request shapes for each study capability.

use edugenie_core::{ChatMessage, GenerationRequest, OutputFormat, SamplingOptions, render_transcript};
use edugenie_error::{BackendError, BackendErrorKind, BackendResult};
use serde_json::json;

const TUTOR_SYSTEM: &str = "You are EduGenie, a friendly and helpful AI study companion. \
Engage in natural conversation, answer questions clearly, and help the user learn.";

const NOTE_TAKER_SYSTEM: &str = "You are a professional note-taker. Extract the core essence \
of the provided text while maintaining factual accuracy.";

const FLASHCARD_SYSTEM: &str = "You are an expert at creating educational flashcards. \
You must respond with a valid JSON array only, no other text.";

const QUIZ_SYSTEM: &str = "You are an expert at creating educational quizzes. You must respond \
with a valid JSON array only, no other text. The correctAnswer must exactly match one of the options.";

const HOSTED_FLASHCARD_SYSTEM: &str = "You are a teacher. Create educational flashcards. \
Return ONLY a JSON array of objects with 'front' and 'back' properties.";

const HOSTED_QUIZ_SYSTEM: &str =
    "You are a quiz master. Create multiple choice questions. Return ONLY a JSON array of objects.";

const IMAGE_SUMMARY_PROMPT: &str = "Extract the text from this image of notes and summarize it \
into clear bullet points. Highlight key terms and main takeaways.";

const CHAT_TEMPERATURE: f32 = 0.8;
const FACTUAL_TEMPERATURE: f32 = 0.3;
const STRUCTURED_TEMPERATURE: f32 = 0.7;

fn build(builder: &mut edugenie_core::GenerationRequestBuilder) -> BackendResult<GenerationRequest> {
    builder.build().map_err(|e| {
        BackendError::new(BackendErrorKind::Request(format!(
            "Failed to build request: {}",
            e
        )))
    })
}

fn content_or_placeholder(content: &str) -> &str {
    if content.trim().is_empty() {
        "No additional content provided."
    } else {
        content
    }
}

/// Renders prior turns, the new user turn and the assistant cue.
pub fn explain_prompt(topic: &str, history: &[ChatMessage]) -> String {
    let turn = ChatMessage::user(topic).render();
    if history.is_empty() {
        format!("{}\n\nAssistant:", turn)
    } else {
        format!("{}\n\n{}\n\nAssistant:", render_transcript(history), turn)
    }
}

pub fn explain(model: &str, topic: &str, history: &[ChatMessage]) -> BackendResult<GenerationRequest> {
    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(explain_prompt(topic, history))
            .system(Some(TUTOR_SYSTEM.to_string()))
            .sampling(SamplingOptions::with_temperature(CHAT_TEMPERATURE)),
    )
}

pub fn summarize(model: &str, notes: &str) -> BackendResult<GenerationRequest> {
    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(format!(
                "Summarize these study notes into clear bullet points and highlight the most important concepts:\n\n{}",
                notes
            ))
            .system(Some(NOTE_TAKER_SYSTEM.to_string()))
            .sampling(SamplingOptions::with_temperature(FACTUAL_TEMPERATURE)),
    )
}

/// `image` must already be stripped of any `data:` URL prefix.
pub fn summarize_image(vision_model: &str, image: &str) -> BackendResult<GenerationRequest> {
    build(
        GenerationRequest::builder()
            .model(vision_model)
            .prompt(IMAGE_SUMMARY_PROMPT)
            .images(vec![image.to_string()])
            .sampling(SamplingOptions::with_temperature(FACTUAL_TEMPERATURE)),
    )
}

/// Item schema for flashcard output.
pub fn flashcard_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "front": { "type": "string" },
                "back": { "type": "string" }
            },
            "required": ["front", "back"],
            "additionalProperties": false
        }
    })
}

/// Item schema for quiz output.
pub fn quiz_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "question": { "type": "string" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 4,
                    "maxItems": 4
                },
                "correctAnswer": { "type": "string" },
                "explanation": { "type": "string" }
            },
            "required": ["question", "options", "correctAnswer", "explanation"],
            "additionalProperties": false
        }
    })
}

pub fn flashcards(model: &str, topic: &str, content: &str, count: usize) -> BackendResult<GenerationRequest> {
    let prompt = format!(
        "Generate exactly {count} flashcards based on the following topic and content.\n\n\
         Topic: {topic}\n\
         Content: {content}\n\n\
         IMPORTANT: Return ONLY a JSON array. Do not include any explanation, markdown, or text outside the JSON array.\n\
         Each flashcard must have exactly two fields: \"front\" and \"back\".",
        content = content_or_placeholder(content),
    );

    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(prompt)
            .system(Some(FLASHCARD_SYSTEM.to_string()))
            .format(OutputFormat::JsonArray(flashcard_schema()))
            .sampling(SamplingOptions::with_temperature(STRUCTURED_TEMPERATURE)),
    )
}

pub fn quiz(model: &str, topic: &str, content: &str, count: usize) -> BackendResult<GenerationRequest> {
    let prompt = format!(
        "Generate exactly {count} multiple choice quiz questions based on the following topic and content.\n\n\
         Topic: {topic}\n\
         Content: {content}\n\n\
         IMPORTANT: Return ONLY a JSON array. Do not include any explanation, markdown, or text outside the JSON array.\n\
         Each question must have: \"question\", \"options\" (array of 4 strings), \"correctAnswer\" (must match one option exactly), and \"explanation\".",
        content = content_or_placeholder(content),
    );

    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(prompt)
            .system(Some(QUIZ_SYSTEM.to_string()))
            .format(OutputFormat::JsonArray(quiz_schema()))
            .sampling(SamplingOptions::with_temperature(STRUCTURED_TEMPERATURE)),
    )
}

/// Flashcards requested through prompt instructions alone, for backends
/// without schema-constrained output.
pub fn hosted_flashcards(
    model: &str,
    topic: &str,
    content: &str,
    count: usize,
) -> BackendResult<GenerationRequest> {
    let prompt = format!(
        "Generate {count} flashcards about: Topic: {topic}. Context: {content}.\n\
         Return exactly {count} flashcards in this format: [{{\"front\": \"...\", \"back\": \"...\"}}]",
        content = content_or_placeholder(content),
    );

    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(prompt)
            .system(Some(HOSTED_FLASHCARD_SYSTEM.to_string()))
            .sampling(SamplingOptions::with_temperature(STRUCTURED_TEMPERATURE)),
    )
}

/// Quiz questions requested through prompt instructions alone.
pub fn hosted_quiz(
    model: &str,
    topic: &str,
    content: &str,
    count: usize,
) -> BackendResult<GenerationRequest> {
    let prompt = format!(
        "Generate a {count}-question quiz about: Topic: {topic}. Content: {content}.\n\
         Return exactly {count} questions in this format: \
         [{{\"question\": \"...\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"correctAnswer\": \"...\", \"explanation\": \"...\"}}]",
        content = content_or_placeholder(content),
    );

    build(
        GenerationRequest::builder()
            .model(model)
            .prompt(prompt)
            .system(Some(HOSTED_QUIZ_SYSTEM.to_string()))
            .sampling(SamplingOptions::with_temperature(STRUCTURED_TEMPERATURE)),
    )
}

/// An empty prompt that only forces the model to load.
pub fn preload(model: &str) -> BackendResult<GenerationRequest> {
    build(GenerationRequest::builder().model(model).prompt(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_prompt_renders_history_then_cue() {
        let history = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
        assert_eq!(
            explain_prompt("What is ATP?", &history),
            "User: Hi\n\nAssistant: Hello!\n\nUser: What is ATP?\n\nAssistant:"
        );
        assert_eq!(explain_prompt("Hi", &[]), "User: Hi\n\nAssistant:");
    }

    #[test]
    fn structured_requests_carry_schema() {
        let req = flashcards("llama3.2", "Cells", "", 5).unwrap();
        assert_eq!(*req.format(), OutputFormat::JsonArray(flashcard_schema()));
        assert!(req.prompt().contains("Generate exactly 5 flashcards"));
        assert!(req.prompt().contains("No additional content provided."));

        let req = quiz("llama3.2", "Cells", "Mitochondria", 3).unwrap();
        assert_eq!(quiz_schema()["items"]["properties"]["options"]["minItems"], 4);
        assert!(req.prompt().contains("Content: Mitochondria"));
    }

    #[test]
    fn hosted_requests_describe_format_in_prompt() {
        let req = hosted_flashcards("mistral", "Cells", "", 2).unwrap();
        assert_eq!(*req.format(), OutputFormat::Text);
        assert!(req.prompt().contains(r#"[{"front": "...", "back": "..."}]"#));

        let req = hosted_quiz("mistral", "Cells", "", 2).unwrap();
        assert!(req.prompt().starts_with("Generate a 2-question quiz"));
        assert!(req.prompt().contains(r#""correctAnswer": "...""#));
    }
}
