//! Tests for the Ollama client against a mocked generate endpoint.

use edugenie_core::{ChatMessage, StreamHandler};
use edugenie_error::{BackendErrorKind, EduGenieError, EduGenieErrorKind};
use edugenie_interface::StudyBackend;
use edugenie_models::{GenerateTransport, IMAGE_FALLBACK, OllamaClient, OllamaSettings, RetryPolicy};
use serde_json::json;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str, retry: RetryPolicy) -> anyhow::Result<OllamaClient> {
    let settings = OllamaSettings::builder().base_url(base_url).build()?;
    Ok(OllamaClient::new(
        settings,
        GenerateTransport::new(reqwest::Client::new(), retry),
    ))
}

fn client(server: &MockServer) -> anyhow::Result<OllamaClient> {
    client_for(&server.uri(), RetryPolicy::none())
}

fn backend_kind(err: &EduGenieError) -> Option<&BackendErrorKind> {
    match err.kind() {
        EduGenieErrorKind::Backend(e) => Some(&e.kind),
        _ => None,
    }
}

async fn mount_generate(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn flashcards_survive_prose_prefix() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let cards: Vec<_> = (1..=5)
        .map(|i| json!({"front": format!("Q{i}"), "back": format!("A{i}")}))
        .collect();
    let text = format!("Here are your cards:\n{}", serde_json::to_string(&cards)?);

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "format": {"type": "array"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": text, "done": true})))
        .expect(1)
        .mount(&server)
        .await;

    let cards = client(&server)?
        .generate_flashcards("Photosynthesis", "", 5, false)
        .await?;

    assert_eq!(cards.len(), 5);
    let ids: HashSet<_> = cards.iter().map(|c| c.id().clone()).collect();
    assert_eq!(ids.len(), 5);
    for (i, card) in cards.iter().enumerate() {
        assert_eq!(card.front(), &format!("Q{}", i + 1));
        assert_eq!(card.back(), &format!("A{}", i + 1));
        assert!(card.image().is_none());
    }
    Ok(())
}

#[tokio::test]
async fn missing_model_reports_install_hint() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model 'llama3.2' not found"))
        .mount(&server)
        .await;

    let err = client(&server)?
        .summarize_notes("notes", None)
        .await
        .expect_err("404 must fail");

    match backend_kind(&err) {
        Some(BackendErrorKind::ModelNotFound { model, hint }) => {
            assert_eq!(model, "llama3.2");
            assert!(hint.contains("ollama pull llama3.2"));
        }
        other => panic!("expected ModelNotFound, got {other:?}"),
    }
    assert!(err.user_message().contains("not found"));
    Ok(())
}

#[tokio::test]
async fn server_error_carries_status_and_excerpt() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(1000)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), RetryPolicy::new(3, 0))?;
    let err = client.explain("Osmosis", &[], None).await.expect_err("500 must fail");

    match backend_kind(&err) {
        Some(BackendErrorKind::Http { status, excerpt }) => {
            assert_eq!(*status, 500);
            assert_eq!(excerpt.len(), 200);
        }
        other => panic!("expected Http, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn empty_response_is_an_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_generate(&server, json!({"response": "", "done": true})).await;

    let err = client(&server)?
        .explain("Osmosis", &[], None)
        .await
        .expect_err("empty text must fail");
    assert_eq!(backend_kind(&err), Some(&BackendErrorKind::EmptyResponse));
    Ok(())
}

#[tokio::test]
async fn explain_sends_history_and_tutor_prompt() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "prompt": "User: Hi\n\nAssistant: Hello!\n\nUser: What is ATP?\n\nAssistant:",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Energy.", "done": true})))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
    let text = client(&server)?.explain("What is ATP?", &history, None).await?;
    assert_eq!(text, "Energy.");
    Ok(())
}

#[tokio::test]
async fn streaming_delivers_fragments_in_order() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"response\":\"Photo\",\"done\":false}\n",
        "not json\n",
        "{\"response\":\"synthesis\",\"done\":false}\n",
        "{\"response\":\" converts light\",\"done\":false}\n",
        "{\"response\":\"\",\"done\":true}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&server)
        .await;

    let mut fragments = Vec::new();
    let text = client(&server)?
        .summarize_notes(
            "notes",
            Some(StreamHandler::new(|f| fragments.push(f.to_string()))),
        )
        .await?;

    assert_eq!(fragments, vec!["Photo", "synthesis", " converts light"]);
    assert_eq!(text, fragments.concat());
    Ok(())
}

#[tokio::test]
async fn cancelled_stream_fails_with_cancelled() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "{\"response\":\"never\",\"done\":true}\n",
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let mut delivered = 0;
    let handler = StreamHandler::new(|_| delivered += 1).with_cancellation(token);

    let err = client(&server)?
        .explain("Osmosis", &[], Some(handler))
        .await
        .expect_err("cancelled stream must fail");

    assert_eq!(backend_kind(&err), Some(&BackendErrorKind::Cancelled));
    assert_eq!(delivered, 0);
    Ok(())
}

#[tokio::test]
async fn image_summary_strips_data_url_and_uses_vision_model() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "llava", "images": ["AAAA"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "- key point", "done": true})))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)?
        .summarize_image("data:image/png;base64,AAAA", "image/png", None)
        .await?;
    assert_eq!(text, "- key point");
    Ok(())
}

#[tokio::test]
async fn image_summary_failure_returns_fallback() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let text = client(&server)?
        .summarize_image("AAAA", "image/jpeg", None)
        .await?;
    assert_eq!(text, IMAGE_FALLBACK);
    Ok(())
}

#[tokio::test]
async fn preload_sends_empty_prompt() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "llama3.2", "prompt": "", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "", "done": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)?.preload().await;
    Ok(())
}

#[tokio::test]
async fn preload_swallows_unreachable_backend() -> anyhow::Result<()> {
    let client = client_for("http://127.0.0.1:9", RetryPolicy::none())?;
    client.preload().await;
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_retried_then_reported() -> anyhow::Result<()> {
    let client = client_for("http://127.0.0.1:9", RetryPolicy::new(2, 0))?;
    let err = client
        .generate_quiz("Cells", "", 3, false)
        .await
        .expect_err("nothing listens on port 9");

    match backend_kind(&err) {
        Some(BackendErrorKind::Unreachable { url, .. }) => {
            assert_eq!(url, "http://127.0.0.1:9/api/generate");
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
    assert!(err.user_message().contains("isn't responding"));
    Ok(())
}

#[tokio::test]
async fn quiz_letter_answers_are_repaired() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let questions = json!([
        {
            "question": "Where does photosynthesis happen?",
            "options": ["Nucleus", "Chloroplast", "Ribosome", "Vacuole"],
            "correctAnswer": "B",
            "explanation": "Chloroplasts hold chlorophyll."
        },
        {
            "question": "Unanswerable?",
            "options": ["1", "2", "3", "4"],
            "correctAnswer": "5",
            "explanation": ""
        }
    ]);
    mount_generate(
        &server,
        json!({"response": serde_json::to_string(&questions)?, "done": true}),
    )
    .await;

    let quiz = client(&server)?.generate_quiz("Plants", "", 2, false).await?;
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz[0].correct_answer(), "Chloroplast");
    assert!(quiz[0].answer_is_listed());
    Ok(())
}

fn cancel_after(token: &CancellationToken, delay: Duration) {
    let token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        token.cancel();
    });
}

#[tokio::test]
async fn cancellation_interrupts_a_slow_backend() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"response\":\"late\",\"done\":true}\n", "application/x-ndjson")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let handler = StreamHandler::new(|_| {}).with_cancellation(token.clone());
    cancel_after(&token, Duration::from_millis(100));

    let started = Instant::now();
    let err = client(&server)?
        .explain("Osmosis", &[], Some(handler))
        .await
        .expect_err("cancelled request must fail");

    assert_eq!(backend_kind(&err), Some(&BackendErrorKind::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}

#[tokio::test]
async fn cancellation_interrupts_retry_backoff() -> anyhow::Result<()> {
    let client = client_for("http://127.0.0.1:9", RetryPolicy::new(3, 4000))?;
    let token = CancellationToken::new();
    let handler = StreamHandler::new(|_| {}).with_cancellation(token.clone());
    cancel_after(&token, Duration::from_millis(100));

    let started = Instant::now();
    let err = client
        .summarize_notes("notes", Some(handler))
        .await
        .expect_err("cancelled request must fail");

    assert_eq!(backend_kind(&err), Some(&BackendErrorKind::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(3));
    Ok(())
}

#[tokio::test]
async fn streamed_backend_error_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "{\"error\":\"model runner has unexpectedly stopped\"}\n",
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let mut delivered = 0;
    let err = client(&server)?
        .explain("Osmosis", &[], Some(StreamHandler::new(|_| delivered += 1)))
        .await
        .expect_err("in-band error must fail");

    match backend_kind(&err) {
        Some(BackendErrorKind::Generation(message)) => {
            assert!(message.contains("unexpectedly stopped"));
        }
        other => panic!("expected Generation, got {other:?}"),
    }
    assert_eq!(delivered, 0);
    Ok(())
}

#[tokio::test]
async fn whole_body_backend_error_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_generate(&server, json!({"error": "model runner has unexpectedly stopped"})).await;

    let err = client(&server)?
        .explain("Osmosis", &[], None)
        .await
        .expect_err("in-band error must fail");

    assert!(matches!(
        backend_kind(&err),
        Some(BackendErrorKind::Generation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn empty_stream_is_an_empty_response() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "{\"response\":\"\",\"done\":true}\n",
            "application/x-ndjson",
        ))
        .mount(&server)
        .await;

    let err = client(&server)?
        .summarize_notes("notes", Some(StreamHandler::new(|_| {})))
        .await
        .expect_err("nothing was generated");

    assert_eq!(backend_kind(&err), Some(&BackendErrorKind::EmptyResponse));
    Ok(())
}
