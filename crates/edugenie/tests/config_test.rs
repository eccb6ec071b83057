//! Layered configuration loading.

use edugenie::{BackendKind, Capability, EduGenieConfig};
use edugenie_error::ConfigErrorKind;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(contents: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn file_values_override_defaults() -> anyhow::Result<()> {
    let file = toml_file(
        r#"
[local]
base_url = "http://gpu-box:11434"
model = "mistral"

[hosted]
api_key = "hf_file"

[retry]
attempts = 5
backoff_ms = 100

[bindings]
quiz = "hosted"
summarize_image = "Hosted"
"#,
    )?;

    let config = EduGenieConfig::load_with(Some(file.path()), env(&[]))?;

    assert_eq!(config.ollama().base_url(), "http://gpu-box:11434");
    assert_eq!(config.ollama().model(), "mistral");
    assert_eq!(config.ollama().vision_model(), "llava");
    assert_eq!(config.huggingface().api_key().as_deref(), Some("hf_file"));
    assert_eq!(
        config.huggingface().text_model(),
        "mistralai/Mistral-7B-Instruct-v0.2"
    );
    assert_eq!(*config.retry().attempts(), 5);
    assert_eq!(*config.retry().initial_backoff_ms(), 100);
    assert_eq!(config.bindings().backend_for(Capability::Quiz), BackendKind::Hosted);
    assert_eq!(
        config.bindings().backend_for(Capability::SummarizeImage),
        BackendKind::Hosted
    );
    assert_eq!(
        config.bindings().backend_for(Capability::Explain),
        BackendKind::Local
    );
    Ok(())
}

#[test]
fn environment_overrides_file() -> anyhow::Result<()> {
    let file = toml_file(
        r#"
[local]
model = "mistral"

[bindings]
quiz = "hosted"
"#,
    )?;

    let config = EduGenieConfig::load_with(
        Some(file.path()),
        env(&[
            ("OLLAMA_MODEL", "phi3"),
            ("HUGGINGFACE_API_KEY", "hf_env"),
            ("EDUGENIE_RETRY_ATTEMPTS", "1"),
            ("EDUGENIE_BIND_QUIZ", "local"),
            ("EDUGENIE_BIND_SUMMARIZE_IMAGE", "hosted"),
        ]),
    )?;

    assert_eq!(config.ollama().model(), "phi3");
    assert_eq!(config.huggingface().api_key().as_deref(), Some("hf_env"));
    assert_eq!(*config.retry().attempts(), 1);
    assert_eq!(config.bindings().backend_for(Capability::Quiz), BackendKind::Local);
    assert_eq!(
        config.bindings().backend_for(Capability::SummarizeImage),
        BackendKind::Hosted
    );
    Ok(())
}

#[test]
fn empty_api_key_is_absent() -> anyhow::Result<()> {
    let file = toml_file("[hosted]\napi_key = \"\"\n")?;
    let config = EduGenieConfig::load_with(Some(file.path()), env(&[]))?;
    assert!(config.huggingface().api_key().is_none());

    let file = toml_file("")?;
    let config =
        EduGenieConfig::load_with(Some(file.path()), env(&[("HUGGINGFACE_API_KEY", "")]))?;
    assert!(config.huggingface().api_key().is_none());
    Ok(())
}

#[test]
fn unknown_backend_is_invalid_value() -> anyhow::Result<()> {
    let file = toml_file("[bindings]\nexplain = \"cloud\"\n")?;
    let err = EduGenieConfig::load_with(Some(file.path()), env(&[])).unwrap_err();
    match err.kind {
        ConfigErrorKind::InvalidValue { key, message } => {
            assert_eq!(key, "bindings.explain");
            assert!(message.contains("cloud"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_explicit_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = EduGenieConfig::load_with(Some(&path), env(&[])).unwrap_err();
    assert!(matches!(err.kind, ConfigErrorKind::Load(_)));
}

#[test]
fn malformed_number_fails_to_load() -> anyhow::Result<()> {
    let file = toml_file("")?;
    let err = EduGenieConfig::load_with(
        Some(file.path()),
        env(&[("EDUGENIE_RETRY_ATTEMPTS", "several")]),
    )
    .unwrap_err();
    assert!(matches!(err.kind, ConfigErrorKind::Load(_)));
    Ok(())
}
