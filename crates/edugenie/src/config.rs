//! Layered configuration loading.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (explicit path, else `<config_dir>/edugenie/edugenie.toml` when present)
//! 3. Environment variables
//!
//! ```toml
//! [local]
//! base_url = "http://gpu-box:11434"
//! model = "llama3.2"
//!
//! [hosted]
//! api_key = "hf_..."
//!
//! [retry]
//! attempts = 5
//! backoff_ms = 500
//!
//! [bindings]
//! quiz = "hosted"
//! ```

use crate::CapabilityBindings;
use derive_builder::Builder;
use derive_getters::Getters;
use edugenie_core::Capability;
use edugenie_error::{ConfigError, ConfigErrorKind, ConfigResult};
use edugenie_models::{HuggingFaceSettings, OllamaSettings, RetryPolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// File name looked up in the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "edugenie.toml";

/// Environment variables and the configuration keys they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OLLAMA_BASE_URL", "local.base_url"),
    ("OLLAMA_MODEL", "local.model"),
    ("OLLAMA_VISION_MODEL", "local.vision_model"),
    ("HUGGINGFACE_BASE_URL", "hosted.base_url"),
    ("HUGGINGFACE_API_KEY", "hosted.api_key"),
    ("HUGGINGFACE_TEXT_MODEL", "hosted.text_model"),
    ("HUGGINGFACE_IMAGE_MODEL", "hosted.image_model"),
    ("EDUGENIE_RETRY_ATTEMPTS", "retry.attempts"),
    ("EDUGENIE_RETRY_BACKOFF_MS", "retry.backoff_ms"),
];

/// Fully resolved settings for a [`Coordinator`](crate::Coordinator).
///
/// # Examples
///
/// ```
/// use edugenie::{BackendKind, Capability, EduGenieConfig};
///
/// let config = EduGenieConfig::default();
/// assert_eq!(config.ollama().model(), "llama3.2");
/// assert!(config.huggingface().api_key().is_none());
/// assert_eq!(config.bindings().backend_for(Capability::Image), BackendKind::Hosted);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Getters, Builder)]
#[builder(setter(into), default)]
pub struct EduGenieConfig {
    /// Local inference server
    ollama: OllamaSettings,
    /// Hosted inference API
    huggingface: HuggingFaceSettings,
    /// Retry policy shared by both adapters
    retry: RetryPolicy,
    /// Capability routing
    bindings: CapabilityBindings,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    local: RawLocal,
    hosted: RawHosted,
    retry: RawRetry,
    #[serde(default)]
    bindings: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawLocal {
    base_url: String,
    model: String,
    vision_model: String,
}

#[derive(Debug, Deserialize)]
struct RawHosted {
    base_url: String,
    #[serde(default)]
    api_key: Option<String>,
    text_model: String,
    image_model: String,
}

#[derive(Debug, Deserialize)]
struct RawRetry {
    attempts: u64,
    backoff_ms: u64,
}

impl EduGenieConfig {
    /// Creates a builder for `EduGenieConfig`.
    pub fn builder() -> EduGenieConfigBuilder {
        EduGenieConfigBuilder::default()
    }

    /// Loads configuration from defaults, a TOML file and the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigErrorKind::Load`] when an explicit `path` is missing or
    /// unreadable or a number does not parse, [`ConfigErrorKind::InvalidValue`]
    /// for an unknown capability or backend name.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading environment values through `env`.
    #[instrument(skip(env))]
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("local.base_url", defaults.ollama.base_url().as_str())
            .and_then(|b| b.set_default("local.model", defaults.ollama.model().as_str()))
            .and_then(|b| {
                b.set_default("local.vision_model", defaults.ollama.vision_model().as_str())
            })
            .and_then(|b| b.set_default("hosted.base_url", defaults.huggingface.base_url().as_str()))
            .and_then(|b| {
                b.set_default("hosted.text_model", defaults.huggingface.text_model().as_str())
            })
            .and_then(|b| {
                b.set_default("hosted.image_model", defaults.huggingface.image_model().as_str())
            })
            .and_then(|b| b.set_default("retry.attempts", *defaults.retry.attempts() as i64))
            .and_then(|b| {
                b.set_default("retry.backoff_ms", *defaults.retry.initial_backoff_ms() as i64)
            })
            .map_err(load_error)?;

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Using configuration file");
                builder = builder.add_source(
                    config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                if let Some(path) = default_path() {
                    debug!(path = %path.display(), "Checking default configuration file");
                    builder = builder.add_source(
                        config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        for (var, key) in ENV_OVERRIDES {
            builder = builder
                .set_override_option(*key, non_empty(env(var)))
                .map_err(load_error)?;
        }
        for capability in Capability::iter() {
            let var = format!("EDUGENIE_BIND_{}", binding_name(capability).to_uppercase());
            builder = builder
                .set_override_option(
                    format!("bindings.{}", binding_name(capability)),
                    non_empty(env(&var)),
                )
                .map_err(load_error)?;
        }

        let raw: RawConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(load_error)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> ConfigResult<Self> {
        let ollama = OllamaSettings::builder()
            .base_url(raw.local.base_url)
            .model(raw.local.model)
            .vision_model(raw.local.vision_model)
            .build()
            .map_err(|e| load_error(e.to_string()))?;

        let huggingface = HuggingFaceSettings::builder()
            .base_url(raw.hosted.base_url)
            .api_key(non_empty(raw.hosted.api_key))
            .text_model(raw.hosted.text_model)
            .image_model(raw.hosted.image_model)
            .build()
            .map_err(|e| load_error(e.to_string()))?;

        let attempts = usize::try_from(raw.retry.attempts).map_err(|_| {
            ConfigError::new(ConfigErrorKind::InvalidValue {
                key: "retry.attempts".to_string(),
                message: format!("{} is out of range", raw.retry.attempts),
            })
        })?;
        let retry = RetryPolicy::new(attempts, raw.retry.backoff_ms);

        let bindings = CapabilityBindings::from_pairs(
            raw.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;

        Ok(Self {
            ollama,
            huggingface,
            retry,
            bindings,
        })
    }
}

/// `<config_dir>/edugenie/edugenie.toml`, when a config directory exists.
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("edugenie").join(CONFIG_FILE_NAME))
}

/// Configuration key segment for a capability, e.g. `summarize_image`.
fn binding_name(capability: Capability) -> String {
    capability.to_string().replace('-', "_")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[track_caller]
fn load_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::new(ConfigErrorKind::Load(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_names_use_underscores() {
        assert_eq!(binding_name(Capability::SummarizeImage), "summarize_image");
        assert_eq!(binding_name(Capability::Quiz), "quiz");
    }

    #[test]
    fn blank_values_are_absent() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("hf_x".into())), Some("hf_x".into()));
    }
}
