//! Answer provider implementations.
//!
//! Contains the concrete implementation of the `AnswerProvider` trait
//! defined in `fhembot-core`, plus [`build_provider`] which constructs the
//! configured backend at startup. A missing API key degrades to `None`:
//! the assistant then answers every question with the fallback text
//! instead of taking the bot down.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatibleProvider;

use fhembot_types::config::{AnswerConfig, AnswerProviderKind};
use tracing::{info, warn};

/// Build the configured answer provider, or `None` when the assistant is
/// disabled or unusable.
pub fn build_provider(config: &AnswerConfig) -> Option<OpenAiCompatibleProvider> {
    if !config.enabled {
        info!("virtual assistant disabled by configuration");
        return None;
    }

    match config.provider {
        AnswerProviderKind::Openai => {
            let api_key = match std::env::var(&config.api_key_env) {
                Ok(key) if !key.is_empty() => key,
                _ => {
                    warn!(
                        env = %config.api_key_env,
                        "answer provider API key not set, questions get the fallback text"
                    );
                    return None;
                }
            };
            let provider = match config.base_url.as_deref() {
                Some(base_url) => OpenAiCompatibleProvider::new(
                    "openai",
                    base_url,
                    &api_key,
                    &config.model,
                    config.temperature,
                ),
                None => {
                    OpenAiCompatibleProvider::openai(&api_key, &config.model, config.temperature)
                }
            };
            Some(provider)
        }
        AnswerProviderKind::Ollama => {
            let provider = match config.base_url.as_deref() {
                Some(base_url) => OpenAiCompatibleProvider::new(
                    "ollama",
                    base_url,
                    "ollama",
                    &config.model,
                    config.temperature,
                ),
                None => OpenAiCompatibleProvider::ollama(&config.model, config.temperature),
            };
            Some(provider)
        }
    }
}
