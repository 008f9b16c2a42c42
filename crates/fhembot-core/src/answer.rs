//! Answer provider trait.
//!
//! The virtual-assistant backend: given a question and the conversation
//! context, produce an answer. Implementations live in fhembot-infra.

use fhembot_types::answer::{AnswerRequest, AnswerResponse};
use fhembot_types::error::AnswerError;

/// Trait for LLM-backed answer backends (OpenAI, Ollama, etc.).
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in fhembot-infra.
pub trait AnswerProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Answer one question with the given conversation context.
    fn answer(
        &self,
        request: &AnswerRequest,
    ) -> impl std::future::Future<Output = Result<AnswerResponse, AnswerError>> + Send;
}
