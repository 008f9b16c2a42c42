//! OpenAI-compatible answer provider.
//!
//! A single [`OpenAiCompatibleProvider`] serves both OpenAI and a local
//! Ollama server via configurable base URLs, using [`async_openai`] for
//! type-safe request/response handling.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};

use tracing::{Instrument, info_span};

use fhembot_core::answer::AnswerProvider;
use fhembot_observe::genai_attrs as genai;
use fhembot_types::answer::{AnswerRequest, AnswerResponse};
use fhembot_types::error::AnswerError;
use fhembot_types::session::HistoryRole;

/// Answers are short explanations of indicators and where to find them.
const MAX_COMPLETION_TOKENS: u32 = 1024;

/// Provider for any OpenAI-compatible chat completions API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from explicit connection parameters.
    pub fn new(
        provider_name: &str,
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
    ) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: provider_name.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Create an OpenAI provider.
    ///
    /// Uses `https://api.openai.com/v1` as the base URL.
    pub fn openai(api_key: &str, model: &str, temperature: f32) -> Self {
        Self::new(
            genai::PROVIDER_OPENAI,
            "https://api.openai.com/v1",
            api_key,
            model,
            temperature,
        )
    }

    /// Create a provider for a local Ollama server.
    ///
    /// Uses `http://localhost:11434/v1` as the base URL. Ollama ignores the
    /// API key but the protocol requires one, so a placeholder is sent.
    pub fn ollama(model: &str, temperature: f32) -> Self {
        Self::new(
            genai::PROVIDER_OLLAMA,
            "http://localhost:11434/v1",
            "ollama",
            model,
            temperature,
        )
    }

    /// Build a [`CreateChatCompletionRequest`] from an [`AnswerRequest`]:
    /// persona system message, then the stored history, then the question.
    fn build_request(&self, request: &AnswerRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        messages.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system_prompt(request)),
                name: None,
            },
        ));

        for turn in &request.history {
            let message = match turn.role {
                HistoryRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(turn.text.clone()),
                        name: None,
                    })
                }
                HistoryRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            turn.text.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(message);
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(request.question.clone()),
                name: None,
            },
        ));

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
            temperature: Some(self.temperature),
            ..Default::default()
        }
    }
}

/// The Zé persona, contextualized with who is asking and from which unit.
fn system_prompt(request: &AnswerRequest) -> String {
    let mut prompt = String::from(
        "Você é o Zé, assistente virtual do Núcleo de Informação da Fhemig \
         (Fundação Hospitalar do Estado de Minas Gerais). Responda sempre em \
         português do Brasil, em formato markdown, de forma objetiva e cordial. \
         Seu papel é explicar indicadores hospitalares e orientar onde \
         encontrá-los nas ferramentas da Fhemig.",
    );

    prompt.push_str(&format!(
        " Você está conversando com {}; use o nome da pessoa com naturalidade.",
        request.display_name
    ));

    if let Some(unit) = &request.unit {
        match request.system {
            Some(system) => prompt.push_str(&format!(
                " A pessoa trabalha na unidade {unit}, que utiliza o sistema {system}."
            )),
            None => prompt.push_str(&format!(" A pessoa trabalha na unidade {unit}.")),
        }
    }

    prompt.push_str(
        " Quando não souber a resposta, diga isso claramente e indique o \
         Núcleo de Informação pelo endereço nucleo.informacao@fhemig.mg.gov.br.",
    );
    prompt
}

// OpenAiCompatibleProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state including the API key inside the
// async-openai Client.

impl AnswerProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerResponse, AnswerError> {
        let chat_request = self.build_request(request);

        let span = info_span!(
            "gen_ai.answer",
            { genai::GEN_AI_OPERATION_NAME } = genai::OP_CHAT,
            { genai::GEN_AI_PROVIDER_NAME } = self.provider_name.as_str(),
            { genai::GEN_AI_REQUEST_MODEL } = chat_request.model.as_str(),
            { genai::GEN_AI_REQUEST_MAX_TOKENS } = MAX_COMPLETION_TOKENS,
            { genai::GEN_AI_REQUEST_TEMPERATURE } = f64::from(self.temperature),
        );

        let response = self
            .client
            .chat()
            .create(chat_request)
            .instrument(span)
            .await
            .map_err(map_openai_error)?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnswerError::Provider {
                message: "completion had no content".to_string(),
            });
        }

        Ok(AnswerResponse {
            text,
            model: response.model,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`AnswerError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> AnswerError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                AnswerError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                AnswerError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                AnswerError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => AnswerError::AuthenticationFailed,
                    429 => AnswerError::RateLimited {
                        retry_after_ms: None,
                    },
                    _ => AnswerError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                AnswerError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            AnswerError::Deserialization(format!("failed to parse response: {content}"))
        }
        _ => AnswerError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use fhembot_types::session::{HistoryTurn, InfoSystem};

    use super::*;

    fn make_request() -> AnswerRequest {
        AnswerRequest {
            question: "O que mede a taxa de ocupação?".to_string(),
            display_name: "Ana".to_string(),
            unit: Some("Hospital João XXIII".to_string()),
            system: Some(InfoSystem::Sigh),
            history: vec![
                HistoryTurn::user("oi"),
                HistoryTurn::assistant("Olá, Ana!"),
            ],
        }
    }

    #[test]
    fn test_openai_factory() {
        let provider = OpenAiCompatibleProvider::openai("sk-test", "gpt-4o", 0.2);
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model, "gpt-4o");
    }

    #[test]
    fn test_ollama_factory() {
        let provider = OpenAiCompatibleProvider::ollama("llama3", 0.2);
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model, "llama3");
    }

    #[test]
    fn test_build_request_orders_messages() {
        let provider = OpenAiCompatibleProvider::openai("sk-test", "gpt-4o", 0.2);
        let chat_request = provider.build_request(&make_request());

        // 1 system + 2 history + 1 question = 4 messages
        assert_eq!(chat_request.messages.len(), 4);
        assert!(matches!(
            chat_request.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            chat_request.messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(
            chat_request.messages[3],
            ChatCompletionRequestMessage::User(_)
        ));
        assert_eq!(chat_request.model, "gpt-4o");
        assert_eq!(chat_request.max_completion_tokens, Some(1024));
        assert_eq!(chat_request.temperature, Some(0.2));
    }

    #[test]
    fn test_system_prompt_carries_context() {
        let prompt = system_prompt(&make_request());
        assert!(prompt.contains("Zé"));
        assert!(prompt.contains("Ana"));
        assert!(prompt.contains("Hospital João XXIII"));
        assert!(prompt.contains("SIGH"));
        assert!(prompt.contains("nucleo.informacao@fhemig.mg.gov.br"));
    }

    #[test]
    fn test_system_prompt_without_unit() {
        let request = AnswerRequest {
            unit: None,
            system: None,
            ..make_request()
        };
        let prompt = system_prompt(&request);
        assert!(!prompt.contains("unidade"));
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("authentication_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, AnswerError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, AnswerError::RateLimited { .. }));
    }

    #[test]
    fn test_map_openai_error_other_is_provider() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, AnswerError::Provider { .. }));
    }
}
