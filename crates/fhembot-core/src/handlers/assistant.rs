//! Virtual-assistant answer handler.
//!
//! The one async handler: sends the question to the answer provider under
//! a bounded timeout and falls back to a fixed notice on any failure, so
//! the dialogue engine stays total.

use std::time::Duration;

use fhembot_types::answer::AnswerRequest;
use tracing::warn;

use crate::answer::AnswerProvider;
use crate::dialogue::messages;

/// Outcome of one assistant call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantOutcome {
    /// Answer body, or the deterministic fallback.
    pub body: String,
    /// True when the provider produced the body. Only real answers are
    /// recorded in the session history.
    pub answered: bool,
}

impl AssistantOutcome {
    fn fallback() -> Self {
        Self {
            body: messages::ANSWER_FALLBACK.to_string(),
            answered: false,
        }
    }
}

/// Wraps the configured answer provider with the per-call timeout.
pub struct AssistantHandler<A> {
    provider: Option<A>,
    timeout: Duration,
}

impl<A: AnswerProvider> AssistantHandler<A> {
    pub fn new(provider: A, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// Handler with no provider: every question gets the fallback.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Answer one question. Never fails; provider errors and timeouts
    /// degrade to the fallback body.
    pub async fn answer(&self, request: &AnswerRequest) -> AssistantOutcome {
        let Some(provider) = &self.provider else {
            return AssistantOutcome::fallback();
        };

        match tokio::time::timeout(self.timeout, provider.answer(request)).await {
            Ok(Ok(response)) => AssistantOutcome {
                body: response.text,
                answered: true,
            },
            Ok(Err(error)) => {
                warn!(provider = provider.name(), %error, "answer provider failed");
                AssistantOutcome::fallback()
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "answer provider timed out"
                );
                AssistantOutcome::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fhembot_types::answer::AnswerResponse;
    use fhembot_types::error::AnswerError;

    use super::*;

    struct FixedProvider;

    impl AnswerProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn answer(
            &self,
            _request: &AnswerRequest,
        ) -> impl std::future::Future<Output = Result<AnswerResponse, AnswerError>> + Send
        {
            async {
                Ok(AnswerResponse {
                    text: "A taxa de ocupação mede leitos ocupados.".to_string(),
                    model: "test".to_string(),
                })
            }
        }
    }

    struct FailingProvider;

    impl AnswerProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn answer(
            &self,
            _request: &AnswerRequest,
        ) -> impl std::future::Future<Output = Result<AnswerResponse, AnswerError>> + Send
        {
            async {
                Err(AnswerError::Provider {
                    message: "boom".to_string(),
                })
            }
        }
    }

    struct SlowProvider;

    impl AnswerProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        fn answer(
            &self,
            _request: &AnswerRequest,
        ) -> impl std::future::Future<Output = Result<AnswerResponse, AnswerError>> + Send
        {
            async {
                tokio::time::sleep(Duration::from_secs(120)).await;
                Ok(AnswerResponse {
                    text: "tarde demais".to_string(),
                    model: "test".to_string(),
                })
            }
        }
    }

    fn request() -> AnswerRequest {
        AnswerRequest {
            question: "O que mede a taxa de ocupação?".to_string(),
            display_name: "Ana".to_string(),
            unit: Some("Hospital João XXIII".to_string()),
            system: None,
            history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn success_returns_provider_text() {
        let handler = AssistantHandler::new(FixedProvider, Duration::from_secs(5));
        let outcome = handler.answer(&request()).await;
        assert!(outcome.answered);
        assert_eq!(outcome.body, "A taxa de ocupação mede leitos ocupados.");
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let handler = AssistantHandler::new(FailingProvider, Duration::from_secs(5));
        let outcome = handler.answer(&request()).await;
        assert!(!outcome.answered);
        assert_eq!(outcome.body, messages::ANSWER_FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back() {
        let handler = AssistantHandler::new(SlowProvider, Duration::from_secs(30));
        let outcome = handler.answer(&request()).await;
        assert!(!outcome.answered);
        assert_eq!(outcome.body, messages::ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn disabled_handler_falls_back() {
        let handler = AssistantHandler::<FixedProvider>::disabled();
        assert!(!handler.is_enabled());
        let outcome = handler.answer(&request()).await;
        assert!(!outcome.answered);
        assert_eq!(outcome.body, messages::ANSWER_FALLBACK);
    }
}
