//! Global configuration types for fhembot.
//!
//! `GlobalConfig` represents the top-level `fhembot.toml` that controls the
//! transport credentials, dispatcher sizing, session lifecycle, answer
//! provider and the optional webhook listener.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the fhembot assistant.
///
/// Loaded from `~/.fhembot/fhembot.toml`. All fields have sensible
/// defaults, so a missing or partial file still produces a runnable
/// configuration (credentials excepted, which live in env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub answer: AnswerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Chat platform connection settings.
///
/// The API key itself is never stored in the file; `api_key_env` names the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Base URL of the chat server.
    #[serde(default = "default_site")]
    pub site: String,

    /// Bot account address; also used to recognize self-authored events.
    #[serde(default = "default_bot_email")]
    pub bot_email: String,

    /// Environment variable holding the bot API key.
    #[serde(default = "default_transport_api_key_env")]
    pub api_key_env: String,

    /// Address escalation forwards are delivered to.
    #[serde(default = "default_escalation_recipient")]
    pub escalation_recipient: String,
}

fn default_site() -> String {
    "https://fhchat.expressomg.mg.gov.br".to_string()
}

fn default_bot_email() -> String {
    "informacoes-bot@fhchat.expressomg.mg.gov.br".to_string()
}

fn default_transport_api_key_env() -> String {
    "FHEMBOT_ZULIP_API_KEY".to_string()
}

fn default_escalation_recipient() -> String {
    "user75@fhchat.expressomg.mg.gov.br".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            bot_email: default_bot_email(),
            api_key_env: default_transport_api_key_env(),
            escalation_recipient: default_escalation_recipient(),
        }
    }
}

/// Worker pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Number of lane workers; also the cross-user parallelism bound.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Queued events per lane before ingestion pushes back.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Session storage and lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage backend: "memory" (default) or "sqlite".
    #[serde(default = "default_session_backend")]
    pub backend: SessionBackendKind,

    /// Conversations idle longer than this are evicted.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// How often the eviction sweep runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Which session store implementation to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackendKind {
    Memory,
    Sqlite,
}

fn default_session_backend() -> SessionBackendKind {
    SessionBackendKind::Memory
}

fn default_idle_timeout_secs() -> u64 {
    86_400
}

fn default_sweep_interval_secs() -> u64 {
    600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_session_backend(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Virtual-assistant answer provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// When false, the assistant menu entry answers with the fallback text
    /// without calling any provider.
    #[serde(default = "default_answer_enabled")]
    pub enabled: bool,

    /// Provider backend: "openai" (default) or "ollama".
    #[serde(default = "default_answer_provider")]
    pub provider: AnswerProviderKind,

    /// Model identifier passed to the provider.
    #[serde(default = "default_answer_model")]
    pub model: String,

    /// Base URL override (e.g. a local Ollama server).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the provider API key.
    #[serde(default = "default_answer_api_key_env")]
    pub api_key_env: String,

    /// Per-call timeout; on expiry the handler serves the fallback text.
    #[serde(default = "default_answer_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature.
    #[serde(default = "default_answer_temperature")]
    pub temperature: f32,
}

/// Which answer provider implementation to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerProviderKind {
    Openai,
    Ollama,
}

fn default_answer_enabled() -> bool {
    true
}

fn default_answer_provider() -> AnswerProviderKind {
    AnswerProviderKind::Openai
}

fn default_answer_model() -> String {
    "gpt-4o".to_string()
}

fn default_answer_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_answer_timeout_secs() -> u64 {
    30
}

fn default_answer_temperature() -> f32 {
    0.2
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            enabled: default_answer_enabled(),
            provider: default_answer_provider(),
            model: default_answer_model(),
            base_url: None,
            api_key_env: default_answer_api_key_env(),
            timeout_secs: default_answer_timeout_secs(),
            temperature: default_answer_temperature(),
        }
    }
}

/// Catalog file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding the catalog JSON files. Defaults to `data/` under
    /// the data dir when unset.
    #[serde(default)]
    pub data_dir: Option<String>,
}

/// Webhook/health HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// When false (default), no HTTP listener is started and ingestion is
    /// long-poll only.
    #[serde(default)]
    pub enabled: bool,

    /// Listen address.
    #[serde(default = "default_http_bind")]
    pub bind: String,

    /// Shared token the platform includes in outgoing-webhook payloads.
    /// Unset means the webhook accepts unauthenticated posts (dev mode).
    #[serde(default)]
    pub webhook_token: Option<String>,
}

fn default_http_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: default_http_bind(),
            webhook_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.dispatcher.workers, 4);
        assert_eq!(config.dispatcher.queue_capacity, 256);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.session.idle_timeout_secs, 86_400);
        assert_eq!(config.answer.provider, AnswerProviderKind::Openai);
        assert_eq!(config.answer.model, "gpt-4o");
        assert_eq!(config.answer.timeout_secs, 30);
        assert!(config.answer.enabled);
        assert!(!config.http.enabled);
        assert!(config.http.webhook_token.is_none());
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.dispatcher.workers, 4);
        assert_eq!(
            config.transport.escalation_recipient,
            "user75@fhchat.expressomg.mg.gov.br"
        );
    }

    #[test]
    fn test_global_config_deserialize_partial() {
        let toml_str = r#"
[dispatcher]
workers = 8

[session]
backend = "sqlite"
idle_timeout_secs = 3600
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatcher.workers, 8);
        // Unset fields in a present section still default.
        assert_eq!(config.dispatcher.queue_capacity, 256);
        assert_eq!(config.session.backend, SessionBackendKind::Sqlite);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        assert_eq!(config.session.sweep_interval_secs, 600);
        // Untouched sections default entirely.
        assert_eq!(config.answer.model, "gpt-4o");
    }

    #[test]
    fn test_global_config_deserialize_full() {
        let toml_str = r#"
[transport]
site = "https://chat.example.org"
bot_email = "bot@chat.example.org"
api_key_env = "MY_KEY"
escalation_recipient = "ni@chat.example.org"

[dispatcher]
workers = 2
queue_capacity = 64

[session]
backend = "memory"
idle_timeout_secs = 7200
sweep_interval_secs = 120

[answer]
enabled = true
provider = "ollama"
model = "llama3.1"
base_url = "http://localhost:11434/v1"
timeout_secs = 10
temperature = 0.5

[catalog]
data_dir = "/srv/fhembot/data"

[http]
enabled = true
bind = "0.0.0.0:9000"
webhook_token = "shared-secret"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transport.site, "https://chat.example.org");
        assert_eq!(config.answer.provider, AnswerProviderKind::Ollama);
        assert_eq!(
            config.answer.base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert!((config.answer.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.catalog.data_dir.as_deref(), Some("/srv/fhembot/data"));
        assert!(config.http.enabled);
        assert_eq!(config.http.webhook_token.as_deref(), Some("shared-secret"));
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let config = GlobalConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.dispatcher.workers, config.dispatcher.workers);
        assert_eq!(parsed.answer.model, config.answer.model);
    }
}
