//! Application state wiring the engine, store and transport together.
//!
//! The core types are generic over store/sink/provider traits; AppState
//! pins them to the concrete infra implementations selected by
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use fhembot_core::dialogue::engine::DialogueEngine;
use fhembot_core::handlers::assistant::AssistantHandler;
use fhembot_infra::answer::{self, OpenAiCompatibleProvider};
use fhembot_infra::catalog::load_catalog;
use fhembot_infra::config::{load_config_file, load_global_config};
use fhembot_infra::session::SessionBackend;
use fhembot_infra::zulip::ZulipClient;
use fhembot_types::config::GlobalConfig;

/// The dialogue engine pinned to the OpenAI-compatible answer provider.
pub type ConcreteEngine = DialogueEngine<OpenAiCompatibleProvider>;

/// Shared application state for the serve runtime.
#[derive(Clone)]
pub struct AppState {
    pub config: GlobalConfig,
    pub store: Arc<SessionBackend>,
    pub client: Arc<ZulipClient>,
    pub engine: Arc<ConcreteEngine>,
}

impl AppState {
    /// Initialize the application state: load config and catalogs, open the
    /// session store, build the transport client and the dialogue engine.
    pub async fn init(config_path: Option<&Path>, data_dir: PathBuf) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = match config_path {
            Some(path) => load_config_file(path).await,
            None => load_global_config(&data_dir).await,
        };

        let catalog = Arc::new(load_catalog(&catalog_dir(&config, &data_dir)).await);

        let store = SessionBackend::from_config(&config.session, &data_dir).await?;

        // Credentials come from the environment, never from the config file.
        let api_key = std::env::var(&config.transport.api_key_env).with_context(|| {
            format!(
                "chat platform API key not found in ${}",
                config.transport.api_key_env
            )
        })?;
        let client = ZulipClient::new(
            &config.transport.site,
            &config.transport.bot_email,
            SecretString::from(api_key),
        );

        let assistant = match answer::build_provider(&config.answer) {
            Some(provider) => {
                AssistantHandler::new(provider, Duration::from_secs(config.answer.timeout_secs))
            }
            None => AssistantHandler::disabled(),
        };

        let engine = DialogueEngine::new(
            catalog,
            &config.transport.escalation_recipient,
            assistant,
        );

        Ok(Self {
            config,
            store: Arc::new(store),
            client: Arc::new(client),
            engine: Arc::new(engine),
        })
    }
}

/// The directory holding the catalog JSON files: the configured override,
/// or `data/` under the data dir.
pub fn catalog_dir(config: &GlobalConfig, data_dir: &Path) -> PathBuf {
    config
        .catalog
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("data"))
}
