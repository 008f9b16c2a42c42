//! Global configuration loader and data directory resolution.
//!
//! Reads `fhembot.toml` from the data directory and deserializes it into
//! [`GlobalConfig`]. Falls back to defaults when the file is missing or
//! malformed; a broken config file must never keep the assistant from
//! starting.

use std::path::{Path, PathBuf};

use fhembot_types::config::GlobalConfig;

/// Load configuration from an explicit file path.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config_file(config_path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Load configuration from `{data_dir}/fhembot.toml`.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    load_config_file(&data_dir.join("fhembot.toml")).await
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FHEMBOT_DATA_DIR` environment variable
/// 2. Platform home directory (`~/.fhembot`)
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FHEMBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".fhembot");
    }

    // Last resort: current directory
    PathBuf::from(".fhembot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhembot_types::config::SessionBackendKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.dispatcher.workers, 4);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
    }

    #[tokio::test]
    async fn valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("fhembot.toml"),
            r#"
[dispatcher]
workers = 8

[session]
backend = "sqlite"
idle_timeout_secs = 3600
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.dispatcher.workers, 8);
        assert_eq!(config.session.backend, SessionBackendKind::Sqlite);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        // Untouched sections keep their defaults.
        assert_eq!(config.answer.model, "gpt-4o");
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("fhembot.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.dispatcher.workers, 4);
    }

    #[tokio::test]
    async fn explicit_path_is_honored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alternate.toml");
        tokio::fs::write(&path, "[dispatcher]\nqueue_capacity = 32\n")
            .await
            .unwrap();

        let config = load_config_file(&path).await;
        assert_eq!(config.dispatcher.queue_capacity, 32);
        assert_eq!(config.dispatcher.workers, 4);
    }

    #[test]
    fn data_dir_resolution_order() {
        // Env override and fallback are checked in one test since they share
        // the FHEMBOT_DATA_DIR variable.
        // SAFETY: no other test in this crate touches FHEMBOT_DATA_DIR.
        unsafe { std::env::set_var("FHEMBOT_DATA_DIR", "/tmp/fhembot-test-data") };
        assert_eq!(
            resolve_data_dir(),
            PathBuf::from("/tmp/fhembot-test-data")
        );

        // SAFETY: same variable, same test.
        unsafe { std::env::remove_var("FHEMBOT_DATA_DIR") };
        let fallback = resolve_data_dir();
        assert!(fallback.ends_with(".fhembot"));
    }
}
