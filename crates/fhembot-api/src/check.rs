//! Deploy-time smoke check: validate configuration, catalogs and
//! credentials without touching the network.

use std::path::Path;

use fhembot_infra::catalog::load_catalog;
use fhembot_infra::config::{load_config_file, load_global_config};
use fhembot_types::config::{AnswerProviderKind, SessionBackendKind};

use crate::state::catalog_dir;

/// Print a readiness report and exit non-zero when the deployment cannot
/// serve: an empty units catalog means every conversation would dead-end.
pub async fn run(config_path: Option<&Path>, data_dir: &Path) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => load_config_file(path).await,
        None => load_global_config(data_dir).await,
    };

    let catalog_dir = catalog_dir(&config, data_dir);
    let catalog = load_catalog(&catalog_dir).await;

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };
    let bullet = format!("{}", console::style("•").dim());

    println!();
    println!(
        "  {} Deployment check for {}",
        console::style("🔍").bold(),
        console::style(&config.transport.bot_email).cyan()
    );
    println!();
    println!(
        "  {} Catalog directory: {}",
        check_mark(catalog_dir.is_dir()),
        catalog_dir.display()
    );
    println!(
        "  {} Hospital units: {}",
        check_mark(!catalog.units.is_empty()),
        catalog.units.len()
    );
    println!(
        "  {} Panel indicators: {}",
        check_mark(!catalog.panel_indicators.is_empty()),
        catalog.panel_indicators.len()
    );
    println!(
        "  {} Fhemig em Números indicators: {}",
        check_mark(!catalog.numbers_indicators.is_empty()),
        catalog.numbers_indicators.len()
    );
    println!(
        "  {} SIGH reports: {}",
        check_mark(!catalog.sigh_reports.is_empty()),
        catalog.sigh_reports.len()
    );
    println!(
        "  {} TASY reports: {}",
        check_mark(!catalog.tasy_reports.is_empty()),
        catalog.tasy_reports.len()
    );

    let backend = match config.session.backend {
        SessionBackendKind::Memory => "memory",
        SessionBackendKind::Sqlite => "sqlite",
    };
    println!("  {bullet} Session backend: {backend}");
    println!(
        "  {} Chat API key in ${}",
        check_mark(env_is_set(&config.transport.api_key_env)),
        config.transport.api_key_env
    );

    if config.answer.enabled {
        let (provider, ready) = match config.answer.provider {
            AnswerProviderKind::Openai => ("openai", env_is_set(&config.answer.api_key_env)),
            // Ollama needs no credentials.
            AnswerProviderKind::Ollama => ("ollama", true),
        };
        println!(
            "  {} Answer provider: {provider} ({})",
            check_mark(ready),
            config.answer.model
        );
    } else {
        println!("  {bullet} Answer provider: disabled");
    }
    println!();

    if catalog.units.is_empty() {
        anyhow::bail!("units catalog is empty, nothing to serve");
    }
    Ok(())
}

fn env_is_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !value.is_empty())
}
