//! The serve runtime: long-poll ingestion, dispatch lanes, the idle
//! sweeper and the optional HTTP surface, with coordinated shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use fhembot_core::dispatch::Dispatcher;
use fhembot_core::session::sweeper::spawn_sweeper;
use fhembot_infra::zulip::run_event_loop;

use crate::http::{self, HttpState};
use crate::state::AppState;

/// Run the assistant until the event loop fails or a shutdown signal
/// arrives, then drain everything in order.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // Bind early so a bad address fails before any task is spawned.
    let http_listener = if state.config.http.enabled {
        let listener = tokio::net::TcpListener::bind(&state.config.http.bind).await?;
        if state.config.http.webhook_token.is_none() {
            warn!("no webhook token configured, accepting unauthenticated posts");
        }
        println!(
            "  {} Webhook endpoint on {}",
            console::style("🌐").bold(),
            console::style(format!("http://{}", state.config.http.bind)).cyan()
        );
        Some(listener)
    } else {
        None
    };

    let dispatcher = Arc::new(Dispatcher::spawn(
        Arc::clone(&state.engine),
        Arc::clone(&state.store),
        Arc::clone(&state.client),
        &state.config.dispatcher,
    ));

    let sweeper = spawn_sweeper(
        Arc::clone(&state.store),
        Duration::from_secs(state.config.session.idle_timeout_secs),
        Duration::from_secs(state.config.session.sweep_interval_secs),
        cancel.clone(),
    );

    let http_task = http_listener.map(|listener| {
        let router = http::build_router(HttpState {
            dispatcher: Arc::clone(&dispatcher),
            bot_email: state.config.transport.bot_email.clone(),
            webhook_token: state.config.http.webhook_token.clone(),
        });
        let http_cancel = cancel.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { http_cancel.cancelled().await })
                .await
        })
    });

    println!(
        "  {} Fhembot listening at {}",
        console::style("⚡").bold(),
        console::style(&state.config.transport.site).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let result = tokio::select! {
        result = run_event_loop(&state.client, &dispatcher, cancel.clone()) => result,
        () = shutdown_signal() => Ok(()),
    };

    // Stop intake first, then drain what is already queued.
    cancel.cancel();
    if let Some(task) = http_task {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "HTTP server terminated with an error"),
            Err(e) => warn!(error = %e, "HTTP server task panicked"),
        }
    }
    if let Err(e) = sweeper.await {
        warn!(error = %e, "sweeper task panicked");
    }
    match Arc::into_inner(dispatcher) {
        Some(dispatcher) => dispatcher.shutdown().await,
        None => warn!("dispatcher still referenced at shutdown, skipping drain"),
    }

    println!("\n  Server stopped.");
    result?;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
