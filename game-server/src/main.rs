use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_core::WordBank;
use game_persistence::{GameRepository, GameStore, InMemoryGameStore, connect_and_migrate};
use game_server::{
    ai::LlmProvider,
    config::{Config, StorageBackend},
    create_routes,
    game_manager::GameManager,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Spymaster Arena server...");

    let config = Config::from_env().context("invalid configuration")?;

    let word_bank = match &config.words_file {
        Some(path) => {
            info!("Loading words from {}", path);
            WordBank::from_file(path)?
        }
        None => WordBank::default(),
    };
    info!("Word bank holds {} words", word_bank.len());

    let store: Arc<dyn GameStore> = match &config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory game store");
            Arc::new(InMemoryGameStore::new())
        }
        StorageBackend::Sqlite(url) => {
            // Initialize database connection and run migrations
            let db = connect_and_migrate(url)
                .await
                .with_context(|| format!("failed to open database {url}"))?;
            Arc::new(GameRepository::new(db))
        }
    };

    let llm_provider = Arc::new(LlmProvider::new(&config));
    let game_manager = Arc::new(GameManager::new(
        &config,
        store,
        word_bank,
        llm_provider.clone(),
        llm_provider.clone(),
    ));

    let routes = create_routes(game_manager, llm_provider);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("invalid HOST {}", config.host))?,
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let sigint = signal::unix::signal(signal::unix::SignalKind::interrupt());
        let sigterm = signal::unix::signal(signal::unix::SignalKind::terminate());

        match (sigint, sigterm) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                let _ = signal::ctrl_c().await;
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
