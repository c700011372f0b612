use std::sync::Arc;

use anyhow::{Context, Result};
use kanboard::api::{self, AppState};
use kanboard::board::BoardService;
use kanboard::chat::{ChatService, OpenAiProvider};
use kanboard::config::Config;
use kanboard::logger;
use kanboard::storage::LocalStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    let storage = Arc::new(LocalStorage::new(&config.database).await?);
    let board = BoardService::new(storage);

    if std::env::args().skip(1).any(|arg| arg == "--seed") {
        if board.seed_demo_board().await? {
            println!("Data inserted successfully!");
        } else {
            println!("Board already has columns, nothing inserted.");
        }
        return Ok(());
    }

    let api_key = config.chat.api_key().unwrap_or_else(|| {
        log::warn!(
            "{} is not set; chat requests will be rejected by the provider",
            config.chat.api_key_env
        );
        String::new()
    });
    let provider = Arc::new(OpenAiProvider::new(api_key, &config.chat));
    let chat = ChatService::new(provider, config.chat.clone());

    let app = api::router(AppState::new(board, chat), &config.server.api_prefix);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    log::info!("Listening on http://{} (prefix {})", address, config.server.api_prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
