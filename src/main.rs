mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::scheduler::{reminders, warn_expiry};
use crate::service::message_count;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guildkeeper=info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;

    let (message_count, message_count_worker) = message_count::start_worker(
        db.clone(),
        config.message_count_batch_size,
        Duration::from_secs(config.message_count_flush_seconds),
    );

    let (client, state) = bot::start::init_bot(&config, db.clone(), http_client, message_count).await?;

    // Start reminder scheduler
    let scheduler_db = db.clone();
    let scheduler_http = state.discord_http.clone();
    let scheduler_drafts = state.drafts.clone();
    tokio::spawn(async move {
        if let Err(e) =
            reminders::start_scheduler(scheduler_db, scheduler_http, scheduler_drafts).await
        {
            tracing::error!("Reminder scheduler error: {}", e);
        }
    });

    // Start warning expiry scheduler
    let scheduler_db = db.clone();
    tokio::spawn(async move {
        if let Err(e) = warn_expiry::start_scheduler(scheduler_db).await {
            tracing::error!("Warning expiry scheduler error: {}", e);
        }
    });

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping bot...");
        shard_manager.shutdown_all().await;
    });

    if let Err(e) = bot::start::start_bot(client).await {
        tracing::error!("Discord bot error: {}", e);
    }

    state.repeaters.stop_all();
    state.message_count.flush_pending().await;
    message_count_worker.abort();

    tracing::info!("Bot has shut down cleanly");

    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
