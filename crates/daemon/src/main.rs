//! Queuedesk - Main Entry Point
//! Runs the queue core under a simulated lobby until Ctrl+C

mod settings;
mod simulation;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use queuedesk_core::application::shutdown_channel;
use queuedesk_core::port::time_provider::SystemTimeProvider;
use queuedesk_core::{QueueManager, SharedQueueManager};
use settings::Settings;
use simulation::Simulation;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() -> Result<()> {
    let log_format =
        std::env::var("QUEUEDESK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("queuedesk=info,queuedesk_core=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    init_logging()?;
    info!("Queuedesk v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::load()?;
    info!(
        counters = settings.queue.counters.len(),
        per_ticket_estimate_minutes = settings.queue.per_ticket_estimate_minutes,
        tick_interval_secs = settings.simulation.tick_interval_secs,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let manager = QueueManager::from_config(&settings.queue, time_provider)
        .context("Invalid queue configuration")?;
    let queue = SharedQueueManager::new(manager);

    // 4. Start simulation
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let simulation = Simulation::new(queue.clone(), settings.simulation.clone());
    let simulation_handle = tokio::spawn(simulation.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), simulation_handle).await;

    let stats = serde_json::to_string(&queue.stats())?;
    info!(stats = %stats, "Final queue statistics");
    info!("Shutdown complete.");

    Ok(())
}
