// Quote Droplet - daily quote notifications
// Entry point: schedule the notification window and deliver until stopped

use quote_droplet::app::AppState;
use quote_droplet::config::DELIVERY_POLL_INTERVAL;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quote_droplet=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quote Droplet");

    let state = AppState::setup_from_env().await?;

    let saved = state.config_service.load().await;
    tracing::info!(
        "Last saved notification settings: {} ({})",
        saved.time_of_day,
        saved.category
    );

    // Fresh launches always start from the built-in defaults
    let report = state.scheduler.schedule_notifications().wait().await?;
    tracing::info!(
        "Startup schedule: {} notifications, {} days without a quote",
        report.submitted,
        report.skipped_days
    );

    let delivery = state
        .notification_center
        .clone()
        .start_delivery(DELIVERY_POLL_INTERVAL);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    delivery.abort();

    Ok(())
}
