//! Main entry point for the Storyboard Gateway

use std::sync::Arc;
use std::time::Duration;
use storyboard_gateway::{api, config::Settings, storage::RetentionSweeper, AppState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration before logging so the configured level applies
    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    }

    info!("Starting Storyboard Gateway");
    info!(
        "Loaded configuration: server={}:{} storage={}",
        settings.server.host, settings.server.port, settings.storage.base_path
    );

    let app_state = Arc::new(AppState::from_settings(settings.clone())?);
    app_state.storyboard.workspaces().ensure_root().await?;

    // Workspaces are kept forever unless a retention age is configured
    let sweeper = if settings.retention.max_age_secs > 0 {
        let sweeper = RetentionSweeper::new(
            &settings.storage.base_path,
            Duration::from_secs(settings.retention.max_age_secs),
        );
        sweeper.start(settings.retention.sweep_interval_secs).await;
        Some(sweeper)
    } else {
        None
    };

    let app = api::create_router(app_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.stop().await;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
