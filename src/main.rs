//! Media Dashboard - Rust Implementation
//!
//! A self-hosted HTPC dashboard aggregating media-management services.

use media_dashboard::{api, client, config, dashboard, images, settings, widgets};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Media Dashboard v{} ({})",
        env!("MDASH_VERSION"),
        env!("MDASH_GIT_SHA")
    );

    // Load configuration
    let config = Arc::new(config::load_config()?);
    tracing::info!(
        "Configuration loaded, port: {}, webdir: {}, backend: {}",
        config.port,
        config.webdir,
        config.backend
    );

    let client = client::ServiceClient::new(config.clone())?;

    // Unknown widget ids stop startup here
    let dashboard = dashboard::Dashboard::new(
        config.clone(),
        client.clone(),
        widgets::LoaderRegistry::standard(),
    )?;

    let data_dir = config::get_data_dir();
    let settings = settings::DashSettingsStore::new(data_dir.clone(), config.dash_order.clone());
    tracing::info!("Dashboard settings in {}", data_dir.display());

    let images = images::ImageCache::new(data_dir, client.clone(), config.image_cache);
    if !config.image_cache {
        tracing::info!("Image cache disabled, artwork is proxied without storing");
    }

    let state = api::AppState::new(config.clone(), client, dashboard, settings, images);
    let app = api::router(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}{}", addr, config.webdir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
