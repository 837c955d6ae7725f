use std::sync::Arc;

use anyhow::Context;

use fittrack_api::app::{build_app, services::AppServices};
use fittrack_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fittrack_observability::init();

    let config = AppConfig::from_env().context("failed to read configuration")?;

    let services = AppServices::from_config(&config.storage)
        .await
        .context("failed to initialise storage")?;
    tracing::info!(backend = services.backend_name(), "storage ready");

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
