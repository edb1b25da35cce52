use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::database::manager;
use crate::router;
use crate::state::AppState;

pub async fn handle(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    info!("Starting film library API in {:?} mode", config.environment);

    let pool = manager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    manager::health_check(&pool).await.context("database is not reachable")?;
    manager::migrate(&pool).await.context("failed to apply migrations")?;

    let app = router::app(AppState::new(&config, pool.clone()));

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Film library API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
