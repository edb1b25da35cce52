use anyhow::Context;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::manager;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = manager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    manager::migrate(&pool).await.context("failed to apply migrations")?;
    pool.close().await;

    output_success(output_format, "Migrations applied", None)
}
