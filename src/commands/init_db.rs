use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::db::Database;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let database = Database::connect(&config.postgresql)
        .await
        .context("failed to connect to PostgreSQL")?;

    database
        .create_schema()
        .await
        .context("failed to create schema")?;
    info!("database schema is ready");

    Ok(())
}
