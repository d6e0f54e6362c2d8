// src/database.rs
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

/// Opens the connection pool and brings the schema up to date.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;
    let host = options.get_host().to_string();
    let port = options.get_port();
    let database = options.get_database().unwrap_or_default().to_string();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(%host, port, %database, "Database ready");

    Ok(pool)
}
