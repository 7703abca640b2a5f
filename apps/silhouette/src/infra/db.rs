use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::DbSettings;
use crate::error::AppError;

/// Opens the pool. Does not run migrations.
pub async fn connect_db(settings: &DbSettings) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(settings.url.clone());
    opts.max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Ok(Database::connect(opts).await?)
}

/// Connects and, when enabled, applies pending migrations.
pub async fn bootstrap_db(settings: &DbSettings) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(settings).await?;
    if settings.migrate_on_boot {
        info!("Applying pending migrations");
        migrate(&conn, MigrationCommand::Up).await?;
    }
    Ok(conn)
}
