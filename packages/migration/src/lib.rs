pub use sea_orm_migration::prelude::*;
pub use sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20251016_000001_directory; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251016_000001_directory::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Run `command` against an open connection. Used by the CLI, by
/// `StateBuilder` on boot and by tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let before = count_applied_migrations(db).await?;
    tracing::info!(
        ?command,
        ?backend,
        defined = Migrator::migrations().len(),
        applied = before,
        "running migration command"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            let after = count_applied_migrations(db).await?;
            tracing::info!(?command, applied = after, "migration command finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!(?command, error = %e, "migration command failed");
            Err(e)
        }
    }
}

/// Number of applied migrations; 0 if the tracking table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}
