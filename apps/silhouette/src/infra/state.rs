use sea_orm::DatabaseConnection;

use crate::config::db::DbSettings;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

enum DbSource {
    Settings(DbSettings),
    Connection(DatabaseConnection),
}

/// Assembles `AppState` for `main` and for tests.
pub struct StateBuilder {
    security: SecurityConfig,
    db: Option<DbSource>,
}

impl StateBuilder {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security, db: None }
    }

    pub fn with_db(mut self, settings: DbSettings) -> Self {
        self.db = Some(DbSource::Settings(settings));
        self
    }

    /// Uses an already open connection as is.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.db = Some(DbSource::Connection(conn));
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let conn = match self.db {
            Some(DbSource::Settings(settings)) => bootstrap_db(&settings).await?,
            Some(DbSource::Connection(conn)) => conn,
            None => return Err(AppError::config("no database configured for state")),
        };
        Ok(AppState::new(conn, self.security))
    }
}

pub fn build_state(security: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security)
}
