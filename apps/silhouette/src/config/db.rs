use crate::config::{must_var, var_or};
use crate::error::AppError;

/// Connection settings for the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub url: String,
    pub max_connections: u32,
    /// Apply pending migrations before serving.
    pub migrate_on_boot: bool,
}

impl DbSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            migrate_on_boot: false,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let url = must_var("DATABASE_URL")?;
        if !(url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("sqlite:"))
        {
            return Err(AppError::config(
                "DATABASE_URL must be a postgres or sqlite connection url",
            ));
        }
        Ok(Self {
            url,
            max_connections: var_or("SILHOUETTE_DB_MAX_CONNECTIONS", 10)?,
            migrate_on_boot: var_or("SILHOUETTE_MIGRATE_ON_BOOT", false)?,
        })
    }
}
