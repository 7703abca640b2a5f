use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::AuthInterceptor;
use crate::crypto::RecordCrypto;

/// Shared by every worker: the connection pool plus read-only key
/// material. Debug output never shows secrets.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub crypto: RecordCrypto,
    pub auth: AuthInterceptor,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db,
            crypto: security.crypto,
            auth: security.auth,
        }
    }
}
