use crate::auth::AuthInterceptor;
use crate::config::secrets;
use crate::crypto::RecordCrypto;
use crate::error::AppError;
use crate::protocol;

/// Long-lived key material: the record crypto and the auth interceptor
/// with its verifying keys and policy table. Read-only after startup.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub crypto: RecordCrypto,
    pub auth: AuthInterceptor,
}

impl SecurityConfig {
    pub fn new(crypto: RecordCrypto, auth: AuthInterceptor) -> Self {
        Self { crypto, auth }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let crypto = secrets::record_crypto_from_env()?;
        let audience = secrets::service_name_from_env()?;
        let (service, user) = secrets::verifiers_from_env(&audience)?;
        let policies = protocol::policy_table()
            .map_err(|e| AppError::config(format!("invalid policy declarations: {e}")))?;

        Ok(Self::new(crypto, AuthInterceptor::new(policies, service, user)))
    }
}
