use crate::config::var_or;
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8443;

/// Listen address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: var_or("SILHOUETTE_HOST", DEFAULT_HOST.to_string())?,
            port: var_or("SILHOUETTE_PORT", DEFAULT_PORT)?,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
