//! Process configuration, read from the environment once at startup.

pub mod db;
pub mod secrets;
pub mod server;

use std::env;

use crate::error::AppError;

/// Required environment variable or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Optional variable parsed as `T`; unset means `default`, unparseable is an error.
pub(crate) fn var_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has an invalid value"))
        }),
        Err(_) => Ok(default),
    }
}
