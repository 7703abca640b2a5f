#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Silhouette: an authenticated directory of user profiles, postal
//! addresses and phone numbers. Every personal field is sealed with
//! AES-256-GCM at rest and looked up through keyed blind indexes.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod protocol;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;
pub mod validation;

#[cfg(test)]
pub mod test_bootstrap;

pub use auth::{AuthContext, AuthInterceptor, AuthPolicy, PolicyTable, TokenVerifier};
pub use config::db::DbSettings;
pub use config::server::ServerConfig;
pub use crypto::RecordCrypto;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::db::connect_db;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{AuthGate, RequestTrace, StructuredLogger, TraceSpan};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
