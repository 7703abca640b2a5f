use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use silhouette::auth::{AuthInterceptor, CredentialKind, TokenVerifier};
use silhouette::crypto::{BlindIndexer, FieldCryptor, RecordCrypto};
use silhouette::infra::state::build_state;
use silhouette::protocol;
use silhouette::state::app_state::AppState;
use silhouette::state::security_config::SecurityConfig;
use silhouette_test_support::tokens::{AUDIENCE, SERVICE_SECRET, USER_SECRET};

pub const INDEX_SECRET: [u8; 48] = [0x5a; 48];
pub const FIELD_KEY: [u8; 32] = [0x3c; 32];

pub fn test_crypto() -> RecordCrypto {
    RecordCrypto::new(
        BlindIndexer::new(INDEX_SECRET.to_vec()).expect("index secret"),
        FieldCryptor::new(&FIELD_KEY).expect("field key"),
    )
}

/// HS256 verifiers over the shared test secrets and the real policy table.
pub fn test_security() -> SecurityConfig {
    let auth = AuthInterceptor::new(
        protocol::policy_table().expect("policy table"),
        TokenVerifier::from_secret(CredentialKind::Service, SERVICE_SECRET, AUDIENCE),
        TokenVerifier::from_secret(CredentialKind::User, USER_SECRET, AUDIENCE),
    );
    SecurityConfig::new(test_crypto(), auth)
}

/// Fresh in-memory SQLite with the schema applied. A single pooled
/// connection keeps every query on the same database.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await.expect("connect sqlite");
    migrate(&conn, MigrationCommand::Up)
        .await
        .expect("apply migrations");
    conn
}

pub async fn build_test_state() -> AppState {
    build_state(test_security())
        .with_connection(test_db().await)
        .build()
        .await
        .expect("build test state")
}
