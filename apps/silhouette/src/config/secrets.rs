//! Key material: the blind index secret, the field key and the two
//! token verifying keys. All values arrive base64-encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::auth::{CredentialKind, TokenVerifier};
use crate::config::{must_var, var_or};
use crate::crypto::{BlindIndexer, FieldCryptor, RecordCrypto};
use crate::error::AppError;

pub const DEFAULT_SERVICE_NAME: &str = "silhouette";

fn decode_var(name: &str) -> Result<Zeroizing<Vec<u8>>, AppError> {
    let raw = Zeroizing::new(must_var(name)?);
    STANDARD
        .decode(raw.trim())
        .map(Zeroizing::new)
        .map_err(|_| AppError::config(format!("Environment variable '{name}' is not valid base64")))
}

/// Index secret and field key from `SILHOUETTE_INDEX_SECRET` and
/// `SILHOUETTE_FIELD_KEY`.
pub fn record_crypto_from_env() -> Result<RecordCrypto, AppError> {
    let secret = decode_var("SILHOUETTE_INDEX_SECRET")?;
    let indexer = BlindIndexer::new(secret.as_slice())
        .map_err(|e| AppError::config(format!("SILHOUETTE_INDEX_SECRET: {e}")))?;

    let key = decode_var("SILHOUETTE_FIELD_KEY")?;
    let cryptor = FieldCryptor::new(&key)
        .map_err(|e| AppError::config(format!("SILHOUETTE_FIELD_KEY: {e}")))?;

    Ok(RecordCrypto::new(indexer, cryptor))
}

/// Audience identity user tokens must name.
pub fn service_name_from_env() -> Result<String, AppError> {
    var_or("SILHOUETTE_SERVICE_NAME", DEFAULT_SERVICE_NAME.to_string())
}

/// ES256 verifiers for service and user tokens.
pub fn verifiers_from_env(audience: &str) -> Result<(TokenVerifier, TokenVerifier), AppError> {
    let verifier = |var: &str, kind: CredentialKind| -> Result<TokenVerifier, AppError> {
        let pem = decode_var(var)?;
        TokenVerifier::from_ec_pem(kind, &pem, audience)
            .map_err(|e| AppError::config(format!("{var}: not an EC public key ({e})")))
    };
    Ok((
        verifier("SILHOUETTE_S2S_VERIFYING_KEY", CredentialKind::Service)?,
        verifier("SILHOUETTE_USER_VERIFYING_KEY", CredentialKind::User)?,
    ))
}
