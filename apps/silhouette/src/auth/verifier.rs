use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::claims::Claims;

/// Allowance for issuer clocks running ahead of ours.
pub const CLOCK_SKEW_SECS: i64 = 2;

/// Which class of credential a verifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Service,
    User,
}

impl CredentialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CredentialKind::Service => "service",
            CredentialKind::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("credential is malformed")]
    Malformed,
    #[error("credential signature is invalid")]
    BadSignature,
    #[error("credential expired at {exp}")]
    Expired { exp: i64 },
    #[error("credential issued-at {iat} is in the future")]
    Premature { iat: i64 },
    #[error("credential audience does not include {audience}")]
    Audience { audience: String },
}

/// Signature and claim checks for one credential class.
///
/// Time checks take `now` explicitly; jsonwebtoken only verifies the
/// signature and structure.
#[derive(Clone)]
pub struct TokenVerifier {
    kind: CredentialKind,
    key: DecodingKey,
    validation: Validation,
    audience: String,
}

impl TokenVerifier {
    /// ES256 verifier from a PEM-encoded P-256 public key.
    pub fn from_ec_pem(
        kind: CredentialKind,
        pem: &[u8],
        audience: impl Into<String>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_ec_pem(pem)?;
        Ok(Self::with_key(kind, key, Algorithm::ES256, audience.into()))
    }

    /// HS256 verifier from a shared secret.
    pub fn from_secret(kind: CredentialKind, secret: &[u8], audience: impl Into<String>) -> Self {
        Self::with_key(
            kind,
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            audience.into(),
        )
    }

    fn with_key(kind: CredentialKind, key: DecodingKey, alg: Algorithm, audience: String) -> Self {
        let mut validation = Validation::new(alg);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        Self {
            kind,
            key,
            validation,
            audience,
        }
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Verifies signature, expiry, issued-at skew and audience, in that order.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, VerifyError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::BadSignature,
                _ => VerifyError::Malformed,
            })?;

        if now > claims.exp {
            return Err(VerifyError::Expired { exp: claims.exp });
        }
        if claims.iat > now + CLOCK_SKEW_SECS {
            return Err(VerifyError::Premature { iat: claims.iat });
        }
        if !claims.has_audience(&self.audience) {
            return Err(VerifyError::Audience {
                audience: self.audience.clone(),
            });
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("kind", &self.kind)
            .field("algorithms", &self.validation.algorithms)
            .field("audience", &self.audience)
            .finish()
    }
}
