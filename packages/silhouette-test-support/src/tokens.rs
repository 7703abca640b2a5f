//! HS256 credential minting for tests.
//!
//! Claims are shaped the way the directory expects them: `sub`, `aud`
//! as a list, space-separated `scp`, and integer `iat`/`exp`.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use time::OffsetDateTime;

pub const SERVICE_SECRET: &[u8] = b"test-service-credential-secret-0123456789";
pub const USER_SECRET: &[u8] = b"test-user-credential-secret-0123456789ab";
pub const AUDIENCE: &str = "silhouette";

#[derive(Debug, Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    aud: Vec<&'a str>,
    scp: String,
    iat: i64,
    exp: i64,
}

/// Builder for one signed credential.
#[derive(Debug, Clone)]
pub struct TokenSpec {
    subject: String,
    audience: Vec<String>,
    scopes: Vec<String>,
    issued_offset: i64,
    ttl: i64,
}

impl TokenSpec {
    /// Valid for an hour, issued now, for the `silhouette` audience.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            audience: vec![AUDIENCE.to_string()],
            scopes: Vec::new(),
            issued_offset: 0,
            ttl: 3600,
        }
    }

    pub fn scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn audience(mut self, audience: &[&str]) -> Self {
        self.audience = audience.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Issued an hour ago, expired a minute ago.
    pub fn expired(mut self) -> Self {
        self.issued_offset = -3600;
        self.ttl = 3540;
        self
    }

    /// Issued `secs` from now.
    pub fn issued_in(mut self, secs: i64) -> Self {
        self.issued_offset = secs;
        self
    }

    pub fn sign(&self, secret: &[u8]) -> String {
        let iat = OffsetDateTime::now_utc().unix_timestamp() + self.issued_offset;
        let claims = TestClaims {
            sub: &self.subject,
            aud: self.audience.iter().map(String::as_str).collect(),
            scp: self.scopes.join(" "),
            iat,
            exp: iat + self.ttl,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
            .expect("signing a test credential")
    }
}

/// Service credential holding `scopes`, signed with [`SERVICE_SECRET`].
pub fn service_token(scopes: &[&str]) -> String {
    TokenSpec::new("gateway").scopes(scopes).sign(SERVICE_SECRET)
}

/// User credential for `username` holding `scopes`, signed with [`USER_SECRET`].
pub fn user_token(username: &str, scopes: &[&str]) -> String {
    TokenSpec::new(username).scopes(scopes).sign(USER_SECRET)
}

/// `Bearer <token>`
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
