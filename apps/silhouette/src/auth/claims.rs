use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_with::formats::{PreferMany, SpaceSeparator};
use serde_with::{serde_as, OneOrMany, StringWithSeparator};

/// Verified contents of a service or user credential.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity; for user credentials this is the username.
    pub sub: String,
    /// Services this credential was issued for.
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub aud: Vec<String>,
    /// Space-separated on the wire (`"r:silhouette:* w:silhouette:phone:*"`).
    #[serde_as(as = "StringWithSeparator::<SpaceSeparator, String>")]
    #[serde(rename = "scp", default)]
    pub scopes: BTreeSet<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn has_audience(&self, audience: &str) -> bool {
        self.aud.iter().any(|a| a == audience)
    }

    /// OR semantics: true when any required scope is held.
    pub fn has_any_scope<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().any(|s| self.scopes.contains(s.as_ref()))
    }
}
