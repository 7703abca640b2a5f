//! Redaction helpers for values that may carry personal data.
//!
//! Usernames are email addresses, so every log field that can hold one goes
//! through [`Redacted`]. Token-shaped runs (credentials, blind indexes,
//! ciphertext) are masked as well.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

// base64 and hex runs of 16+ chars; uuids stay readable since no segment reaches 16
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z0-9+/_]{16,}={0,2}").unwrap()
});

/// Masks emails (first char of the local part kept) and opaque tokens.
pub fn redact(input: &str) -> String {
    let emails = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let m = &caps[0];
        match m.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => m.to_string(),
        }
    });

    TOKEN.replace_all(&emails, "[REDACTED_TOKEN]").into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
