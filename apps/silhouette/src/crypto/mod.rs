//! Field-level confidentiality for stored records.
//!
//! Two primitives back every sensitive column:
//! - [`BlindIndexer`]: deterministic HMAC-SHA256 token for equality lookups.
//! - [`FieldCryptor`]: AES-256-GCM with a fresh nonce per value.
//!
//! [`transform_fields`] runs one of them over every field of a record
//! concurrently and either returns all outputs or one aggregated error.

pub mod blind_index;
pub mod fanout;
pub mod field;
pub mod record;

use std::fmt;

use thiserror::Error;

pub use blind_index::BlindIndexer;
pub use fanout::{transform_fields, FieldInput, FieldOutputs};
pub use field::FieldCryptor;
pub use record::RecordCrypto;

/// Direction of a record-level transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Encrypt,
    Decrypt,
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOp::Encrypt => f.write_str("encryption"),
            FieldOp::Decrypt => f.write_str("decryption"),
        }
    }
}

/// Failure of a single field. Never carries the field's value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("mandatory field is absent")]
    Missing,
    #[error("encryption failed")]
    Seal,
    #[error("ciphertext is not valid base64")]
    Encoding,
    #[error("ciphertext is too short to hold a nonce")]
    Truncated,
    #[error("authentication failed (tampered or wrong key)")]
    Open,
    #[error("decrypted bytes are not utf-8")]
    Utf8,
    #[error("transform task did not complete")]
    Aborted,
}

/// One named field that failed inside a record-level transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub error: FieldError,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid key material: {0}")]
    InvalidKey(&'static str),
    #[error("blind index input is empty")]
    EmptyIndexInput,
    #[error("{op} failed for {}", join_failures(.failures))]
    Record {
        op: FieldOp,
        failures: Vec<FieldFailure>,
    },
    #[error("no transformed output for field {0}")]
    MissingOutput(&'static str),
    #[error("field transformation cancelled")]
    Cancelled,
}

impl CryptoError {
    /// Names of every failing field, if this is a record failure.
    pub fn failed_fields(&self) -> Vec<&'static str> {
        match self {
            CryptoError::Record { failures, .. } => failures.iter().map(|f| f.field).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
