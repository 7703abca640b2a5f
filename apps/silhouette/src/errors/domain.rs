//! Errors raised below the HTTP boundary.
//!
//! Repos and the crypto layer speak `DomainError`; `AppError` is built from
//! it in one place (`From<DomainError> for AppError`). Nothing here knows
//! about status codes or sea-orm.

use thiserror::Error;

use crate::crypto::CryptoError;

/// Operational failures that are not the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    /// Sealing, opening or indexing a field failed.
    Crypto,
    /// The caller went away while field work was in flight.
    Cancelled,
    Other(String),
}

/// Which directory record a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Profile,
    Address,
    Phone,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A profile already sits at the username's blind index.
    ProfileExists,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl From<CryptoError> for DomainError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Cancelled => Self::infra(InfraErrorKind::Cancelled, e.to_string()),
            // Display lists failing field names, never their values.
            other => Self::infra(InfraErrorKind::Crypto, other.to_string()),
        }
    }
}
