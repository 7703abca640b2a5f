//! Error codes for the silhouette API.
//!
//! Every code that can appear in a Problem Details body lives here.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the response strings.

use core::fmt;

/// Centralized error codes for the silhouette API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required
    Unauthenticated,
    /// Service credential header missing or not a Bearer token
    MissingServiceCredential,
    /// Service credential failed verification
    InvalidServiceCredential,
    /// Service credential lacks every scope the method requires
    ServiceScopeMismatch,
    /// User credential header missing or not a Bearer token
    MissingUserCredential,
    /// User credential failed signature or structure checks
    InvalidUserCredential,
    /// Credential expiry has passed
    ExpiredCredential,
    /// Credential issued-at lies beyond the allowed clock skew
    PrematureCredential,

    // Authorization
    /// Access denied
    PermissionDenied,
    /// Credential audience does not include this service
    AudienceMismatch,

    // Request Validation
    /// General invalid argument
    InvalidArgument,
    /// Invalid username
    InvalidUsername,
    /// Invalid nickname
    InvalidNickname,
    /// Invalid slug
    InvalidSlug,
    /// Invalid address fields
    InvalidAddress,
    /// Invalid phone fields
    InvalidPhone,
    /// Malformed request body
    BadRequest,

    // Resource Not Found
    /// Profile not found
    ProfileNotFound,
    /// Address not found
    AddressNotFound,
    /// Phone not found
    PhoneNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Profile already exists for the username
    ProfileExists,
    /// General uniqueness conflict
    AlreadyExists,

    // System Errors
    /// No authorization policy declared for the method
    PolicyNotFound,
    /// Field encryption or decryption failed
    CryptoFailure,
    /// Call was cancelled before completion
    Cancelled,
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical string for this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::MissingServiceCredential => "MISSING_SERVICE_CREDENTIAL",
            Self::InvalidServiceCredential => "INVALID_SERVICE_CREDENTIAL",
            Self::ServiceScopeMismatch => "SERVICE_SCOPE_MISMATCH",
            Self::MissingUserCredential => "MISSING_USER_CREDENTIAL",
            Self::InvalidUserCredential => "INVALID_USER_CREDENTIAL",
            Self::ExpiredCredential => "EXPIRED_CREDENTIAL",
            Self::PrematureCredential => "PREMATURE_CREDENTIAL",

            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::AudienceMismatch => "AUDIENCE_MISMATCH",

            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidNickname => "INVALID_NICKNAME",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::BadRequest => "BAD_REQUEST",

            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::PhoneNotFound => "PHONE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::ProfileExists => "PROFILE_EXISTS",
            Self::AlreadyExists => "ALREADY_EXISTS",

            Self::PolicyNotFound => "POLICY_NOT_FOUND",
            Self::CryptoFailure => "CRYPTO_FAILURE",
            Self::Cancelled => "CANCELLED",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
