// Unit tests for DomainError -> AppError mapping, no HTTP or database involved
use crate::crypto::CryptoError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("bad field").into();
    assert_eq!(app.code(), ErrorCode::InvalidArgument);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::ProfileExists, "exists").into();
    assert_eq!(app.code().as_str(), "PROFILE_EXISTS");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("Unique".into()), "dup").into();
    assert_eq!(app.code().as_str(), "ALREADY_EXISTS");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Phone, "no phone").into();
    assert_eq!(app.code().as_str(), "PHONE_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError =
        DomainError::not_found(NotFoundKind::Other("Record".into()), "gone").into();
    assert_eq!(app.code().as_str(), "NOT_FOUND");
}

#[test]
fn maps_infra_to_internal() {
    for kind in [
        InfraErrorKind::Timeout,
        InfraErrorKind::DbUnavailable,
        InfraErrorKind::Crypto,
        InfraErrorKind::Cancelled,
    ] {
        let app: AppError = DomainError::infra(kind, "boom").into();
        assert_eq!(app.status().as_u16(), 500);
        assert!(matches!(app, AppError::Internal { .. }));
    }
}

#[test]
fn crypto_errors_surface_as_crypto_failure() {
    let de: DomainError = CryptoError::EmptyIndexInput.into();
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::CryptoFailure);

    let de: DomainError = CryptoError::Cancelled.into();
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::Cancelled);
}
