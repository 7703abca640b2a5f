use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Boundary error for every handler. Each variant is one of the result
/// categories collaborators see; `code` narrows the reason.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {detail}")]
    Unauthenticated { code: ErrorCode, detail: String },
    #[error("Permission denied: {detail}")]
    PermissionDenied { code: ErrorCode, detail: String },
    #[error("Invalid argument: {detail}")]
    InvalidArgument { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Already exists: {detail}")]
    AlreadyExists { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthenticated { code, .. }
            | AppError::PermissionDenied { code, .. }
            | AppError::InvalidArgument { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::AlreadyExists { code, .. }
            | AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Unauthenticated { detail, .. }
            | AppError::PermissionDenied { detail, .. }
            | AppError::InvalidArgument { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::AlreadyExists { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn unauthenticated(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Unauthenticated {
            code,
            detail: detail.into(),
        }
    }

    pub fn permission_denied(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::PermissionDenied {
            code,
            detail: detail.into(),
        }
    }

    /// Generic access-denied error; callers never learn which check failed.
    pub fn access_denied() -> Self {
        Self::permission_denied(ErrorCode::PermissionDenied, "access denied")
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::invalid(ErrorCode::BadRequest, detail)
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn already_exists(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::AlreadyExists {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::invalid(ErrorCode::InvalidArgument, detail),
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::ProfileExists => ErrorCode::ProfileExists,
                    _ => ErrorCode::AlreadyExists,
                };
                AppError::already_exists(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Profile => ErrorCode::ProfileNotFound,
                    NotFoundKind::Address => ErrorCode::AddressNotFound,
                    NotFoundKind::Phone => ErrorCode::PhoneNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(kind, detail) => {
                let code = match kind {
                    InfraErrorKind::Timeout => ErrorCode::DbTimeout,
                    InfraErrorKind::DbUnavailable => ErrorCode::DbUnavailable,
                    InfraErrorKind::Crypto => ErrorCode::CryptoFailure,
                    InfraErrorKind::Cancelled => ErrorCode::Cancelled,
                    _ => ErrorCode::DbError,
                };
                AppError::internal(code, detail)
            }
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://silhouette.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
