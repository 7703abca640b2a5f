use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ensure_access;
use crate::auth::AuthContext;
use crate::crypto::RecordCrypto;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::protocol::messages::{
    CreateProfileRequest, GetProfileRequest, ProfileResponse, UpdateProfileRequest,
};
use crate::protocol::methods;
use crate::repos::profiles::{self, NewProfile, ProfileChanges};
use crate::validation;

pub async fn create_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: CreateProfileRequest,
) -> Result<ProfileResponse, AppError> {
    ensure_access(auth, methods::CREATE_PROFILE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let nickname = validation::nickname(req.nickname.as_deref())?;

    if profiles::profile_exists(conn, crypto, &username).await? {
        warn!(username = %Redacted(&username), "Profile already exists");
        return Err(AppError::already_exists(
            ErrorCode::ProfileExists,
            "profile already exists for this username",
        ));
    }

    let profile = profiles::create_profile(
        conn,
        crypto,
        cancel,
        NewProfile {
            username,
            nickname,
            dark_mode: req.dark_mode.unwrap_or(true),
        },
    )
    .await?;

    info!(
        username = %Redacted(&profile.username),
        actor = %Redacted(auth.actor()),
        "Created profile"
    );
    Ok(ProfileResponse::from(profile))
}

/// The profile with every linked address and phone.
pub async fn get_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: GetProfileRequest,
) -> Result<ProfileResponse, AppError> {
    ensure_access(auth, methods::GET_PROFILE, req.username.trim())?;
    let username = validation::username(&req.username)?;

    let complete = profiles::get_complete_profile(conn, crypto, cancel, &username).await?;
    Ok(ProfileResponse::from(complete))
}

/// Unchanged input is a no-op returning the current record.
pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: UpdateProfileRequest,
) -> Result<ProfileResponse, AppError> {
    ensure_access(auth, methods::UPDATE_PROFILE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let nickname = validation::nickname(req.nickname.as_deref())?;

    let current = profiles::get_profile(conn, crypto, cancel, &username).await?;

    let changes = ProfileChanges {
        nickname: (current.nickname != nickname).then_some(nickname),
        dark_mode: (current.dark_mode != req.dark_mode).then_some(req.dark_mode),
    };
    if changes.is_empty() {
        warn!(
            username = %Redacted(&username),
            "No update necessary, profile unchanged"
        );
        return Ok(ProfileResponse::from(current));
    }

    let fields = changes.changed_fields();
    let updated = profiles::update_profile(conn, crypto, cancel, &current.id, changes).await?;
    info!(
        username = %Redacted(&username),
        actor = %Redacted(auth.actor()),
        ?fields,
        "Updated profile"
    );
    Ok(ProfileResponse::from(updated))
}
