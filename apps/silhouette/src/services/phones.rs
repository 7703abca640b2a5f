use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ensure_access;
use crate::auth::AuthContext;
use crate::crypto::RecordCrypto;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::protocol::messages::{
    CreatePhoneRequest, PhoneLookupRequest, PhoneResponse, UpdatePhoneRequest,
};
use crate::protocol::methods;
use crate::repos::phones::{self, NewPhone, PhoneChanges};
use crate::repos::{profiles, xref};
use crate::validation;

struct PhoneFields {
    country_code: Option<String>,
    phone_number: String,
    extension: Option<String>,
    phone_type: String,
}

fn validate_fields(
    country_code: Option<&str>,
    phone_number: &str,
    extension: Option<&str>,
    phone_type: &str,
) -> Result<PhoneFields, AppError> {
    Ok(PhoneFields {
        country_code: validation::country_code(country_code)?,
        phone_number: validation::phone_number(phone_number)?,
        extension: validation::extension(extension)?,
        phone_type: validation::phone_type(phone_type)?,
    })
}

/// Creates the phone and links it to the owner's profile.
pub async fn create_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: CreatePhoneRequest,
) -> Result<PhoneResponse, AppError> {
    ensure_access(auth, methods::CREATE_PHONE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let fields = validate_fields(
        req.country_code.as_deref(),
        &req.phone_number,
        req.extension.as_deref(),
        &req.phone_type,
    )?;

    let profile_id = profiles::find_profile_id(conn, crypto, &username).await?;

    let phone = phones::create_phone(
        conn,
        crypto,
        cancel,
        NewPhone {
            country_code: fields.country_code,
            phone_number: fields.phone_number,
            extension: fields.extension,
            phone_type: fields.phone_type,
            is_current: req.is_current,
        },
    )
    .await?;
    xref::link_phone(conn, &profile_id, &phone.id).await?;

    info!(
        slug = %phone.slug,
        username = %Redacted(&username),
        "Created phone"
    );
    Ok(PhoneResponse::from(phone))
}

pub async fn get_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: PhoneLookupRequest,
) -> Result<PhoneResponse, AppError> {
    ensure_access(auth, methods::GET_PHONE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;

    let phone = phones::get_phone(conn, crypto, cancel, &slug, Some(&username)).await?;
    Ok(PhoneResponse::from(phone))
}

/// Full replacement; only fields that differ are re-encrypted.
pub async fn update_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: UpdatePhoneRequest,
) -> Result<PhoneResponse, AppError> {
    ensure_access(auth, methods::UPDATE_PHONE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;
    let fields = validate_fields(
        req.country_code.as_deref(),
        &req.phone_number,
        req.extension.as_deref(),
        &req.phone_type,
    )?;

    let current = phones::get_phone(conn, crypto, cancel, &slug, Some(&username)).await?;

    let changes = PhoneChanges {
        country_code: (current.country_code != fields.country_code)
            .then_some(fields.country_code),
        phone_number: (current.phone_number != fields.phone_number)
            .then_some(fields.phone_number),
        extension: (current.extension != fields.extension).then_some(fields.extension),
        phone_type: (current.phone_type != fields.phone_type).then_some(fields.phone_type),
        is_current: (current.is_current != req.is_current).then_some(req.is_current),
    };
    if changes.is_empty() {
        warn!(slug = %slug, "No update necessary, phone unchanged");
        return Ok(PhoneResponse::from(current));
    }

    let changed = changes.changed_fields();
    let updated = phones::update_phone(conn, crypto, cancel, &current.id, changes).await?;
    info!(
        slug = %slug,
        actor = %Redacted(auth.actor()),
        fields = ?changed,
        "Updated phone"
    );
    Ok(PhoneResponse::from(updated))
}

/// Unlinks the phone from every profile, then deletes it.
pub async fn delete_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: PhoneLookupRequest,
) -> Result<(), AppError> {
    ensure_access(auth, methods::DELETE_PHONE, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;

    let phone = phones::get_phone(conn, crypto, cancel, &slug, Some(&username)).await?;
    xref::unlink_phone(conn, &phone.id).await?;
    phones::delete_phone(conn, &phone.id).await?;

    info!(
        slug = %slug,
        actor = %Redacted(auth.actor()),
        "Deleted phone"
    );
    Ok(())
}
