use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ensure_access;
use crate::auth::AuthContext;
use crate::crypto::RecordCrypto;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::protocol::messages::{
    AddressLookupRequest, AddressResponse, CreateAddressRequest, UpdateAddressRequest,
};
use crate::protocol::methods;
use crate::repos::addresses::{self, AddressChanges, NewAddress};
use crate::repos::{profiles, xref};
use crate::validation::{self, AddressPart};

struct AddressFields {
    address_line_1: String,
    address_line_2: Option<String>,
    city: String,
    state: String,
    zip: String,
    country: String,
}

fn validate_fields(
    street_address: &str,
    street_address_2: Option<&str>,
    city: &str,
    state_province: &str,
    postal_code: &str,
    country: &str,
) -> Result<AddressFields, AppError> {
    Ok(AddressFields {
        address_line_1: validation::address_field(
            "street_address",
            AddressPart::Street,
            street_address,
        )?,
        address_line_2: validation::optional_address_field(
            "street_address_2",
            AddressPart::Street,
            street_address_2,
        )?,
        city: validation::address_field("city", AddressPart::City, city)?,
        state: validation::address_field("state_province", AddressPart::State, state_province)?,
        zip: validation::address_field("postal_code", AddressPart::PostalCode, postal_code)?,
        country: validation::address_field("country", AddressPart::Country, country)?,
    })
}

/// Creates the address and links it to the owner's profile.
pub async fn create_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: CreateAddressRequest,
) -> Result<AddressResponse, AppError> {
    ensure_access(auth, methods::CREATE_ADDRESS, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let fields = validate_fields(
        &req.street_address,
        req.street_address_2.as_deref(),
        &req.city,
        &req.state_province,
        &req.postal_code,
        &req.country,
    )?;

    let profile_id = profiles::find_profile_id(conn, crypto, &username).await?;

    let address = addresses::create_address(
        conn,
        crypto,
        cancel,
        NewAddress {
            address_line_1: fields.address_line_1,
            address_line_2: fields.address_line_2,
            city: fields.city,
            state: fields.state,
            zip: fields.zip,
            country: fields.country,
            is_current: req.is_current,
        },
    )
    .await?;
    xref::link_address(conn, &profile_id, &address.id).await?;

    info!(
        slug = %address.slug,
        username = %Redacted(&username),
        "Created address"
    );
    Ok(AddressResponse::from(address))
}

pub async fn get_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: AddressLookupRequest,
) -> Result<AddressResponse, AppError> {
    ensure_access(auth, methods::GET_ADDRESS, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;

    let address = addresses::get_address(conn, crypto, cancel, &slug, Some(&username)).await?;
    Ok(AddressResponse::from(address))
}

/// Full replacement; only fields that differ are re-encrypted.
pub async fn update_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: UpdateAddressRequest,
) -> Result<AddressResponse, AppError> {
    ensure_access(auth, methods::UPDATE_ADDRESS, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;
    let fields = validate_fields(
        &req.street_address,
        req.street_address_2.as_deref(),
        &req.city,
        &req.state_province,
        &req.postal_code,
        &req.country,
    )?;

    let current = addresses::get_address(conn, crypto, cancel, &slug, Some(&username)).await?;

    let changes = AddressChanges {
        address_line_1: (current.address_line_1 != fields.address_line_1)
            .then_some(fields.address_line_1),
        address_line_2: (current.address_line_2 != fields.address_line_2)
            .then_some(fields.address_line_2),
        city: (current.city != fields.city).then_some(fields.city),
        state: (current.state != fields.state).then_some(fields.state),
        zip: (current.zip != fields.zip).then_some(fields.zip),
        country: (current.country != fields.country).then_some(fields.country),
        is_current: (current.is_current != req.is_current).then_some(req.is_current),
    };
    if changes.is_empty() {
        warn!(slug = %slug, "No update necessary, address unchanged");
        return Ok(AddressResponse::from(current));
    }

    let changed = changes.changed_fields();
    let updated = addresses::update_address(conn, crypto, cancel, &current.id, changes).await?;
    info!(
        slug = %slug,
        actor = %Redacted(auth.actor()),
        fields = ?changed,
        "Updated address"
    );
    Ok(AddressResponse::from(updated))
}

/// Unlinks the address from every profile, then deletes it.
pub async fn delete_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    auth: &AuthContext,
    req: AddressLookupRequest,
) -> Result<(), AppError> {
    ensure_access(auth, methods::DELETE_ADDRESS, req.username.trim())?;
    let username = validation::username(&req.username)?;
    let slug = validation::slug(&req.slug)?;

    let address = addresses::get_address(conn, crypto, cancel, &slug, Some(&username)).await?;
    xref::unlink_address(conn, &address.id).await?;
    addresses::delete_address(conn, &address.id).await?;

    info!(
        slug = %slug,
        actor = %Redacted(auth.actor()),
        "Deleted address"
    );
    Ok(())
}
