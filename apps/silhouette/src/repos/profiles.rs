//! Profile record store (generic over ConnectionTrait).
//!
//! Profiles are located by the blind index of their username; the
//! username and nickname columns only ever hold ciphertext.

use std::collections::HashMap;

use futures::future::{try_join3, try_join_all};
use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::addresses::{open_address, Address};
use super::phones::{open_phone, Phone};
use crate::adapters::profiles_sea as profiles_adapter;
use crate::adapters::profiles_sea::{CompleteProfileRow, ProfileCreate, ProfileUpdate};
use crate::crypto::{CryptoError, FieldInput, RecordCrypto};
use crate::entities::{addresses, phones, profiles};
use crate::errors::domain::{DomainError, NotFoundKind};

const USERNAME: &str = "username";
const NICKNAME: &str = "nickname";

/// Decrypted profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub nickname: Option<String>,
    pub dark_mode: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub username: String,
    pub nickname: Option<String>,
    pub dark_mode: bool,
}

/// Mutated fields only. `nickname: Some(None)` clears the nickname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub nickname: Option<Option<String>>,
    pub dark_mode: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.dark_mode.is_none()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.nickname.is_some() {
            out.push(NICKNAME);
        }
        if self.dark_mode.is_some() {
            out.push("dark_mode");
        }
        out
    }
}

/// A profile with every linked address and phone, each ordered by
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteProfile {
    pub profile: Profile,
    pub addresses: Vec<Address>,
    pub phones: Vec<Phone>,
}

pub async fn create_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    new: NewProfile,
) -> Result<Profile, DomainError> {
    let user_index = crypto.blind_index(&new.username)?;
    let mut sealed = crypto
        .seal(
            vec![
                FieldInput::required(USERNAME, new.username.clone()),
                FieldInput::optional(NICKNAME, new.nickname.clone()),
            ],
            cancel,
        )
        .await?;

    let model = profiles_adapter::insert_profile(
        conn,
        ProfileCreate {
            id: Uuid::new_v4().to_string(),
            username: sealed.take_required(USERNAME)?,
            user_index,
            nickname: sealed.take(NICKNAME),
            dark_mode: new.dark_mode,
        },
    )
    .await?;

    Ok(Profile {
        id: model.id,
        username: new.username,
        nickname: new.nickname.filter(|n| !n.is_empty()),
        dark_mode: model.dark_mode,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Existence check by blind index; nothing is decrypted.
pub async fn profile_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    username: &str,
) -> Result<bool, DomainError> {
    Ok(find_profile_model(conn, crypto, username).await?.is_some())
}

/// Primary key of the profile owning `username`.
pub async fn find_profile_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    username: &str,
) -> Result<String, DomainError> {
    find_profile_model(conn, crypto, username)
        .await?
        .map(|m| m.id)
        .ok_or_else(profile_not_found)
}

pub async fn get_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    username: &str,
) -> Result<Profile, DomainError> {
    let model = find_profile_model(conn, crypto, username)
        .await?
        .ok_or_else(profile_not_found)?;
    Ok(open_profile(crypto, model, cancel).await?)
}

/// Re-encrypts the nickname only when it changed; writes by primary key.
pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    id: &str,
    changes: ProfileChanges,
) -> Result<Profile, DomainError> {
    let mut update = ProfileUpdate::new(id);
    if let Some(nickname) = changes.nickname {
        let mut sealed = crypto
            .seal(vec![FieldInput::optional(NICKNAME, nickname)], cancel)
            .await?;
        update = update.with_nickname(sealed.take(NICKNAME));
    }
    if let Some(dark_mode) = changes.dark_mode {
        update = update.with_dark_mode(dark_mode);
    }

    let model = profiles_adapter::update_profile(conn, update).await?;
    Ok(open_profile(crypto, model, cancel).await?)
}

pub async fn delete_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<(), DomainError> {
    if profiles_adapter::delete_profile(conn, id).await? == 0 {
        return Err(profile_not_found());
    }
    Ok(())
}

/// Profile plus every linked address and phone from one joined query.
///
/// The join yields one row per (address, phone) pair; rows are collapsed
/// by id first so each record is decrypted once. The profile and every
/// unique record decrypt concurrently and any single failure fails the
/// whole call.
pub async fn get_complete_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    username: &str,
) -> Result<CompleteProfile, DomainError> {
    let user_index = crypto.blind_index(username)?;
    let rows = profiles_adapter::find_complete_rows(conn, &user_index).await?;
    let Some(first) = rows.first() else {
        return Err(profile_not_found());
    };
    let profile_model = profile_from_row(first, &user_index);

    let mut sealed_addresses: HashMap<String, addresses::Model> = HashMap::new();
    let mut sealed_phones: HashMap<String, phones::Model> = HashMap::new();
    for row in &rows {
        if let Some(address) = address_from_row(row) {
            sealed_addresses.entry(address.id.clone()).or_insert(address);
        }
        if let Some(phone) = phone_from_row(row) {
            sealed_phones.entry(phone.id.clone()).or_insert(phone);
        }
    }
    debug!(
        rows = rows.len(),
        addresses = sealed_addresses.len(),
        phones = sealed_phones.len(),
        "Collapsed complete profile rows"
    );

    let (profile, mut addresses, mut phones) = try_join3(
        open_profile(crypto, profile_model, cancel),
        try_join_all(
            sealed_addresses
                .into_values()
                .map(|model| open_address(crypto, model, cancel)),
        ),
        try_join_all(
            sealed_phones
                .into_values()
                .map(|model| open_phone(crypto, model, cancel)),
        ),
    )
    .await?;

    addresses.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
    phones.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

    Ok(CompleteProfile {
        profile,
        addresses,
        phones,
    })
}

async fn find_profile_model<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    username: &str,
) -> Result<Option<profiles::Model>, DomainError> {
    let user_index = crypto.blind_index(username)?;
    Ok(profiles_adapter::find_by_user_index(conn, &user_index).await?)
}

async fn open_profile(
    crypto: &RecordCrypto,
    model: profiles::Model,
    cancel: &CancellationToken,
) -> Result<Profile, CryptoError> {
    let mut plain = crypto
        .open(
            vec![
                FieldInput::required(USERNAME, model.username),
                FieldInput::optional(NICKNAME, model.nickname),
            ],
            cancel,
        )
        .await?;

    Ok(Profile {
        id: model.id,
        username: plain.take_required(USERNAME)?,
        nickname: plain.take(NICKNAME),
        dark_mode: model.dark_mode,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn profile_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Profile, "profile not found")
}

fn profile_from_row(row: &CompleteProfileRow, user_index: &str) -> profiles::Model {
    profiles::Model {
        id: row.profile_id.clone(),
        username: row.username.clone(),
        user_index: user_index.to_string(),
        nickname: row.nickname.clone(),
        dark_mode: row.dark_mode,
        created_at: row.profile_created_at,
        updated_at: row.profile_updated_at,
    }
}

/// `None` when the row carries no address (left join miss).
fn address_from_row(row: &CompleteProfileRow) -> Option<addresses::Model> {
    Some(addresses::Model {
        id: row.address_id.clone()?,
        slug: row.address_slug.clone()?,
        slug_index: row.address_slug_index.clone()?,
        address_line_1: row.address_line_1.clone()?,
        address_line_2: row.address_line_2.clone(),
        city: row.city.clone()?,
        state: row.state.clone()?,
        zip: row.zip.clone()?,
        country: row.country.clone()?,
        is_current: row.address_is_current?,
        created_at: row.address_created_at?,
        updated_at: row.address_updated_at?,
    })
}

fn phone_from_row(row: &CompleteProfileRow) -> Option<phones::Model> {
    Some(phones::Model {
        id: row.phone_id.clone()?,
        slug: row.phone_slug.clone()?,
        slug_index: row.phone_slug_index.clone()?,
        country_code: row.country_code.clone(),
        phone_number: row.phone_number.clone()?,
        extension: row.extension.clone(),
        phone_type: row.phone_type.clone()?,
        is_current: row.phone_is_current?,
        created_at: row.phone_created_at?,
        updated_at: row.phone_updated_at?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn bare_row() -> CompleteProfileRow {
        CompleteProfileRow {
            profile_id: "p1".into(),
            username: "sealed-user".into(),
            nickname: None,
            dark_mode: true,
            profile_created_at: datetime!(2025-01-01 00:00 UTC),
            profile_updated_at: datetime!(2025-01-01 00:00 UTC),
            address_id: None,
            address_slug: None,
            address_slug_index: None,
            address_line_1: None,
            address_line_2: None,
            city: None,
            state: None,
            zip: None,
            country: None,
            address_is_current: None,
            address_created_at: None,
            address_updated_at: None,
            phone_id: None,
            phone_slug: None,
            phone_slug_index: None,
            country_code: None,
            phone_number: None,
            extension: None,
            phone_type: None,
            phone_is_current: None,
            phone_created_at: None,
            phone_updated_at: None,
        }
    }

    #[test]
    fn left_join_misses_yield_no_children() {
        let row = bare_row();
        assert!(address_from_row(&row).is_none());
        assert!(phone_from_row(&row).is_none());
        assert_eq!(profile_from_row(&row, "idx").user_index, "idx");
    }

    #[test]
    fn phone_columns_build_a_model_with_optional_parts_absent() {
        let mut row = bare_row();
        row.phone_id = Some("ph1".into());
        row.phone_slug = Some("s".into());
        row.phone_slug_index = Some("si".into());
        row.phone_number = Some("n".into());
        row.phone_type = Some("t".into());
        row.phone_is_current = Some(false);
        row.phone_created_at = Some(datetime!(2025-01-02 00:00 UTC));
        row.phone_updated_at = Some(datetime!(2025-01-02 00:00 UTC));

        let phone = phone_from_row(&row).unwrap();
        assert_eq!(phone.id, "ph1");
        assert_eq!(phone.country_code, None);
        assert_eq!(phone.extension, None);
    }

    #[test]
    fn profile_changes_report_field_names() {
        let changes = ProfileChanges {
            nickname: Some(Some("Al".into())),
            dark_mode: None,
        };
        assert_eq!(changes.changed_fields(), vec!["nickname"]);
        assert!(ProfileChanges::default().is_empty());
    }
}
