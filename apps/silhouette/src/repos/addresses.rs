//! Address record store (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::adapters::addresses_sea as addresses_adapter;
use crate::adapters::addresses_sea::{AddressCreate, AddressUpdate};
use crate::crypto::{CryptoError, FieldInput, RecordCrypto};
use crate::entities::addresses;
use crate::errors::domain::{DomainError, NotFoundKind};

const SLUG: &str = "slug";
const LINE_1: &str = "address_line_1";
const LINE_2: &str = "address_line_2";
const CITY: &str = "city";
const STATE: &str = "state";
const ZIP: &str = "zip";
const COUNTRY: &str = "country";

/// Decrypted address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: String,
    pub slug: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub is_current: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewAddress {
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub is_current: bool,
}

/// Mutated fields only. `address_line_2: Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub address_line_1: Option<String>,
    pub address_line_2: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub is_current: Option<bool>,
}

impl AddressChanges {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.address_line_1.is_some() {
            out.push(LINE_1);
        }
        if self.address_line_2.is_some() {
            out.push(LINE_2);
        }
        if self.city.is_some() {
            out.push(CITY);
        }
        if self.state.is_some() {
            out.push(STATE);
        }
        if self.zip.is_some() {
            out.push(ZIP);
        }
        if self.country.is_some() {
            out.push(COUNTRY);
        }
        if self.is_current.is_some() {
            out.push("is_current");
        }
        out
    }
}

/// Generates id and slug, indexes the slug and seals every text field.
pub async fn create_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    new: NewAddress,
) -> Result<Address, DomainError> {
    let slug = Uuid::new_v4().to_string();
    let slug_index = crypto.blind_index(&slug)?;

    let mut sealed = crypto
        .seal(
            vec![
                FieldInput::required(SLUG, slug.clone()),
                FieldInput::required(LINE_1, new.address_line_1.clone()),
                FieldInput::optional(LINE_2, new.address_line_2.clone()),
                FieldInput::required(CITY, new.city.clone()),
                FieldInput::required(STATE, new.state.clone()),
                FieldInput::required(ZIP, new.zip.clone()),
                FieldInput::required(COUNTRY, new.country.clone()),
            ],
            cancel,
        )
        .await?;

    let model = addresses_adapter::insert_address(
        conn,
        AddressCreate {
            id: Uuid::new_v4().to_string(),
            slug: sealed.take_required(SLUG)?,
            slug_index,
            address_line_1: sealed.take_required(LINE_1)?,
            address_line_2: sealed.take(LINE_2),
            city: sealed.take_required(CITY)?,
            state: sealed.take_required(STATE)?,
            zip: sealed.take_required(ZIP)?,
            country: sealed.take_required(COUNTRY)?,
            is_current: new.is_current,
        },
    )
    .await?;

    Ok(Address {
        id: model.id,
        slug,
        address_line_1: new.address_line_1,
        address_line_2: new.address_line_2.filter(|v| !v.is_empty()),
        city: new.city,
        state: new.state,
        zip: new.zip,
        country: new.country,
        is_current: model.is_current,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Lookup by slug; with `owner` set, only an address linked to that
/// username's profile is visible.
pub async fn get_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    slug: &str,
    owner: Option<&str>,
) -> Result<Address, DomainError> {
    let slug_index = crypto.blind_index(slug)?;
    let owner_index = owner.map(|o| crypto.blind_index(o)).transpose()?;

    let model =
        addresses_adapter::find_by_slug_index(conn, &slug_index, owner_index.as_deref()).await?;
    let model = model.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Address, format!("address {slug} not found"))
    })?;
    Ok(open_address(crypto, model, cancel).await?)
}

/// Re-encrypts only the changed fields and writes by primary key.
pub async fn update_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    id: &str,
    changes: AddressChanges,
) -> Result<Address, DomainError> {
    let mut fields = Vec::new();
    for (name, value) in [
        (LINE_1, &changes.address_line_1),
        (CITY, &changes.city),
        (STATE, &changes.state),
        (ZIP, &changes.zip),
        (COUNTRY, &changes.country),
    ] {
        if let Some(v) = value {
            fields.push(FieldInput::required(name, v.clone()));
        }
    }
    if let Some(line_2) = &changes.address_line_2 {
        fields.push(FieldInput::optional(LINE_2, line_2.clone()));
    }

    let mut sealed = crypto.seal(fields, cancel).await?;

    let model = addresses_adapter::update_address(
        conn,
        AddressUpdate {
            id: id.to_string(),
            address_line_1: changes
                .address_line_1
                .as_ref()
                .map(|_| sealed.take_required(LINE_1))
                .transpose()?,
            address_line_2: changes.address_line_2.as_ref().map(|_| sealed.take(LINE_2)),
            city: changes
                .city
                .as_ref()
                .map(|_| sealed.take_required(CITY))
                .transpose()?,
            state: changes
                .state
                .as_ref()
                .map(|_| sealed.take_required(STATE))
                .transpose()?,
            zip: changes
                .zip
                .as_ref()
                .map(|_| sealed.take_required(ZIP))
                .transpose()?,
            country: changes
                .country
                .as_ref()
                .map(|_| sealed.take_required(COUNTRY))
                .transpose()?,
            is_current: changes.is_current,
        },
    )
    .await?;

    Ok(open_address(crypto, model, cancel).await?)
}

/// Removes the row by primary key. Links in the join table are the
/// caller's concern.
pub async fn delete_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<(), DomainError> {
    let removed = addresses_adapter::delete_address(conn, id).await?;
    if removed == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Address,
            format!("address {id} not found"),
        ));
    }
    Ok(())
}

/// Decrypts a stored row. Any failing field fails the whole address.
pub(crate) async fn open_address(
    crypto: &RecordCrypto,
    model: addresses::Model,
    cancel: &CancellationToken,
) -> Result<Address, CryptoError> {
    let mut plain = crypto
        .open(
            vec![
                FieldInput::required(SLUG, model.slug),
                FieldInput::required(LINE_1, model.address_line_1),
                FieldInput::optional(LINE_2, model.address_line_2),
                FieldInput::required(CITY, model.city),
                FieldInput::required(STATE, model.state),
                FieldInput::required(ZIP, model.zip),
                FieldInput::required(COUNTRY, model.country),
            ],
            cancel,
        )
        .await?;

    Ok(Address {
        id: model.id,
        slug: plain.take_required(SLUG)?,
        address_line_1: plain.take_required(LINE_1)?,
        address_line_2: plain.take(LINE_2),
        city: plain.take_required(CITY)?,
        state: plain.take_required(STATE)?,
        zip: plain.take_required(ZIP)?,
        country: plain.take_required(COUNTRY)?,
        is_current: model.is_current,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
