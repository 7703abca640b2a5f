//! Phone record store (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::adapters::phones_sea as phones_adapter;
use crate::adapters::phones_sea::{PhoneCreate, PhoneUpdate};
use crate::crypto::{CryptoError, FieldInput, RecordCrypto};
use crate::entities::phones;
use crate::errors::domain::{DomainError, NotFoundKind};

const SLUG: &str = "slug";
const COUNTRY_CODE: &str = "country_code";
const NUMBER: &str = "phone_number";
const EXTENSION: &str = "extension";
const PHONE_TYPE: &str = "phone_type";

/// Decrypted phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub id: String,
    pub slug: String,
    pub country_code: Option<String>,
    pub phone_number: String,
    pub extension: Option<String>,
    pub phone_type: String,
    pub is_current: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewPhone {
    pub country_code: Option<String>,
    pub phone_number: String,
    pub extension: Option<String>,
    pub phone_type: String,
    pub is_current: bool,
}

/// Mutated fields only; `Some(None)` clears an optional column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneChanges {
    pub country_code: Option<Option<String>>,
    pub phone_number: Option<String>,
    pub extension: Option<Option<String>>,
    pub phone_type: Option<String>,
    pub is_current: Option<bool>,
}

impl PhoneChanges {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.country_code.is_some() {
            out.push(COUNTRY_CODE);
        }
        if self.phone_number.is_some() {
            out.push(NUMBER);
        }
        if self.extension.is_some() {
            out.push(EXTENSION);
        }
        if self.phone_type.is_some() {
            out.push(PHONE_TYPE);
        }
        if self.is_current.is_some() {
            out.push("is_current");
        }
        out
    }
}

pub async fn create_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    new: NewPhone,
) -> Result<Phone, DomainError> {
    let slug = Uuid::new_v4().to_string();
    let slug_index = crypto.blind_index(&slug)?;

    let mut sealed = crypto
        .seal(
            vec![
                FieldInput::required(SLUG, slug.clone()),
                FieldInput::optional(COUNTRY_CODE, new.country_code.clone()),
                FieldInput::required(NUMBER, new.phone_number.clone()),
                FieldInput::optional(EXTENSION, new.extension.clone()),
                FieldInput::required(PHONE_TYPE, new.phone_type.clone()),
            ],
            cancel,
        )
        .await?;

    let model = phones_adapter::insert_phone(
        conn,
        PhoneCreate {
            id: Uuid::new_v4().to_string(),
            slug: sealed.take_required(SLUG)?,
            slug_index,
            country_code: sealed.take(COUNTRY_CODE),
            phone_number: sealed.take_required(NUMBER)?,
            extension: sealed.take(EXTENSION),
            phone_type: sealed.take_required(PHONE_TYPE)?,
            is_current: new.is_current,
        },
    )
    .await?;

    Ok(Phone {
        id: model.id,
        slug,
        country_code: new.country_code.filter(|v| !v.is_empty()),
        phone_number: new.phone_number,
        extension: new.extension.filter(|v| !v.is_empty()),
        phone_type: new.phone_type,
        is_current: model.is_current,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Lookup by slug; with `owner` set, only a phone linked to that
/// username's profile is visible.
pub async fn get_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    slug: &str,
    owner: Option<&str>,
) -> Result<Phone, DomainError> {
    let slug_index = crypto.blind_index(slug)?;
    let owner_index = owner.map(|o| crypto.blind_index(o)).transpose()?;

    let model =
        phones_adapter::find_by_slug_index(conn, &slug_index, owner_index.as_deref()).await?;
    let model = model.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Phone, format!("phone {slug} not found"))
    })?;
    Ok(open_phone(crypto, model, cancel).await?)
}

pub async fn update_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    crypto: &RecordCrypto,
    cancel: &CancellationToken,
    id: &str,
    changes: PhoneChanges,
) -> Result<Phone, DomainError> {
    let mut fields = Vec::new();
    if let Some(code) = &changes.country_code {
        fields.push(FieldInput::optional(COUNTRY_CODE, code.clone()));
    }
    if let Some(number) = &changes.phone_number {
        fields.push(FieldInput::required(NUMBER, number.clone()));
    }
    if let Some(ext) = &changes.extension {
        fields.push(FieldInput::optional(EXTENSION, ext.clone()));
    }
    if let Some(kind) = &changes.phone_type {
        fields.push(FieldInput::required(PHONE_TYPE, kind.clone()));
    }

    let mut sealed = crypto.seal(fields, cancel).await?;

    let model = phones_adapter::update_phone(
        conn,
        PhoneUpdate {
            id: id.to_string(),
            country_code: changes.country_code.as_ref().map(|_| sealed.take(COUNTRY_CODE)),
            phone_number: changes
                .phone_number
                .as_ref()
                .map(|_| sealed.take_required(NUMBER))
                .transpose()?,
            extension: changes.extension.as_ref().map(|_| sealed.take(EXTENSION)),
            phone_type: changes
                .phone_type
                .as_ref()
                .map(|_| sealed.take_required(PHONE_TYPE))
                .transpose()?,
            is_current: changes.is_current,
        },
    )
    .await?;

    Ok(open_phone(crypto, model, cancel).await?)
}

pub async fn delete_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<(), DomainError> {
    let removed = phones_adapter::delete_phone(conn, id).await?;
    if removed == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Phone,
            format!("phone {id} not found"),
        ));
    }
    Ok(())
}

pub(crate) async fn open_phone(
    crypto: &RecordCrypto,
    model: phones::Model,
    cancel: &CancellationToken,
) -> Result<Phone, CryptoError> {
    let mut plain = crypto
        .open(
            vec![
                FieldInput::required(SLUG, model.slug),
                FieldInput::optional(COUNTRY_CODE, model.country_code),
                FieldInput::required(NUMBER, model.phone_number),
                FieldInput::optional(EXTENSION, model.extension),
                FieldInput::required(PHONE_TYPE, model.phone_type),
            ],
            cancel,
        )
        .await?;

    Ok(Phone {
        id: model.id,
        slug: plain.take_required(SLUG)?,
        country_code: plain.take(COUNTRY_CODE),
        phone_number: plain.take_required(NUMBER)?,
        extension: plain.take(EXTENSION),
        phone_type: plain.take_required(PHONE_TYPE)?,
        is_current: model.is_current,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
