//! Profile ↔ address / phone associations.
//!
//! No uniqueness is enforced and removal never cascades into the linked
//! rows; callers order xref and entity deletes themselves.

use sea_orm::ConnectionTrait;

use crate::adapters::xref_sea;
use crate::errors::domain::DomainError;

/// One association row, either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub profile_id: String,
    pub other_id: String,
    pub created_at: time::OffsetDateTime,
}

pub async fn link_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
    address_id: &str,
) -> Result<Link, DomainError> {
    let row = xref_sea::insert_profile_address(conn, profile_id, address_id).await?;
    Ok(Link {
        id: row.id,
        profile_id: row.profile_id,
        other_id: row.address_id,
        created_at: row.created_at,
    })
}

pub async fn unlink_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    address_id: &str,
) -> Result<u64, DomainError> {
    Ok(xref_sea::delete_profile_addresses_by_address(conn, address_id).await?)
}

pub async fn unlink_profile_addresses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
) -> Result<u64, DomainError> {
    Ok(xref_sea::delete_profile_addresses_by_profile(conn, profile_id).await?)
}

pub async fn link_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
    phone_id: &str,
) -> Result<Link, DomainError> {
    let row = xref_sea::insert_profile_phone(conn, profile_id, phone_id).await?;
    Ok(Link {
        id: row.id,
        profile_id: row.profile_id,
        other_id: row.phone_id,
        created_at: row.created_at,
    })
}

pub async fn unlink_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    phone_id: &str,
) -> Result<u64, DomainError> {
    Ok(xref_sea::delete_profile_phones_by_phone(conn, phone_id).await?)
}

pub async fn unlink_profile_phones<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
) -> Result<u64, DomainError> {
    Ok(xref_sea::delete_profile_phones_by_profile(conn, profile_id).await?)
}
