//! SeaORM adapter for the profile ↔ address / phone join tables.
//!
//! Plain inserts and deletes; duplicates are not prevented and deleting
//! a link never touches the linked rows.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::{profile_addresses, profile_phones};

pub async fn insert_profile_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
    address_id: &str,
) -> Result<profile_addresses::Model, sea_orm::DbErr> {
    profile_addresses::ActiveModel {
        id: NotSet,
        profile_id: Set(profile_id.to_string()),
        address_id: Set(address_id.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn delete_profile_addresses_by_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    address_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = profile_addresses::Entity::delete_many()
        .filter(profile_addresses::Column::AddressId.eq(address_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_profile_addresses_by_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = profile_addresses::Entity::delete_many()
        .filter(profile_addresses::Column::ProfileId.eq(profile_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn insert_profile_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
    phone_id: &str,
) -> Result<profile_phones::Model, sea_orm::DbErr> {
    profile_phones::ActiveModel {
        id: NotSet,
        profile_id: Set(profile_id.to_string()),
        phone_id: Set(phone_id.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn delete_profile_phones_by_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    phone_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = profile_phones::Entity::delete_many()
        .filter(profile_phones::Column::PhoneId.eq(phone_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_profile_phones_by_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    profile_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = profile_phones::Entity::delete_many()
        .filter(profile_phones::Column::ProfileId.eq(profile_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
