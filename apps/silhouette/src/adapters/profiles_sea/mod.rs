//! SeaORM adapter for the profiles table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QuerySelect, RelationTrait, Set, Unchanged,
};

use crate::entities::{addresses, phones, profile_addresses, profile_phones, profiles};

pub mod dto;

pub use dto::{CompleteProfileRow, ProfileCreate, ProfileUpdate};

pub async fn insert_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProfileCreate,
) -> Result<profiles::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = profiles::ActiveModel {
        id: Set(dto.id),
        username: Set(dto.username),
        user_index: Set(dto.user_index),
        nickname: Set(dto.nickname),
        dark_mode: Set(dto.dark_mode),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

pub async fn find_by_user_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_index: &str,
) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::UserIndex.eq(user_index))
        .one(conn)
        .await
}

/// Writes by primary key only; the blind index column is never touched.
pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProfileUpdate,
) -> Result<profiles::Model, sea_orm::DbErr> {
    let active = profiles::ActiveModel {
        id: Unchanged(dto.id),
        username: NotSet,
        user_index: NotSet,
        nickname: dto.nickname.map_or(NotSet, Set),
        dark_mode: dto.dark_mode.map_or(NotSet, Set),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.update(conn).await
}

pub async fn delete_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = profiles::Entity::delete_by_id(id.to_string())
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Single query across profile, both join tables, addresses and phones.
/// Yields one row per (address, phone) pair.
pub async fn find_complete_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_index: &str,
) -> Result<Vec<CompleteProfileRow>, sea_orm::DbErr> {
    profiles::Entity::find()
        .select_only()
        .column_as(profiles::Column::Id, "profile_id")
        .column_as(profiles::Column::Username, "username")
        .column_as(profiles::Column::Nickname, "nickname")
        .column_as(profiles::Column::DarkMode, "dark_mode")
        .column_as(profiles::Column::CreatedAt, "profile_created_at")
        .column_as(profiles::Column::UpdatedAt, "profile_updated_at")
        .column_as(addresses::Column::Id, "address_id")
        .column_as(addresses::Column::Slug, "address_slug")
        .column_as(addresses::Column::SlugIndex, "address_slug_index")
        .column_as(addresses::Column::AddressLine1, "address_line_1")
        .column_as(addresses::Column::AddressLine2, "address_line_2")
        .column_as(addresses::Column::City, "city")
        .column_as(addresses::Column::State, "state")
        .column_as(addresses::Column::Zip, "zip")
        .column_as(addresses::Column::Country, "country")
        .column_as(addresses::Column::IsCurrent, "address_is_current")
        .column_as(addresses::Column::CreatedAt, "address_created_at")
        .column_as(addresses::Column::UpdatedAt, "address_updated_at")
        .column_as(phones::Column::Id, "phone_id")
        .column_as(phones::Column::Slug, "phone_slug")
        .column_as(phones::Column::SlugIndex, "phone_slug_index")
        .column_as(phones::Column::CountryCode, "country_code")
        .column_as(phones::Column::PhoneNumber, "phone_number")
        .column_as(phones::Column::Extension, "extension")
        .column_as(phones::Column::PhoneType, "phone_type")
        .column_as(phones::Column::IsCurrent, "phone_is_current")
        .column_as(phones::Column::CreatedAt, "phone_created_at")
        .column_as(phones::Column::UpdatedAt, "phone_updated_at")
        .join(JoinType::LeftJoin, profiles::Relation::ProfileAddresses.def())
        .join(JoinType::LeftJoin, profile_addresses::Relation::Addresses.def())
        .join(JoinType::LeftJoin, profiles::Relation::ProfilePhones.def())
        .join(JoinType::LeftJoin, profile_phones::Relation::Phones.def())
        .filter(profiles::Column::UserIndex.eq(user_index))
        .into_model::<CompleteProfileRow>()
        .all(conn)
        .await
}
