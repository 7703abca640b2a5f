//! SeaORM adapter for the phones table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QuerySelect, RelationTrait, Set, Unchanged,
};

use crate::entities::{phones, profile_phones, profiles};

pub mod dto;

pub use dto::{PhoneCreate, PhoneUpdate};

pub async fn insert_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PhoneCreate,
) -> Result<phones::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = phones::ActiveModel {
        id: Set(dto.id),
        slug: Set(dto.slug),
        slug_index: Set(dto.slug_index),
        country_code: Set(dto.country_code),
        phone_number: Set(dto.phone_number),
        extension: Set(dto.extension),
        phone_type: Set(dto.phone_type),
        is_current: Set(dto.is_current),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

/// Lookup by slug index, optionally restricted to phones linked to the
/// profile with `owner_index`.
pub async fn find_by_slug_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug_index: &str,
    owner_index: Option<&str>,
) -> Result<Option<phones::Model>, sea_orm::DbErr> {
    let mut query = phones::Entity::find().filter(phones::Column::SlugIndex.eq(slug_index));
    if let Some(owner_index) = owner_index {
        query = query
            .join(JoinType::InnerJoin, phones::Relation::ProfilePhones.def())
            .join(JoinType::InnerJoin, profile_phones::Relation::Profiles.def())
            .filter(profiles::Column::UserIndex.eq(owner_index));
    }
    query.one(conn).await
}

pub async fn update_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PhoneUpdate,
) -> Result<phones::Model, sea_orm::DbErr> {
    let active = phones::ActiveModel {
        id: Unchanged(dto.id),
        slug: NotSet,
        slug_index: NotSet,
        country_code: dto.country_code.map_or(NotSet, Set),
        phone_number: dto.phone_number.map_or(NotSet, Set),
        extension: dto.extension.map_or(NotSet, Set),
        phone_type: dto.phone_type.map_or(NotSet, Set),
        is_current: dto.is_current.map_or(NotSet, Set),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.update(conn).await
}

pub async fn delete_phone<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = phones::Entity::delete_by_id(id.to_string())
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
