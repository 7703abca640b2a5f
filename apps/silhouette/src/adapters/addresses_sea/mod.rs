//! SeaORM adapter for the addresses table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QuerySelect, RelationTrait, Set, Unchanged,
};

use crate::entities::{addresses, profile_addresses, profiles};

pub mod dto;

pub use dto::{AddressCreate, AddressUpdate};

pub async fn insert_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AddressCreate,
) -> Result<addresses::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = addresses::ActiveModel {
        id: Set(dto.id),
        slug: Set(dto.slug),
        slug_index: Set(dto.slug_index),
        address_line_1: Set(dto.address_line_1),
        address_line_2: Set(dto.address_line_2),
        city: Set(dto.city),
        state: Set(dto.state),
        zip: Set(dto.zip),
        country: Set(dto.country),
        is_current: Set(dto.is_current),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

/// Lookup by slug index, optionally restricted to addresses linked to the
/// profile with `owner_index`.
pub async fn find_by_slug_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug_index: &str,
    owner_index: Option<&str>,
) -> Result<Option<addresses::Model>, sea_orm::DbErr> {
    let mut query = addresses::Entity::find().filter(addresses::Column::SlugIndex.eq(slug_index));
    if let Some(owner_index) = owner_index {
        query = query
            .join(JoinType::InnerJoin, addresses::Relation::ProfileAddresses.def())
            .join(JoinType::InnerJoin, profile_addresses::Relation::Profiles.def())
            .filter(profiles::Column::UserIndex.eq(owner_index));
    }
    query.one(conn).await
}

pub async fn update_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AddressUpdate,
) -> Result<addresses::Model, sea_orm::DbErr> {
    let active = addresses::ActiveModel {
        id: Unchanged(dto.id),
        slug: NotSet,
        slug_index: NotSet,
        address_line_1: dto.address_line_1.map_or(NotSet, Set),
        address_line_2: dto.address_line_2.map_or(NotSet, Set),
        city: dto.city.map_or(NotSet, Set),
        state: dto.state.map_or(NotSet, Set),
        zip: dto.zip.map_or(NotSet, Set),
        country: dto.country.map_or(NotSet, Set),
        is_current: dto.is_current.map_or(NotSet, Set),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.update(conn).await
}

pub async fn delete_address<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = addresses::Entity::delete_by_id(id.to_string())
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
