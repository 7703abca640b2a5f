use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

/// `username` and `nickname` hold ciphertext; `user_index` is the
/// username's blind index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    #[sea_orm(unique)]
    pub user_index: String,
    pub nickname: Option<String>,
    pub dark_mode: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::profile_addresses::Entity")]
    ProfileAddresses,
    #[sea_orm(has_many = "super::profile_phones::Entity")]
    ProfilePhones,
}

impl Related<super::profile_addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileAddresses.def()
    }
}

impl Related<super::profile_phones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfilePhones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
