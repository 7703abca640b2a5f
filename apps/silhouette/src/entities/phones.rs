use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "phones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub slug: String,
    pub slug_index: String,
    pub country_code: Option<String>,
    pub phone_number: String,
    pub extension: Option<String>,
    pub phone_type: String,
    pub is_current: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::profile_phones::Entity")]
    ProfilePhones,
}

impl Related<super::profile_phones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfilePhones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
