use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profile_phones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub profile_id: String,
    pub phone_id: String,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfileId",
        to = "super::profiles::Column::Id"
    )]
    Profiles,
    #[sea_orm(
        belongs_to = "super::phones::Entity",
        from = "Column::PhoneId",
        to = "super::phones::Column::Id"
    )]
    Phones,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::phones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
